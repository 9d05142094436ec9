pub mod engine;
pub mod messages;
pub mod scanline;

pub use engine::Renderer;
pub use messages::RenderEvent;
