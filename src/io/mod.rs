pub mod png;
pub mod settings;
