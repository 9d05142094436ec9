use std::path::Path;

use image::{ExtendedColorType, ImageError};

use crate::render::messages::Raster;

/// Enregistre un raster sur disque. Le format est déduit de l'extension
/// du chemin ; PNG est le format attendu.
pub fn save_png(raster: &Raster, output: &Path) -> Result<(), ImageError> {
    image::save_buffer(
        output,
        raster.as_bytes(),
        raster.width(),
        raster.height(),
        ExtendedColorType::Rgb8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_reload_png() {
        let mut raster = Raster::new(3, 2);
        let offset = raster.row_len() + 3;
        raster.bytes_mut()[offset] = 255;
        let path = std::env::temp_dir().join(format!("fracton-png-{}.png", std::process::id()));
        save_png(&raster, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.get_pixel(1, 1).0, [255, 0, 0]);
        assert_eq!(reloaded.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
