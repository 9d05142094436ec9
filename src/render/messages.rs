use crate::color::Rgb;
use crate::fractal::params::Point;

/// Image RVB, 8 bits par canal, lignes contiguës du haut vers le bas.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Raster noir de la taille demandée.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        Raster {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Octets RVB bruts, ligne par ligne.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Octets RVB mutables, pour le rendu ligne par ligne.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Longueur d'une ligne en octets.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * 3
    }

    /// Couleur du pixel (x, y).
    #[allow(dead_code)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let offset = y as usize * self.row_len() + x as usize * 3;
        Rgb::new(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        )
    }
}

/// Messages émis par le moteur sur le canal fourni par l'appelant.
pub enum RenderEvent {
    /// Raster interactif terminé, avec sa cadence en images par seconde.
    FractalRendered { raster: Raster, fps: f64 },
    /// Orbite tracée, en coordonnées écran.
    OrbitRendered { points: Vec<Point> },
    /// Avancement d'une passe de benchmark, en lignes rendues.
    BenchmarkProgress { min: u32, max: u32, value: u32 },
    /// Fin d'une passe de benchmark ; `None` signale une taille effective
    /// trop grande pour être allouée.
    BenchmarkFinished {
        raster: Option<Raster>,
        elapsed_ms: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_raster_is_black() {
        let raster = Raster::new(4, 2);
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.as_bytes().len(), 24);
        assert!(raster.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixel_reads_row_major_bytes() {
        let mut raster = Raster::new(2, 2);
        let row_len = raster.row_len();
        let bytes = raster.bytes_mut();
        // pixel (1, 1) en rouge
        let offset = row_len + 3;
        bytes[offset] = 255;
        assert_eq!(raster.pixel(1, 1), Rgb::new(255, 0, 0));
        assert_eq!(raster.pixel(0, 0), Rgb::new(0, 0, 0));
    }
}
