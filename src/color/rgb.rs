use serde::{Deserialize, Serialize};

/// Couleur RGB, 8 bits par canal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Couleurs prédéfinies attribuées cycliquement aux racines.
pub const PREDEF_COLORS: [Rgb; 10] = [
    Rgb::new(255, 0, 0),     // rouge
    Rgb::new(0, 255, 0),     // vert
    Rgb::new(0, 0, 255),     // bleu
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(255, 0, 255),   // magenta
    Rgb::new(255, 255, 0),   // jaune
    Rgb::new(255, 128, 0),   // orange
    Rgb::new(255, 0, 128),   // rose
    Rgb::new(0, 255, 128),   // vert printemps
    Rgb::new(128, 128, 128), // gris
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Couleur prédéfinie d'index `i` (cyclique au-delà de la palette).
    pub fn predefined(i: usize) -> Self {
        PREDEF_COLORS[i % PREDEF_COLORS.len()]
    }

    /// Assombrit la couleur à la manière de Qt : chaque canal est multiplié
    /// par `100 / facteur`. Un facteur > 100 assombrit, un facteur < 100
    /// éclaircit (saturation à 255), un facteur <= 0 laisse la couleur
    /// inchangée.
    pub fn darker(self, factor: i32) -> Rgb {
        if factor <= 0 {
            return self;
        }
        let scale = 100.0 / factor as f64;
        Rgb {
            r: scale_channel(self.r, scale),
            g: scale_channel(self.g, scale),
            b: scale_channel(self.b, scale),
        }
    }
}

fn scale_channel(channel: u8, scale: f64) -> u8 {
    (channel as f64 * scale).round().min(255.0) as u8
}
