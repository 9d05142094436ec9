use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_ROOT_COUNT, DEFAULT_SCALE_DOWN_FACTOR,
    DEFAULT_SCALE_UP_FACTOR, DEFAULT_SIZE, MAX_ROOT_COUNT, ROOT_INDICATOR_RADIUS,
};
use super::limits::Limits;
use super::roots::RootSet;

/// Coordonnée de pixel (origine en haut à gauche, y vers le bas).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Répartition du calcul sur les cœurs CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Threading {
    /// Lignes rendues séquentiellement sur un seul thread.
    Single,
    /// Lignes réparties sur tous les cœurs disponibles.
    #[default]
    Multi,
}

impl Threading {
    #[allow(dead_code)]
    pub fn name(self) -> &'static str {
        match self {
            Threading::Single => "Monothread",
            Threading::Multi => "Multithread",
        }
    }

    pub fn from_cli_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "single" | "mono" | "1" => Some(Threading::Single),
            "multi" | "auto" => Some(Threading::Multi),
            _ => None,
        }
    }
}

/// Instantané complet des paramètres d'une passe de rendu.
///
/// Le moteur compare deux instantanés successifs pour décider quoi
/// recalculer ; voir [`Parameters::params_changed`] et
/// [`Parameters::orbit_changed`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Racines du polynôme.
    pub roots: RootSet,
    /// Fenêtre du plan complexe.
    pub limits: Limits,
    /// Largeur du raster de sortie en pixels (>= 2).
    pub width: u32,
    /// Hauteur du raster de sortie en pixels (>= 2).
    pub height: u32,
    /// Plafond d'itérations de Newton par pixel.
    pub max_iterations: u16,
    /// Facteur d'amortissement complexe de l'itération.
    pub damping: Complex64,
    /// Rendu en taille réduite pour un aperçu rapide.
    pub scale_down: bool,
    /// Facteur de réduction de l'aperçu, dans (0, 1].
    pub scale_down_factor: f64,
    /// Facteur d'agrandissement du benchmark (>= 1).
    pub scale_up_factor: u32,
    /// Répartition du calcul (mono ou multithread).
    pub threading: Threading,
    /// Trace l'orbite de Newton depuis `orbit_start`.
    pub orbit_mode: bool,
    /// Pixel de départ de l'orbite.
    pub orbit_start: Point,
    /// Passe de benchmark : taille agrandie, progression, arrêt possible.
    pub benchmark: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            roots: RootSet::equidistant(DEFAULT_ROOT_COUNT),
            limits: Limits::default(),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            damping: Complex64::new(DEFAULT_DAMPING, 0.0),
            scale_down: false,
            scale_down_factor: DEFAULT_SCALE_DOWN_FACTOR,
            scale_up_factor: DEFAULT_SCALE_UP_FACTOR,
            threading: Threading::Multi,
            orbit_mode: false,
            orbit_start: Point::new(0, 0),
            benchmark: false,
        }
    }
}

impl Parameters {
    /// Vrai si un champ affectant le raster diffère de `other` : racines,
    /// fenêtre, taille de sortie, plafond d'itérations, amortissement,
    /// facteurs d'échelle, threading ou mode benchmark. Les champs
    /// d'orbite sont ignorés.
    pub fn params_changed(&self, other: &Parameters) -> bool {
        self.roots != other.roots
            || self.limits != other.limits
            || self.width != other.width
            || self.height != other.height
            || self.max_iterations != other.max_iterations
            || self.damping != other.damping
            || self.scale_down != other.scale_down
            || self.scale_down_factor != other.scale_down_factor
            || self.scale_up_factor != other.scale_up_factor
            || self.threading != other.threading
            || self.benchmark != other.benchmark
    }

    /// Vrai si l'orbite doit être retracée : point de départ ou mode
    /// d'orbite différent, ou mode actif avec un raster qui change.
    pub fn orbit_changed(&self, other: &Parameters) -> bool {
        self.orbit_start != other.orbit_start
            || self.orbit_mode != other.orbit_mode
            || (self.orbit_mode && self.params_changed(other))
    }

    /// Convertit un pixel en nombre complexe du plan. L'axe imaginaire
    /// croît vers le haut alors que les y pixels croissent vers le bas.
    pub fn point2complex(&self, p: Point) -> Complex64 {
        let re = p.x as f64 * self.limits.width() / (self.width - 1) as f64 + self.limits.left();
        let im = p.y as f64 * -self.limits.height() / (self.height - 1) as f64 + self.limits.top();
        Complex64::new(re, im)
    }

    /// Convertit un nombre complexe du plan en pixel, arrondi au plus
    /// proche.
    pub fn complex2point(&self, z: Complex64) -> Point {
        let x = (z.re - self.limits.left()) * (self.width - 1) as f64 / self.limits.width();
        let y = (z.im - self.limits.top()) * (self.height - 1) as f64 / -self.limits.height();
        Point::new(x.round() as i32, y.round() as i32)
    }

    /// Convertit une distance en pixels en déplacement complexe (mêmes
    /// facteurs que [`Parameters::point2complex`], sans décalage).
    #[allow(dead_code)]
    pub fn distance2complex(&self, d: Point) -> Complex64 {
        let re = d.x as f64 * self.limits.width() / (self.width - 1) as f64;
        let im = d.y as f64 * -self.limits.height() / (self.height - 1) as f64;
        Complex64::new(re, im)
    }

    /// Index de la première racine dont l'indicateur (carré de
    /// `ROOT_INDICATOR_RADIUS` pixels de demi-côté) contient `p`.
    #[allow(dead_code)]
    pub fn root_contains_point(&self, p: Point) -> Option<usize> {
        for (i, root) in self.roots.iter().enumerate() {
            let rp = self.complex2point(root.value());
            if (rp.x - p.x).abs() < ROOT_INDICATOR_RADIUS && (rp.y - p.y).abs() < ROOT_INDICATOR_RADIUS
            {
                return Some(i);
            }
        }
        None
    }

    /// Ramène tous les champs dans leurs plages valides, sans jamais
    /// échouer. L'ensemble de racines vide reste vide : c'est au moteur
    /// de le rejeter.
    pub fn sanitize(&mut self) {
        self.roots.clamp_len(MAX_ROOT_COUNT);
        self.width = self.width.max(2);
        self.height = self.height.max(2);
        if self.max_iterations == 0 {
            self.max_iterations = 1;
        }
        if !(self.scale_down_factor > 0.0 && self.scale_down_factor <= 1.0) {
            self.scale_down_factor = DEFAULT_SCALE_DOWN_FACTOR;
        }
        if self.scale_up_factor == 0 {
            self.scale_up_factor = 1;
        }
        if !(self.limits.width() > 0.0)
            || !(self.limits.height() > 0.0)
            || !self.limits.width().is_finite()
            || !self.limits.height().is_finite()
        {
            self.limits = Limits::default();
        }
        if !self.damping.re.is_finite() || !self.damping.im.is_finite() {
            self.damping = Complex64::new(DEFAULT_DAMPING, 0.0);
        }
    }
}
