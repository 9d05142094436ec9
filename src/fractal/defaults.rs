//! Constantes du moteur : seuils numériques, facteurs d'échelle et
//! valeurs par défaut des paramètres.

/// Seuil de convergence de l'itération de Newton. Sert aussi de rayon
/// d'appariement entre un itéré convergé et une racine.
pub const EPS: f64 = 1e-3;

/// Pas complexe (parties réelle et imaginaire) de la dérivée par
/// différences finies centrées.
pub const DERIVATIVE_STEP: f64 = 1e-6;

/// Norme minimale de la dérivée en dessous de laquelle le pas de Newton
/// est abandonné (division impossible).
pub const MIN_DERIVATIVE_NORM: f64 = 1e-12;

/// Nombre maximal de racines accepté par le moteur.
pub const MAX_ROOT_COUNT: usize = 10;

/// Nombre de racines par défaut.
pub const DEFAULT_ROOT_COUNT: usize = 5;

/// Plafond d'itérations par défaut.
pub const DEFAULT_MAX_ITERATIONS: u16 = 160;

/// Partie réelle de l'amortissement par défaut (Newton classique).
pub const DEFAULT_DAMPING: f64 = 1.0;

/// Taille de raster par défaut, en pixels.
pub const DEFAULT_SIZE: u32 = 660;

/// Conversion pixels → unités du plan pour le redimensionnement et la
/// réinitialisation de la fenêtre.
pub const SIZE_FACTOR: f64 = 1.0 / 700.0;

/// Fraction de la fenêtre ajoutée ou retirée par cran de zoom.
pub const ZOOM_STEP: f64 = 0.05;

/// Rayon en pixels (par axe) de l'indicateur de racine.
pub const ROOT_INDICATOR_RADIUS: i32 = 5;

/// Facteur de réduction par défaut de l'aperçu.
pub const DEFAULT_SCALE_DOWN_FACTOR: f64 = 0.5;

/// Facteur d'agrandissement par défaut du benchmark.
pub const DEFAULT_SCALE_UP_FACTOR: u32 = 2;

/// Dimension maximale (par axe) d'un raster de benchmark.
pub const MAX_RASTER_DIM: u32 = 32767;

/// Assombrissement par itération : le facteur appliqué à la couleur de
/// la racine vaut `DARKEN_BASE + DARKEN_SLOPE * itération`.
pub const DARKEN_BASE: i32 = 60;

/// Pente de l'assombrissement, voir [`DARKEN_BASE`].
pub const DARKEN_SLOPE: i32 = 8;
