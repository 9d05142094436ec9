use serde::{Deserialize, Serialize};

use super::defaults::{SIZE_FACTOR, ZOOM_STEP};

/// Rectangle du plan complexe (bornes d'affichage).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Window {
    /// Rectangle centré sur l'origine, de demi-largeur `hw` et
    /// demi-hauteur `hh`.
    fn centered(hw: f64, hh: f64) -> Self {
        Window {
            left: -hw,
            right: hw,
            top: hh,
            bottom: -hh,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    fn grow(&mut self, gx: f64, gy: f64) {
        self.left -= gx;
        self.right += gx;
        self.top += gy;
        self.bottom -= gy;
    }
}

/// Fenêtre du plan complexe : les bornes courantes d'affichage plus les
/// bornes « d'origine », deux rectangles indépendants maintenus au même
/// pas par les déplacements et redimensionnements. Seul le zoom les fait
/// diverger, ce qui rend le facteur de zoom stable par ailleurs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Limits {
    current: Window,
    original: Window,
}

impl Default for Limits {
    fn default() -> Self {
        let unit = Window::centered(1.0, 1.0);
        Limits {
            current: unit,
            original: unit,
        }
    }
}

impl PartialEq for Limits {
    /// Deux fenêtres sont égales si leurs bornes courantes coïncident.
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl Limits {
    /// Fenêtre dont les deux rectangles valent les bornes données.
    pub fn from_bounds(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        let w = Window {
            left,
            right,
            top,
            bottom,
        };
        Limits {
            current: w,
            original: w,
        }
    }

    pub fn left(&self) -> f64 {
        self.current.left
    }

    pub fn right(&self) -> f64 {
        self.current.right
    }

    pub fn top(&self) -> f64 {
        self.current.top
    }

    pub fn bottom(&self) -> f64 {
        self.current.bottom
    }

    pub fn width(&self) -> f64 {
        self.current.width()
    }

    pub fn height(&self) -> f64 {
        self.current.height()
    }

    #[allow(dead_code)]
    pub fn original(&self) -> &Window {
        &self.original
    }

    /// Rapport entre la largeur d'origine et la largeur courante.
    /// Invariant par déplacement et redimensionnement.
    #[allow(dead_code)]
    pub fn zoom_factor(&self) -> f64 {
        self.original.width() / self.current.width()
    }

    /// Redimensionne les bornes courantes autour de leur milieu pour que
    /// `zoom_factor()` vaille `zf`. Sans effet si `zf` n'est pas positif.
    #[allow(dead_code)]
    pub fn set_zoom_factor(&mut self, zf: f64) {
        if zf <= 0.0 {
            return;
        }
        let w2 = 0.5 * self.original.width() / zf;
        let h2 = 0.5 * self.original.height() / zf;
        let x_mid = 0.5 * (self.current.left + self.current.right);
        let y_mid = 0.5 * (self.current.top + self.current.bottom);
        self.current = Window {
            left: x_mid - w2,
            right: x_mid + w2,
            top: y_mid + h2,
            bottom: y_mid - h2,
        };
    }

    /// Déplace les deux rectangles d'un delta complexe.
    #[allow(dead_code)]
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.current.translate(dx, dy);
        self.original.translate(dx, dy);
    }

    /// Agrandit ou rétrécit les deux rectangles d'un delta exprimé en
    /// pixels, converti en unités du plan.
    #[allow(dead_code)]
    pub fn resize(&mut self, dw: f64, dh: f64) {
        self.current.grow(SIZE_FACTOR * dw, SIZE_FACTOR * dh);
        self.original.grow(SIZE_FACTOR * dw, SIZE_FACTOR * dh);
    }

    /// Réinitialise les deux rectangles à la taille donnée en pixels,
    /// centrés sur l'origine.
    #[allow(dead_code)]
    pub fn reset(&mut self, width_px: u32, height_px: u32) {
        let w = Window::centered(SIZE_FACTOR * width_px as f64, SIZE_FACTOR * height_px as f64);
        self.current = w;
        self.original = w;
    }

    /// Zoome les bornes courantes vers (ou depuis) le point relatif
    /// `(xw, yw)` de la fenêtre, chacun dans [0, 1]. Les bornes d'origine
    /// ne bougent pas.
    #[allow(dead_code)]
    pub fn zoom(&mut self, zoom_in: bool, xw: f64, yw: f64) {
        let zoom = if zoom_in { -ZOOM_STEP } else { ZOOM_STEP };
        let w_zoom = self.current.width() * zoom;
        let h_zoom = self.current.height() * zoom;
        self.current.left -= xw * w_zoom;
        self.current.right += (1.0 - xw) * w_zoom;
        self.current.top += yw * h_zoom;
        self.current.bottom -= (1.0 - yw) * h_zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_unit_square() {
        let l = Limits::default();
        assert_eq!(
            (l.left(), l.right(), l.top(), l.bottom()),
            (-1.0, 1.0, 1.0, -1.0)
        );
        assert_eq!(l.zoom_factor(), 1.0);
    }

    #[test]
    fn test_move_keeps_zoom_factor() {
        let mut l = Limits::default();
        l.zoom(true, 0.5, 0.5);
        let zf = l.zoom_factor();
        l.move_by(0.25, -0.75);
        assert!((l.zoom_factor() - zf).abs() < 1e-12);
        assert!((l.left() - (-0.95 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_resize_keeps_zoom_factor() {
        let mut l = Limits::default();
        l.zoom(true, 0.5, 0.5);
        let zf = l.zoom_factor();
        l.resize(70.0, -35.0);
        assert!((l.zoom_factor() - zf).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_in_shrinks_current_only() {
        let mut l = Limits::default();
        l.zoom(true, 0.5, 0.5);
        assert!(l.width() < 2.0);
        assert_eq!(l.original().width(), 2.0);
        assert!(l.zoom_factor() > 1.0);
    }

    #[test]
    fn test_zoom_towards_corner_pins_it() {
        // Zoomer vers (0, 0) : le coin haut-gauche ne bouge pas
        let mut l = Limits::default();
        l.zoom(true, 0.0, 0.0);
        assert_eq!(l.left(), -1.0);
        assert_eq!(l.top(), 1.0);
        assert!(l.right() < 1.0);
        assert!(l.bottom() > -1.0);
    }

    #[test]
    fn test_set_zoom_factor_round_trip() {
        let mut l = Limits::default();
        l.move_by(0.3, 0.1);
        l.set_zoom_factor(4.0);
        assert!((l.zoom_factor() - 4.0).abs() < 1e-12);
        // le milieu est conservé
        assert!((0.5 * (l.left() + l.right()) - 0.3).abs() < 1e-12);
        assert!((0.5 * (l.top() + l.bottom()) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_set_zoom_factor_rejects_non_positive() {
        let mut l = Limits::default();
        let before = l;
        l.set_zoom_factor(0.0);
        l.set_zoom_factor(-2.0);
        assert_eq!(l, before);
    }

    #[test]
    fn test_reset_follows_pixel_size() {
        let mut l = Limits::default();
        l.zoom(true, 0.2, 0.8);
        l.reset(700, 350);
        assert!((l.width() - 2.0).abs() < 1e-12);
        assert!((l.height() - 1.0).abs() < 1e-12);
        assert_eq!(l.zoom_factor(), 1.0);
    }
}
