use num_complex::Complex64;

use crate::color::Rgb;
use crate::fractal::defaults::{DARKEN_BASE, DARKEN_SLOPE};
use crate::fractal::newton::find_attractor;
use crate::fractal::params::{Parameters, Point};
use crate::fractal::roots::Root;

/// Couleur de fond des pixels non convergés.
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// Couleur d'un point du plan : la couleur de la racine atteinte,
/// assombrie de [`DARKEN_BASE`] plus [`DARKEN_SLOPE`] par itération,
/// ou le fond si l'itération n'aboutit pas.
pub fn shade(roots: &[Root], z: Complex64, max_iterations: u16, damping: Complex64) -> Rgb {
    match find_attractor(roots, z, max_iterations, damping) {
        Some((index, iterations)) => roots[index]
            .color()
            .darker(DARKEN_BASE + DARKEN_SLOPE * iterations as i32),
        None => BACKGROUND,
    }
}

/// Rend la ligne `y` dans `row` (octets RVB, `3 * width` octets).
/// `params.width` et `params.height` doivent être la taille effective
/// du raster en cours de rendu, pas la taille d'affichage.
pub fn render_row(params: &Parameters, y: u32, row: &mut [u8]) {
    let roots = params.roots.as_slice();
    for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
        let z = params.point2complex(Point::new(x as i32, y as i32));
        let color = shade(roots, z, params.max_iterations, params.damping);
        pixel[0] = color.r;
        pixel[1] = color.g;
        pixel[2] = color.b;
    }
}
