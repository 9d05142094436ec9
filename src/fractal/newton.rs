use num_complex::Complex64;

use super::defaults::{DERIVATIVE_STEP, EPS, MIN_DERIVATIVE_NORM};
use super::roots::Root;

/// Évalue simultanément p(z) = produit des (z - vᵢ) et sa dérivée p'(z)
/// en un seul balayage des racines, par la récurrence produit : `r`
/// accumule le produit partiel et `l` la somme des produits privés d'un
/// facteur. Sans racine, p vaut 1 et p' vaut 0.
pub fn eval_with_derivative(roots: &[Root], z: Complex64) -> (Complex64, Complex64) {
    let k = roots.len();
    match k {
        0 => (Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)),
        1 => (z - roots[0].value(), Complex64::new(1.0, 0.0)),
        _ => {
            let mut r = z - roots[0].value();
            let mut l = z - roots[1].value();
            for i in 1..k - 1 {
                l = (z - roots[i + 1].value()) * (l + r);
                r *= z - roots[i].value();
            }
            (r * (z - roots[k - 1].value()), l + r)
        }
    }
}

/// Dérivée de p par différences finies centrées, avec un pas complexe
/// de [`DERIVATIVE_STEP`] sur chaque axe. Sert de contre-épreuve à la
/// récurrence.
#[allow(dead_code)]
pub fn numeric_derivative(roots: &[Root], z: Complex64) -> Complex64 {
    let h = Complex64::new(DERIVATIVE_STEP, DERIVATIVE_STEP);
    let (ahead, _) = eval_with_derivative(roots, z + h);
    let (behind, _) = eval_with_derivative(roots, z - h);
    (ahead - behind) / (2.0 * h)
}

/// Un pas de Newton amorti : z - amortissement * p(z) / p'(z). Renvoie
/// `None` si la dérivée est trop proche de zéro pour diviser ou si le
/// calcul sort des flottants finis.
pub fn newton_step(roots: &[Root], z: Complex64, damping: Complex64) -> Option<Complex64> {
    let (f, df) = eval_with_derivative(roots, z);
    if !df.is_finite() || df.norm() < MIN_DERIVATIVE_NORM {
        return None;
    }
    let zn = z - damping * f / df;
    if !zn.is_finite() {
        return None;
    }
    Some(zn)
}

/// Itère Newton depuis `start` et renvoie `(indice de racine, itération
/// de convergence)` si la suite se stabilise (pas plus court que
/// [`EPS`]) sur l'une des racines. Renvoie `None` si la dérivée
/// dégénère, si le plafond d'itérations est atteint, ou si la suite se
/// stabilise loin de toute racine.
pub fn find_attractor(
    roots: &[Root],
    start: Complex64,
    max_iterations: u16,
    damping: Complex64,
) -> Option<(usize, u16)> {
    let mut z = start;
    for i in 0..max_iterations {
        let zn = newton_step(roots, z, damping)?;
        if (zn - z).norm() < EPS {
            return roots
                .iter()
                .position(|root| (zn - root.value()).norm() < EPS)
                .map(|index| (index, i));
        }
        z = zn;
    }
    None
}
