use super::defaults::EPS;
use super::newton::newton_step;
use super::params::{Parameters, Point};

/// Trace l'orbite de Newton depuis le pixel `orbit_start` : le point de
/// départ puis chaque itéré successif, projetés en coordonnées écran.
/// L'itération s'arrête quand le pas passe sous [`EPS`] ou que la
/// dérivée dégénère ; l'itéré qui déclenche l'arrêt n'est pas
/// enregistré, si bien qu'un départ posé sur une racine donne une
/// polyligne de longueur 1.
pub fn trace_orbit(params: &Parameters) -> Vec<Point> {
    let start = params.point2complex(params.orbit_start);
    let mut points = vec![params.complex2point(start)];
    let mut z = start;
    for _ in 0..params.max_iterations {
        let Some(zn) = newton_step(params.roots.as_slice(), z, params.damping) else {
            break;
        };
        if (zn - z).norm() < EPS {
            break;
        }
        points.push(params.complex2point(zn));
        z = zn;
    }
    points
}
