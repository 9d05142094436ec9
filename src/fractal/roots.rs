use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use super::defaults::MAX_ROOT_COUNT;

/// Racine du polynôme : position dans le plan complexe et couleur
/// d'affichage du bassin d'attraction associé.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Root {
    value: Complex64,
    color: Rgb,
}

impl Root {
    pub fn new(value: Complex64, color: Rgb) -> Self {
        Root { value, color }
    }

    #[inline]
    pub fn value(&self) -> Complex64 {
        self.value
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_value(&mut self, value: Complex64) {
        self.value = value;
    }

    #[allow(dead_code)]
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Translate la racine d'un déplacement complexe.
    #[allow(dead_code)]
    pub fn translate(&mut self, delta: Complex64) {
        self.value += delta;
    }
}

/// Ensemble ordonné des racines du polynôme.
///
/// L'ensemble peut être vide ou dépasser transitoirement la limite pendant
/// une édition ; le moteur rejette les ensembles vides et tronque au-delà
/// de la limite au moment de la soumission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootSet {
    roots: Vec<Root>,
}

impl RootSet {
    pub fn new() -> Self {
        RootSet { roots: Vec::new() }
    }

    /// `count` racines équidistantes sur le cercle unité, aux angles
    /// `2πk / count`, colorées avec la palette prédéfinie.
    pub fn equidistant(count: usize) -> Self {
        let count = count.clamp(1, MAX_ROOT_COUNT);
        let roots = (0..count)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / count as f64;
                Root::new(Complex64::new(angle.cos(), angle.sin()), Rgb::predefined(i))
            })
            .collect();
        RootSet { roots }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Root] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Root> {
        self.roots.iter()
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Option<&Root> {
        self.roots.get(index)
    }

    #[allow(dead_code)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Root> {
        self.roots.get_mut(index)
    }

    /// Ajoute une racine. Retourne false si l'ensemble est déjà plein.
    pub fn push(&mut self, root: Root) -> bool {
        if self.roots.len() >= MAX_ROOT_COUNT {
            return false;
        }
        self.roots.push(root);
        true
    }

    /// Retire et retourne la racine d'index donné, s'il existe.
    #[allow(dead_code)]
    pub fn remove(&mut self, index: usize) -> Option<Root> {
        if index < self.roots.len() {
            Some(self.roots.remove(index))
        } else {
            None
        }
    }

    /// Échange deux racines (réordonnancement).
    #[allow(dead_code)]
    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.roots.len() && b < self.roots.len() {
            self.roots.swap(a, b);
        }
    }

    /// Tronque l'ensemble à `max` racines.
    pub fn clamp_len(&mut self, max: usize) {
        self.roots.truncate(max);
    }

    /// Replace les racines existantes aux positions équidistantes du
    /// cercle unité, en conservant leurs couleurs.
    #[allow(dead_code)]
    pub fn spread_equidistant(&mut self) {
        let count = self.roots.len();
        for (i, root) in self.roots.iter_mut().enumerate() {
            let angle = 2.0 * PI * i as f64 / count as f64;
            root.set_value(Complex64::new(angle.cos(), angle.sin()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equidistant_positions_and_colors() {
        let set = RootSet::equidistant(4);
        assert_eq!(set.len(), 4);
        let r0 = set.get(0).unwrap();
        assert!((r0.value() - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        let r1 = set.get(1).unwrap();
        assert!((r1.value() - Complex64::new(0.0, 1.0)).norm() < 1e-12);
        assert_eq!(r0.color(), Rgb::predefined(0));
        assert_eq!(r1.color(), Rgb::predefined(1));
    }

    #[test]
    fn test_equidistant_clamps_count() {
        assert_eq!(RootSet::equidistant(0).len(), 1);
        assert_eq!(RootSet::equidistant(50).len(), MAX_ROOT_COUNT);
    }

    #[test]
    fn test_push_refuses_beyond_limit() {
        let mut set = RootSet::equidistant(MAX_ROOT_COUNT);
        let extra = Root::new(Complex64::new(0.0, 0.0), Rgb::predefined(0));
        assert!(!set.push(extra));
        assert_eq!(set.len(), MAX_ROOT_COUNT);
    }

    #[test]
    fn test_remove_and_swap() {
        let mut set = RootSet::equidistant(3);
        let c0 = set.get(0).unwrap().color();
        let c2 = set.get(2).unwrap().color();
        set.swap(0, 2);
        assert_eq!(set.get(0).unwrap().color(), c2);
        assert_eq!(set.get(2).unwrap().color(), c0);
        assert!(set.remove(1).is_some());
        assert_eq!(set.len(), 2);
        assert!(set.remove(7).is_none());
    }

    #[test]
    fn test_spread_keeps_colors() {
        let mut set = RootSet::equidistant(3);
        set.get_mut(1).unwrap().set_value(Complex64::new(5.0, 5.0));
        let colors: Vec<_> = set.iter().map(|r| r.color()).collect();
        set.spread_equidistant();
        let after: Vec<_> = set.iter().map(|r| r.color()).collect();
        assert_eq!(colors, after);
        assert!((set.get(1).unwrap().value().norm() - 1.0).abs() < 1e-12);
    }
}
