//! Field of an idealized magnetic point charge.
//!
//! Real magnets always come in north/south pairs; the isolated monopole
//! exists here purely as a computational primitive for the bar magnet
//! superposition.

use crate::constant::MIN_R_SQUARED;
use nalgebra::Vector2;

/// Calculates the field of a single monopole.
///
/// The field follows the inverse-distance point-charge analogy
/// `B = q * (r - r_pole) / |r - r_pole|^2`, not a true dipole or
/// Biot-Savart law. A squared distance of exactly zero is replaced by
/// [MIN_R_SQUARED](crate::constant::MIN_R_SQUARED), so sampling at the pole
/// itself yields a large but finite value.
///
/// # Arguments
///
/// `point`: position of the sample.
///
/// `pole`: position of the monopole.
///
/// `strength`: signed strength `q` of the monopole.
pub fn field_at(point: Vector2<f64>, pole: Vector2<f64>, strength: f64) -> Vector2<f64> {
    let delta = point - pole;
    let mut r_squared = delta.norm_squared();
    if r_squared == 0.0 {
        r_squared = MIN_R_SQUARED;
    }
    delta * (strength / r_squared)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_monopole_field() {
        let field = field_at(Vector2::new(1.0, 0.0), Vector2::new(0.0, 0.0), 2.0);
        assert_eq!(field, Vector2::new(2.0, 0.0));

        // at distance 2 the inverse-distance law halves the magnitude
        let field = field_at(Vector2::new(0.0, 2.0), Vector2::new(0.0, 0.0), 2.0);
        assert_approx_eq!(field.x, 0.0);
        assert_approx_eq!(field.y, 1.0);
    }

    #[test]
    fn test_field_is_antisymmetric_in_strength() {
        let point = Vector2::new(0.3, -1.7);
        let pole = Vector2::new(-0.4, 0.2);
        let plus = field_at(point, pole, 5.0);
        let minus = field_at(point, pole, -5.0);
        assert_eq!(plus, -minus);
    }

    #[test]
    fn test_sample_at_pole_is_finite() {
        let pole = Vector2::new(1.5, 0.0);
        let field = field_at(pole, pole, 5.0);
        assert!(!field.x.is_nan() && !field.y.is_nan());
        assert!(field.x.is_finite() && field.y.is_finite());
    }
}
