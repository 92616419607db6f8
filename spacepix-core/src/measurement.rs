//! Measurement and spacepoint types.

use glam::{DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weighted centroid of one cluster in module-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Weighted mean position.
    pub local: DVec2,
    /// Diagonal of the position covariance.
    pub variance: DVec2,
    /// Index of the owning module.
    pub module: usize,
}

impl Measurement {
    /// Creates a new measurement.
    #[must_use]
    pub fn new(local: DVec2, variance: DVec2, module: usize) -> Self {
        Self {
            local,
            variance,
            module,
        }
    }
}

/// A measurement projected into the global frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spacepoint {
    /// Global position.
    pub global: DVec3,
    /// The measurement this point was derived from.
    pub measurement: Measurement,
}

impl Spacepoint {
    /// Global x.
    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.global.x
    }

    /// Global y.
    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.global.y
    }

    /// Global z.
    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.global.z
    }

    /// Transverse distance from the beam axis.
    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.global.truncate().length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacepoint_accessors() {
        let sp = Spacepoint {
            global: DVec3::new(3.0, 4.0, 5.0),
            measurement: Measurement::new(DVec2::new(1.0, 2.0), DVec2::ZERO, 1),
        };
        assert!((sp.x() - 3.0).abs() < f64::EPSILON);
        assert!((sp.z() - 5.0).abs() < f64::EPSILON);
        assert!((sp.radius() - 5.0).abs() < f64::EPSILON);
        assert_eq!(sp.measurement.module, 1);
    }
}
