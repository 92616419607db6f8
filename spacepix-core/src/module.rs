//! Detector module geometry.

use glam::{DAffine3, DMat3, DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One physical sensor: pixel grid geometry, activation threshold and its
/// placement in the global frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Module {
    /// Pixel pitch along `channel0` and `channel1`.
    pub pitch: DVec2,
    /// Local position of the centre of cell (0, 0).
    pub origin: DVec2,
    /// Cells whose signal weight does not exceed this value are left out of
    /// the weighted statistics.
    pub threshold: f64,
    /// Local-to-global rigid transform.
    pub placement: DAffine3,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            pitch: DVec2::ONE,
            origin: DVec2::ZERO,
            threshold: 0.0,
            placement: DAffine3::IDENTITY,
        }
    }
}

impl Module {
    /// Creates a module with the given pitch, placed at the global origin.
    #[must_use]
    pub fn new(pitch_x: f64, pitch_y: f64) -> Self {
        Self {
            pitch: DVec2::new(pitch_x, pitch_y),
            ..Self::default()
        }
    }

    /// Sets the local position of the centre of cell (0, 0).
    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = DVec2::new(x, y);
        self
    }

    /// Sets the activation threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the placement from a rotation matrix and translation.
    #[must_use]
    pub fn with_placement(mut self, rotation: DMat3, translation: DVec3) -> Self {
        self.placement = DAffine3::from_mat3_translation(rotation, translation);
        self
    }

    /// Local position of the centre of a cell.
    #[inline]
    #[must_use]
    pub fn cell_position(&self, channel0: u32, channel1: u32) -> DVec2 {
        self.origin + DVec2::new(f64::from(channel0), f64::from(channel1)) * self.pitch
    }

    /// Variance of a uniform distribution over one pixel, per axis.
    #[inline]
    #[must_use]
    pub fn discretization_variance(&self) -> DVec2 {
        self.pitch * self.pitch / 12.0
    }

    /// Maps a local point on the sensor plane into the global frame.
    #[inline]
    #[must_use]
    pub fn local_to_global(&self, local: DVec2) -> DVec3 {
        self.placement.transform_point3(local.extend(0.0))
    }

    /// Checks that the pitch is positive and finite and the placement holds
    /// only finite values.
    ///
    /// The clustering kernels never call this; it is meant for loaders.
    pub fn validate(&self, index: usize) -> Result<()> {
        if !(self.pitch.is_finite() && self.pitch.x > 0.0 && self.pitch.y > 0.0) {
            return Err(Error::InvalidGeometry {
                module: index,
                reason: format!("pitch must be positive, got {}", self.pitch),
            });
        }
        if !self.placement.is_finite() {
            return Err(Error::InvalidGeometry {
                module: index,
                reason: "placement contains non-finite values".to_string(),
            });
        }
        Ok(())
    }
}
