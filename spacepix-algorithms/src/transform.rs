//! Local measurement to global spacepoint.

use rayon::prelude::*;
use spacepix_core::{Measurement, Module, SlotView, Spacepoint};

/// Projects a measurement through its module placement.
///
/// The local mean is taken as a point on the sensor plane (third coordinate
/// zero) and mapped with the module's local-to-global transform.
#[inline]
#[must_use]
pub fn to_spacepoint(measurement: &Measurement, module: &Module) -> Spacepoint {
    Spacepoint {
        global: module.local_to_global(measurement.local),
        measurement: *measurement,
    }
}

/// Builds the spacepoint of `measurement` and stores it in slot `link`.
///
/// # Panics
///
/// Panics if the measurement's module index is out of range or `link` is
/// outside `spacepoints`.
pub fn write_spacepoint(
    measurement: &Measurement,
    modules: &[Module],
    spacepoints: &mut SlotView<'_, Spacepoint>,
    link: usize,
) -> Spacepoint {
    let spacepoint = to_spacepoint(measurement, &modules[measurement.module]);
    spacepoints.write(link, spacepoint);
    spacepoint
}

/// Converts a whole measurement collection, one spacepoint per slot.
#[must_use]
pub fn spacepoints_from_measurements(
    measurements: &[Measurement],
    modules: &[Module],
) -> Vec<Spacepoint> {
    measurements
        .par_iter()
        .map(|m| to_spacepoint(m, &modules[m.module]))
        .collect()
}
