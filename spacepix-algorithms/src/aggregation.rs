//! Cluster aggregation: weighted centroid and variance of a labelled cluster.
//!
//! One call handles one cluster, identified by its representative (the
//! member with the lowest local index). The representative rescans its
//! partition from its own position onwards; no cell is ever owned by a
//! representative with a higher index, so nothing before `cid` can belong
//! to the cluster.

use spacepix_core::glam::DVec2;
use spacepix_core::{CellSource, Measurement, Module, Partition, SignalModel, SlotView};

/// Result of aggregating one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedCluster {
    /// The measurement written to the output slot.
    pub measurement: Measurement,
    /// Number of member cells found, including those below threshold.
    pub cells: usize,
    /// Sum of activations of the members above threshold.
    pub total_weight: f64,
}

/// Read-only inputs shared by every aggregation unit of a pass.
pub struct AggregationContext<'a, C: ?Sized, S: ?Sized> {
    cells: &'a C,
    modules: &'a [Module],
    signal: &'a S,
}

impl<C: ?Sized, S: ?Sized> Clone for AggregationContext<'_, C, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized, S: ?Sized> Copy for AggregationContext<'_, C, S> {}

impl<'a, C, S> AggregationContext<'a, C, S>
where
    C: CellSource + ?Sized,
    S: SignalModel + ?Sized,
{
    /// Creates a context over the given cells, modules and signal model.
    pub fn new(cells: &'a C, modules: &'a [Module], signal: &'a S) -> Self {
        Self {
            cells,
            modules,
            signal,
        }
    }

    /// Aggregates the cluster represented by local cell `cid`.
    ///
    /// `labels[j]` is the representative of local cell `j`. Every member's
    /// global index is stamped with `link` in `cell_links`, and the
    /// resulting measurement is written to `measurements[link]`.
    ///
    /// Members whose signal weight does not exceed the module threshold are
    /// linked but left out of the statistics. Position and variance are
    /// weighted by the signal weight; `total_weight` reports the summed
    /// activation. If the passing members carry no weight, the measurement
    /// has zero position and zero variance.
    ///
    /// # Panics
    ///
    /// Panics if `cid` or `labels` do not match the partition, if the module
    /// index is out of range, or if `link` or a member index falls outside
    /// the corresponding output view.
    pub fn aggregate(
        &self,
        partition: Partition,
        labels: &[usize],
        cid: usize,
        link: usize,
        measurements: &mut SlotView<'_, Measurement>,
        cell_links: &mut SlotView<'_, usize>,
    ) -> AggregatedCluster {
        let size = partition.len();
        assert!(cid < size, "local index {cid} outside partition of {size} cells");
        assert_eq!(labels.len(), size, "label count does not match partition size");
        debug_assert_eq!(labels[cid], cid, "cell {cid} is not a cluster representative");

        let cells = self.cells;
        let rep = partition.global(cid);
        let module_index = cells.module(rep);
        let module = &self.modules[module_index];

        let mut total_weight = 0.0;
        let mut weight_sum = 0.0;
        let mut mean = DVec2::ZERO;
        let mut var = DVec2::ZERO;
        let mut max_channel1 = cells.channel1(rep);
        let mut members = 0;

        for (j, &label) in labels.iter().enumerate().skip(cid) {
            let pos = partition.global(j);
            let channel1 = cells.channel1(pos);

            // Past the cluster's band on the sort axis, or into the next
            // module: nothing further can be a member.
            if channel1 > max_channel1.saturating_add(1) || cells.module(pos) != module_index {
                break;
            }

            if label != cid {
                continue;
            }

            max_channel1 = max_channel1.max(channel1);
            members += 1;

            let activation = cells.activation(pos);
            let weight = self.signal.weight(activation, module);
            if weight > module.threshold {
                total_weight += activation;
                weight_sum += weight;
                // A zero-weight member contributes nothing to the moments.
                if weight_sum > 0.0 {
                    let position = module.cell_position(cells.channel0(pos), channel1);
                    let diff = position - mean;
                    mean += (weight / weight_sum) * diff;
                    var += weight * diff * (position - mean);
                }
            }

            cell_links.write(pos, link);
        }

        if weight_sum > 0.0 {
            var /= weight_sum;
            var += module.discretization_variance();
        }

        let measurement = Measurement::new(mean, var, module_index);
        measurements.write(link, measurement);

        AggregatedCluster {
            measurement,
            cells: members,
            total_weight,
        }
    }
}
