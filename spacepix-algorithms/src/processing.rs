//! Host pipeline: partition, label, aggregate and transform a cell
//! collection in one call.

use crate::aggregation::AggregationContext;
use crate::labeling::{count_clusters, label_partition, representatives};
use crate::partitioning::partition_cells;
use crate::transform::write_spacepoint;
use log::{debug, warn};
use rayon::prelude::*;
use spacepix_core::{
    find_unsorted, CellSource, ClusteringConfig, ClusteringStatistics, Error, IdentitySignal,
    Measurement, Module, Partition, Result, SignalModel, SlotView, Spacepoint,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything produced by one clustering pass.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringOutput {
    /// One measurement per cluster, indexed by link.
    pub measurements: Vec<Measurement>,
    /// Spacepoints, same indexing as `measurements`.
    pub spacepoints: Vec<Spacepoint>,
    /// Link of the measurement each cell contributed to.
    pub cell_links: Vec<Option<usize>>,
    /// Pass counters.
    pub statistics: ClusteringStatistics,
}

impl ClusteringOutput {
    /// Number of clusters found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Returns true if no cluster was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Global indices of the cells linked to measurement `link`.
    pub fn cluster_cells(&self, link: usize) -> impl Iterator<Item = usize> + '_ {
        self.cell_links
            .iter()
            .enumerate()
            .filter(move |(_, l)| **l == Some(link))
            .map(|(i, _)| i)
    }
}

/// Checks module references, module geometry and the (module, channel1)
/// ordering the kernels depend on.
pub fn validate_input<C: CellSource + ?Sized>(cells: &C, modules: &[Module]) -> Result<()> {
    for (index, module) in modules.iter().enumerate() {
        module.validate(index)?;
    }
    if let Some(cell) = (0..cells.len()).find(|&i| cells.module(i) >= modules.len()) {
        return Err(Error::InvalidModule {
            cell,
            module: cells.module(cell),
            modules: modules.len(),
        });
    }
    if let Some(index) = find_unsorted(cells) {
        return Err(Error::UnsortedCells { index });
    }
    Ok(())
}

/// Output views and labels owned by one partition.
struct PartitionJob<'a> {
    partition: Partition,
    labels: &'a [usize],
    measurements: SlotView<'a, Measurement>,
    spacepoints: SlotView<'a, Spacepoint>,
    cell_links: SlotView<'a, usize>,
}

/// Clustering pipeline over sorted cells.
#[derive(Debug, Clone, Default)]
pub struct ClusteringPipeline<S = IdentitySignal> {
    config: ClusteringConfig,
    signal: S,
}

impl ClusteringPipeline<IdentitySignal> {
    /// Create with custom configuration and the identity signal model.
    #[must_use]
    pub fn new(config: ClusteringConfig) -> Self {
        Self {
            config,
            signal: IdentitySignal,
        }
    }
}

impl<S: SignalModel> ClusteringPipeline<S> {
    /// Replaces the signal model.
    #[must_use]
    pub fn with_signal_model<T: SignalModel>(self, signal: T) -> ClusteringPipeline<T> {
        ClusteringPipeline {
            config: self.config,
            signal,
        }
    }

    /// Set whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Get current configuration.
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Get the signal model.
    pub fn signal_model(&self) -> &S {
        &self.signal
    }

    /// Clusters `cells` and returns one measurement and spacepoint per
    /// cluster.
    ///
    /// Cells must be sorted by (module, channel1), see
    /// [`sort_cells`](spacepix_core::sort_cells). Measurements are numbered
    /// partition by partition, and by representative index within a
    /// partition, so sequential and parallel runs give identical output.
    pub fn run<C: CellSource + ?Sized>(
        &self,
        cells: &C,
        modules: &[Module],
    ) -> Result<ClusteringOutput> {
        self.config.validate()?;
        if self.config.validate_input {
            validate_input(cells, modules)?;
        }

        let n = cells.len();
        if n == 0 {
            return Ok(ClusteringOutput::default());
        }

        let partitions = partition_cells(cells, self.config.target_partition_size);
        if let Some(p) = partitions
            .iter()
            .find(|p| p.len() > self.config.max_partition_size)
        {
            warn!(
                "partition [{}, {}) has {} cells, exceeding the limit of {}",
                p.start,
                p.end,
                p.len(),
                self.config.max_partition_size
            );
            return Err(Error::PartitionTooLarge {
                start: p.start,
                end: p.end,
                size: p.len(),
                limit: self.config.max_partition_size,
            });
        }

        let labels: Vec<Vec<usize>> = if self.config.parallel {
            partitions
                .par_iter()
                .map(|&p| label_partition(cells, p))
                .collect()
        } else {
            partitions
                .iter()
                .map(|&p| label_partition(cells, p))
                .collect()
        };

        let cluster_counts: Vec<usize> = labels.iter().map(|l| count_clusters(l)).collect();
        let partition_sizes: Vec<usize> = partitions.iter().map(Partition::len).collect();
        let total_clusters: usize = cluster_counts.iter().sum();

        let mut measurements = vec![None; total_clusters];
        let mut spacepoints = vec![None; total_clusters];
        let mut cell_links = vec![None; n];

        let jobs: Vec<PartitionJob<'_>> = partitions
            .iter()
            .zip(&labels)
            .zip(SlotView::new(&mut measurements).split_lengths(&cluster_counts))
            .zip(SlotView::new(&mut spacepoints).split_lengths(&cluster_counts))
            .zip(SlotView::new(&mut cell_links).split_lengths(&partition_sizes))
            .map(
                |((((&partition, labels), measurements), spacepoints), cell_links)| PartitionJob {
                    partition,
                    labels,
                    measurements,
                    spacepoints,
                    cell_links,
                },
            )
            .collect();

        let ctx = AggregationContext::new(cells, modules, &self.signal);
        let largest_cluster = if self.config.parallel {
            jobs.into_par_iter()
                .map(|job| Self::process_partition(ctx, modules, job))
                .max()
        } else {
            jobs.into_iter()
                .map(|job| Self::process_partition(ctx, modules, job))
                .max()
        }
        .unwrap_or(0);

        let measurements: Vec<Measurement> = measurements.into_iter().flatten().collect();
        let spacepoints: Vec<Spacepoint> = spacepoints.into_iter().flatten().collect();
        debug_assert_eq!(measurements.len(), total_clusters);
        debug_assert_eq!(spacepoints.len(), total_clusters);

        let statistics = ClusteringStatistics {
            cells_processed: n,
            partitions: partitions.len(),
            clusters_found: total_clusters,
            largest_partition: partition_sizes.iter().copied().max().unwrap_or(0),
            largest_cluster,
        };
        debug!(
            "clustered {} cells in {} partitions into {} measurements (largest cluster {})",
            statistics.cells_processed,
            statistics.partitions,
            statistics.clusters_found,
            statistics.largest_cluster
        );

        Ok(ClusteringOutput {
            measurements,
            spacepoints,
            cell_links,
            statistics,
        })
    }

    /// Aggregates every cluster of one partition; returns the largest
    /// cluster size seen.
    fn process_partition<C: CellSource + ?Sized>(
        ctx: AggregationContext<'_, C, S>,
        modules: &[Module],
        job: PartitionJob<'_>,
    ) -> usize {
        let PartitionJob {
            partition,
            labels,
            mut measurements,
            mut spacepoints,
            mut cell_links,
        } = job;

        let mut largest = 0;
        for (link, cid) in measurements.range().zip(representatives(labels)) {
            let cluster = ctx.aggregate(
                partition,
                labels,
                cid,
                link,
                &mut measurements,
                &mut cell_links,
            );
            write_spacepoint(&cluster.measurement, modules, &mut spacepoints, link);
            largest = largest.max(cluster.cells);
        }
        largest
    }
}

/// Cluster sorted cells with the identity signal model.
pub fn cluster_and_aggregate<C: CellSource + ?Sized>(
    cells: &C,
    modules: &[Module],
    config: &ClusteringConfig,
) -> Result<ClusteringOutput> {
    ClusteringPipeline::new(config.clone()).run(cells, modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spacepix_core::{sort_cells, Cell, ConstantSignal};

    fn two_modules() -> Vec<Module> {
        vec![Module::new(1.0, 1.0), Module::new(0.5, 0.5)]
    }

    fn sample_cells() -> Vec<Cell> {
        let mut cells = vec![
            Cell::new(0, 0, 10.0, 0),
            Cell::new(1, 0, 10.0, 0),
            Cell::new(0, 1, 10.0, 0),
            Cell::new(50, 50, 4.0, 0),
            Cell::new(3, 3, 8.0, 1),
            Cell::new(3, 4, 8.0, 1),
        ];
        sort_cells(&mut cells);
        cells
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let cells = sample_cells();
        let output =
            cluster_and_aggregate(&cells, &two_modules(), &ClusteringConfig::default()).unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output.statistics.cells_processed, 6);
        assert_eq!(output.statistics.partitions, 2);
        assert_eq!(output.statistics.largest_cluster, 3);
        assert!(output.cell_links.iter().all(Option::is_some));

        let first = output.measurements[0];
        assert_relative_eq!(first.local.x, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(first.local.y, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(output.cluster_cells(0).collect::<Vec<_>>(), vec![0, 1, 2]);

        let last = output.spacepoints[2];
        assert_eq!(last.measurement.module, 1);
        assert_relative_eq!(last.y(), 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cells = sample_cells();
        let modules = two_modules();
        let config = ClusteringConfig::default().with_target_partition_size(1);

        let parallel = ClusteringPipeline::new(config.clone())
            .run(&cells, &modules)
            .unwrap();
        let sequential = ClusteringPipeline::new(config)
            .with_parallel(false)
            .run(&cells, &modules)
            .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_custom_signal_model() {
        let cells = sample_cells();
        let pipeline = ClusteringPipeline::new(ClusteringConfig::default())
            .with_signal_model(ConstantSignal(1.0));
        assert_eq!(pipeline.signal_model().name(), "Constant");
        let output = pipeline.run(&cells, &two_modules()).unwrap();
        assert_eq!(output.len(), 3);

        // The isolated cell at (50, 50) keeps its own position.
        let single = output.measurements[1];
        assert_relative_eq!(single.local.x, 50.0, epsilon = 1e-12);
        assert_relative_eq!(single.local.y, 50.0, epsilon = 1e-12);
        assert_relative_eq!(single.variance.x, 1.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(single.variance.y, 1.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let cells: Vec<Cell> = Vec::new();
        let output = cluster_and_aggregate(&cells, &[], &ClusteringConfig::default()).unwrap();
        assert!(output.is_empty());
        assert!(output.cell_links.is_empty());
    }

    #[test]
    fn test_rejects_unknown_module() {
        let cells = vec![Cell::new(0, 0, 1.0, 3)];
        let err = cluster_and_aggregate(&cells, &two_modules(), &ClusteringConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidModule {
                cell: 0,
                module: 3,
                modules: 2
            }
        );
    }

    #[test]
    fn test_rejects_unsorted_cells() {
        let cells = vec![Cell::new(0, 5, 1.0, 0), Cell::new(0, 1, 1.0, 0)];
        let err = cluster_and_aggregate(&cells, &two_modules(), &ClusteringConfig::default())
            .unwrap_err();
        assert_eq!(err, Error::UnsortedCells { index: 1 });
    }

    #[test]
    fn test_rejects_oversized_partition() {
        let cells: Vec<Cell> = (0..10).map(|r| Cell::new(0, r, 1.0, 0)).collect();
        let config = ClusteringConfig::default()
            .with_target_partition_size(2)
            .with_max_partition_size(4);
        let err = cluster_and_aggregate(&cells, &two_modules(), &config).unwrap_err();
        assert!(matches!(err, Error::PartitionTooLarge { size: 10, .. }));
    }
}
