//! spacepix-algorithms: Sparse clustering kernels and the host pipeline.
//!
//! The kernels run one independent unit per cell or per cluster:
//! - **Adjacency** - bounded neighbour scan over a sorted partition
//! - **Aggregation** - streaming weighted centroid and variance per cluster
//! - **Transform** - local measurement to global spacepoint
//!
//! Partitioning, labelling and the [`ClusteringPipeline`] drive the kernels
//! over a whole event, sequentially or on the rayon thread pool.
//!
#![warn(missing_docs)]

pub mod adjacency;
pub mod aggregation;
pub mod labeling;
pub mod partitioning;
mod processing;
pub mod transform;

pub use adjacency::{find_all_neighbors, find_neighbors, NeighborList, MAX_NEIGHBORS};
pub use aggregation::{AggregatedCluster, AggregationContext};
pub use labeling::{count_clusters, label_partition, representatives};
pub use partitioning::partition_cells;
pub use processing::{cluster_and_aggregate, validate_input, ClusteringOutput, ClusteringPipeline};
pub use transform::{spacepoints_from_measurements, to_spacepoint, write_spacepoint};

// Re-export core clustering types
pub use spacepix_core::clustering::{ClusteringConfig, ClusteringStatistics, Partition};
