//! Clustering configuration, partitions and run statistics.

use std::ops::Range;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A contiguous range `[start, end)` of the sorted cell sequence that is
/// clustered as one unit.
///
/// Indices inside a partition are "local": local index `i` is global cell
/// `start + i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Partition {
    /// First global cell index.
    pub start: usize,
    /// One past the last global cell index.
    pub end: usize,
}

impl Partition {
    /// Creates a new partition.
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "partition start {start} past end {end}");
        Self { start, end }
    }

    /// Number of cells in the partition.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the partition holds no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Global index of local index `local`.
    #[inline]
    #[must_use]
    pub fn global(&self, local: usize) -> usize {
        self.start + local
    }

    /// Global cell indices covered.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Configuration for the host clustering pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringConfig {
    /// Preferred number of cells per partition.
    pub target_partition_size: usize,
    /// Hard limit on cells per partition.
    pub max_partition_size: usize,
    /// Dispatch partitions across the rayon thread pool.
    pub parallel: bool,
    /// Check module references and sort order before clustering.
    pub validate_input: bool,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            target_partition_size: 1024,
            max_partition_size: 4096,
            parallel: true,
            validate_input: true,
        }
    }
}

impl ClusteringConfig {
    /// Creates a new clustering configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred partition size.
    #[must_use]
    pub fn with_target_partition_size(mut self, size: usize) -> Self {
        self.target_partition_size = size;
        self
    }

    /// Sets the hard partition size limit.
    #[must_use]
    pub fn with_max_partition_size(mut self, size: usize) -> Self {
        self.max_partition_size = size;
        self
    }

    /// Enables or disables parallel dispatch.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables input validation.
    #[must_use]
    pub fn with_validate_input(mut self, validate: bool) -> Self {
        self.validate_input = validate;
        self
    }

    /// Checks that the partition sizes are usable.
    pub fn validate(&self) -> Result<()> {
        if self.target_partition_size == 0 {
            return Err(Error::ConfigError(
                "target_partition_size must be at least 1".to_string(),
            ));
        }
        if self.max_partition_size < self.target_partition_size {
            return Err(Error::ConfigError(format!(
                "max_partition_size ({}) is smaller than target_partition_size ({})",
                self.max_partition_size, self.target_partition_size
            )));
        }
        Ok(())
    }
}

/// Counters collected over one clustering pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringStatistics {
    /// Cells seen.
    pub cells_processed: usize,
    /// Partitions formed.
    pub partitions: usize,
    /// Clusters (and therefore measurements) produced.
    pub clusters_found: usize,
    /// Size of the largest partition.
    pub largest_partition: usize,
    /// Size of the largest cluster.
    pub largest_cluster: usize,
}
