//! Error types for spacepix-core.

use thiserror::Error;

/// Result type alias for spacepix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for spacepix operations.
///
/// The clustering kernels themselves never return these; they are raised by
/// the host-side validation that runs before any kernel is dispatched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A cell refers to a module that does not exist.
    #[error("cell {cell} references module {module}, but only {modules} modules are defined")]
    InvalidModule {
        cell: usize,
        module: usize,
        modules: usize,
    },

    /// Cells are not sorted by (module, channel1).
    #[error("cells are not sorted by (module, channel1) at index {index}")]
    UnsortedCells { index: usize },

    /// A partition grew beyond the configured hard limit.
    #[error("partition [{start}, {end}) holds {size} cells, limit is {limit}")]
    PartitionTooLarge {
        start: usize,
        end: usize,
        size: usize,
        limit: usize,
    },

    /// Invalid module geometry.
    #[error("invalid module {module}: {reason}")]
    InvalidGeometry { module: usize, reason: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
