//! spacepix-core: Core data model for sparse cell clustering.
//!
//! This crate provides the cell and module records, the [`CellSource`]
//! accessor shared by every cell layout, the signal model seam, and the
//! write-once output views the clustering kernels write through.
//!

pub mod cell;
pub mod clustering;
pub mod error;
pub mod measurement;
pub mod module;
pub mod output;
pub mod signal;
pub mod soa;

pub use cell::{channels_adjacent, find_unsorted, sort_cells, Cell, CellSource};
pub use clustering::{ClusteringConfig, ClusteringStatistics, Partition};
pub use error::{Error, Result};
pub use measurement::{Measurement, Spacepoint};
pub use module::Module;
pub use output::SlotView;
pub use signal::{ConstantSignal, IdentitySignal, SignalModel};
pub use soa::CellBatch;

pub use glam;
