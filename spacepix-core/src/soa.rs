//! Structure of Arrays (`SoA`) cell storage.
//!
//! `CellBatch` stores cell data in parallel vectors rather than an array of
//! [`Cell`] structs. Both layouts implement [`CellSource`], so the clustering
//! kernels accept either without duplication.

use crate::cell::{Cell, CellSource};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A batch of cells stored in Structure of Arrays (`SoA`) format.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellBatch {
    /// Columnar storage for the first channel coordinate.
    pub channel0: Vec<u32>,
    /// Columnar storage for the second channel coordinate.
    pub channel1: Vec<u32>,
    /// Columnar storage for activations.
    pub activation: Vec<f64>,
    /// Columnar storage for owning module indices.
    pub module: Vec<usize>,
}

impl CellBatch {
    /// Creates a new empty batch with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channel0: Vec::with_capacity(capacity),
            channel1: Vec::with_capacity(capacity),
            activation: Vec::with_capacity(capacity),
            module: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of cells in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channel0.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channel0.is_empty()
    }

    /// Clears all vectors in the batch.
    pub fn clear(&mut self) {
        self.channel0.clear();
        self.channel1.clear();
        self.activation.clear();
        self.module.clear();
    }

    /// Appends all cells from another batch to this one.
    pub fn append(&mut self, other: &CellBatch) {
        self.channel0.extend_from_slice(&other.channel0);
        self.channel1.extend_from_slice(&other.channel1);
        self.activation.extend_from_slice(&other.activation);
        self.module.extend_from_slice(&other.module);
    }

    /// Pushes a single cell into the batch.
    pub fn push(&mut self, cell: Cell) {
        self.channel0.push(cell.channel0);
        self.channel1.push(cell.channel1);
        self.activation.push(cell.activation);
        self.module.push(cell.module);
    }
}

impl FromIterator<Cell> for CellBatch {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for cell in iter {
            batch.push(cell);
        }
        batch
    }
}

impl From<&[Cell]> for CellBatch {
    fn from(cells: &[Cell]) -> Self {
        cells.iter().copied().collect()
    }
}

impl CellSource for CellBatch {
    #[inline]
    fn len(&self) -> usize {
        self.channel0.len()
    }

    #[inline]
    fn channel0(&self, index: usize) -> u32 {
        self.channel0[index]
    }

    #[inline]
    fn channel1(&self, index: usize) -> u32 {
        self.channel1[index]
    }

    #[inline]
    fn activation(&self, index: usize) -> f64 {
        self.activation[index]
    }

    #[inline]
    fn module(&self, index: usize) -> usize {
        self.module[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_batch_operations() {
        let mut batch = CellBatch::with_capacity(10);
        assert!(batch.is_empty());

        batch.push(Cell::new(10, 20, 5.0, 0));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.channel0[0], 10);
        assert_eq!(batch.module[0], 0);

        batch.push(Cell::new(11, 21, 6.0, 0));
        assert_eq!(batch.len(), 2);

        let mut other = CellBatch::default();
        other.append(&batch);
        assert_eq!(other, batch);

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_cell_batch_matches_struct_layout() {
        let cells = vec![Cell::new(1, 2, 3.0, 4), Cell::new(5, 6, 7.0, 8)];
        let batch = CellBatch::from(cells.as_slice());

        for i in 0..cells.len() {
            assert_eq!(CellSource::cell(&batch, i), cells[i]);
        }
    }
}
