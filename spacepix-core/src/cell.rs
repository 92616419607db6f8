//! Cell records and the accessor trait shared by all cell layouts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single activated detector cell.
///
/// `channel1` is the sort axis: within a partition cells are ordered by
/// ascending `channel1`, and both scan kernels rely on that ordering to stop
/// early.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// First channel coordinate (column).
    pub channel0: u32,
    /// Second channel coordinate (row), the sort axis.
    pub channel1: u32,
    /// Measured signal amplitude.
    pub activation: f64,
    /// Index of the owning module.
    pub module: usize,
}

impl Cell {
    /// Creates a new cell.
    #[inline]
    #[must_use]
    pub fn new(channel0: u32, channel1: u32, activation: f64, module: usize) -> Self {
        Self {
            channel0,
            channel1,
            activation,
            module,
        }
    }

    /// Checks if this cell touches another one (8-connectivity).
    ///
    /// Two cells touch when both channel differences are at most one.
    /// Cells with identical coordinates also count as touching.
    #[inline]
    #[must_use]
    pub fn is_adjacent(&self, other: &Self) -> bool {
        channels_adjacent(self.channel0, self.channel1, other.channel0, other.channel1)
    }
}

/// 8-connectivity test on raw channel coordinates.
#[inline]
#[must_use]
pub fn channels_adjacent(a0: u32, a1: u32, b0: u32, b1: u32) -> bool {
    let d0 = i64::from(a0) - i64::from(b0);
    let d1 = i64::from(a1) - i64::from(b1);
    d0 * d0 <= 1 && d1 * d1 <= 1
}

/// Read access to an indexable sequence of cells.
///
/// The clustering kernels are written against this trait so that the same
/// algorithm body runs over an array of [`Cell`] structs or over the
/// columnar [`CellBatch`](crate::soa::CellBatch).
pub trait CellSource: Sync {
    /// Number of cells.
    fn len(&self) -> usize;

    /// Returns true if there are no cells.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First channel coordinate of cell `index`.
    fn channel0(&self, index: usize) -> u32;

    /// Second channel coordinate (sort axis) of cell `index`.
    fn channel1(&self, index: usize) -> u32;

    /// Activation of cell `index`.
    fn activation(&self, index: usize) -> f64;

    /// Owning module of cell `index`.
    fn module(&self, index: usize) -> usize;

    /// Materializes cell `index` as a [`Cell`].
    #[inline]
    fn cell(&self, index: usize) -> Cell {
        Cell::new(
            self.channel0(index),
            self.channel1(index),
            self.activation(index),
            self.module(index),
        )
    }
}

impl CellSource for [Cell] {
    #[inline]
    fn len(&self) -> usize {
        <[Cell]>::len(self)
    }

    #[inline]
    fn channel0(&self, index: usize) -> u32 {
        self[index].channel0
    }

    #[inline]
    fn channel1(&self, index: usize) -> u32 {
        self[index].channel1
    }

    #[inline]
    fn activation(&self, index: usize) -> f64 {
        self[index].activation
    }

    #[inline]
    fn module(&self, index: usize) -> usize {
        self[index].module
    }

    #[inline]
    fn cell(&self, index: usize) -> Cell {
        self[index]
    }
}

impl CellSource for Vec<Cell> {
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn channel0(&self, index: usize) -> u32 {
        self[index].channel0
    }

    #[inline]
    fn channel1(&self, index: usize) -> u32 {
        self[index].channel1
    }

    #[inline]
    fn activation(&self, index: usize) -> f64 {
        self[index].activation
    }

    #[inline]
    fn module(&self, index: usize) -> usize {
        self[index].module
    }

    #[inline]
    fn cell(&self, index: usize) -> Cell {
        self[index]
    }
}

/// Sorts cells into the order the clustering kernels expect.
///
/// Cells are grouped by module and ordered by `channel1`, then `channel0`
/// within each module.
pub fn sort_cells(cells: &mut [Cell]) {
    cells.sort_unstable_by_key(|c| (c.module, c.channel1, c.channel0));
}

/// Returns the first index at which `cells` breaks the (module, channel1)
/// ordering, or `None` if the sequence is sorted.
pub fn find_unsorted<C: CellSource + ?Sized>(cells: &C) -> Option<usize> {
    (1..cells.len()).find(|&i| {
        let prev = (cells.module(i - 1), cells.channel1(i - 1));
        let cur = (cells.module(i), cells.channel1(i));
        cur < prev
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_adjacency() {
        let center = Cell::new(5, 5, 1.0, 0);

        assert!(center.is_adjacent(&Cell::new(4, 4, 1.0, 0)));
        assert!(center.is_adjacent(&Cell::new(5, 4, 1.0, 0)));
        assert!(center.is_adjacent(&Cell::new(6, 6, 1.0, 0)));
        assert!(center.is_adjacent(&center));

        assert!(!center.is_adjacent(&Cell::new(7, 5, 1.0, 0)));
        assert!(!center.is_adjacent(&Cell::new(5, 7, 1.0, 0)));
    }

    #[test]
    fn test_adjacency_at_zero_does_not_wrap() {
        assert!(channels_adjacent(0, 0, 1, 1));
        assert!(!channels_adjacent(0, 0, u32::MAX, 0));
    }

    #[test]
    fn test_sort_and_find_unsorted() {
        let mut cells = vec![
            Cell::new(0, 3, 1.0, 1),
            Cell::new(2, 1, 1.0, 0),
            Cell::new(1, 1, 1.0, 0),
            Cell::new(0, 0, 1.0, 1),
        ];
        assert_eq!(find_unsorted(&cells), Some(1));

        sort_cells(&mut cells);
        assert_eq!(find_unsorted(&cells), None);
        assert_eq!(cells[0], Cell::new(1, 1, 1.0, 0));
        assert_eq!(cells[3], Cell::new(0, 3, 1.0, 1));
    }

    #[test]
    fn test_slice_accessors() {
        let cells = [Cell::new(3, 4, 2.5, 7)];
        let source: &[Cell] = &cells;
        assert_eq!(source.len(), 1);
        assert_eq!(source.channel0(0), 3);
        assert_eq!(source.channel1(0), 4);
        assert!((source.activation(0) - 2.5).abs() < f64::EPSILON);
        assert_eq!(source.module(0), 7);
    }
}
