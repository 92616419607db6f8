//! Neighbour discovery inside a sorted partition.
//!
//! Cells in a partition are ordered by `channel1`, so the only candidates
//! for adjacency sit in a narrow band around the query cell. The scan walks
//! outwards in both directions and stops at the first cell that leaves the
//! band or belongs to another module.

use spacepix_core::{channels_adjacent, CellSource, Partition};

/// Maximum number of neighbours a cell can have on an 8-connected grid.
pub const MAX_NEIGHBORS: usize = 8;

/// Fixed-capacity list of neighbour local indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborList {
    len: usize,
    indices: [usize; MAX_NEIGHBORS],
}

impl Default for NeighborList {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            len: 0,
            indices: [0; MAX_NEIGHBORS],
        }
    }

    /// Appends a neighbour.
    ///
    /// # Panics
    ///
    /// Panics if the list already holds [`MAX_NEIGHBORS`] entries, which can
    /// only happen when the input contains duplicate cells.
    #[inline]
    pub fn push(&mut self, local: usize) {
        assert!(
            self.len < MAX_NEIGHBORS,
            "more than {MAX_NEIGHBORS} neighbours; input contains duplicate cells"
        );
        self.indices[self.len] = local;
        self.len += 1;
    }

    /// Number of neighbours found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no neighbour was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Neighbours as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    /// Iterates over the neighbour local indices.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.as_slice().iter()
    }

    /// Returns true if `local` is in the list.
    #[must_use]
    pub fn contains(&self, local: usize) -> bool {
        self.as_slice().contains(&local)
    }
}

impl<'a> IntoIterator for &'a NeighborList {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Finds the cells adjacent to local cell `cid` of `partition`.
///
/// Returns local indices: cells before `cid` first (nearest first), then
/// cells after it. The result is only complete if the partition is sorted by
/// `channel1`; an unsorted partition yields a silently truncated list.
///
/// # Panics
///
/// Panics if `cid` is outside the partition or more than
/// [`MAX_NEIGHBORS`] neighbours are found.
pub fn find_neighbors<C: CellSource + ?Sized>(
    cells: &C,
    partition: Partition,
    cid: usize,
) -> NeighborList {
    assert!(
        cid < partition.len(),
        "local index {cid} outside partition of {} cells",
        partition.len()
    );

    let pos = partition.global(cid);
    let c0 = cells.channel0(pos);
    let c1 = cells.channel1(pos);
    let module = cells.module(pos);

    let mut neighbors = NeighborList::new();

    for j in (partition.start..pos).rev() {
        if cells.channel1(j).saturating_add(1) < c1 || cells.module(j) != module {
            break;
        }
        if channels_adjacent(c0, c1, cells.channel0(j), cells.channel1(j)) {
            neighbors.push(j - partition.start);
        }
    }

    for j in pos + 1..partition.end {
        if cells.channel1(j) > c1.saturating_add(1) || cells.module(j) != module {
            break;
        }
        if channels_adjacent(c0, c1, cells.channel0(j), cells.channel1(j)) {
            neighbors.push(j - partition.start);
        }
    }

    neighbors
}

/// Neighbour lists for every cell of a partition, indexed by local index.
pub fn find_all_neighbors<C: CellSource + ?Sized>(
    cells: &C,
    partition: Partition,
) -> Vec<NeighborList> {
    (0..partition.len())
        .map(|cid| find_neighbors(cells, partition, cid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacepix_core::{Cell, CellBatch};

    fn cross() -> Vec<Cell> {
        // Plus sign centred at (5, 5), plus a far away cell, sorted by channel1.
        vec![
            Cell::new(5, 4, 1.0, 0),
            Cell::new(4, 5, 1.0, 0),
            Cell::new(5, 5, 1.0, 0),
            Cell::new(6, 5, 1.0, 0),
            Cell::new(5, 6, 1.0, 0),
            Cell::new(20, 6, 1.0, 0),
        ]
    }

    #[test]
    fn test_center_of_cross_sees_all_arms() {
        let cells = cross();
        let partition = Partition::new(0, cells.len());
        let neighbors = find_neighbors(cells.as_slice(), partition, 2);

        assert_eq!(neighbors.as_slice(), &[1, 0, 3, 4]);
        assert!(!neighbors.contains(5));
    }

    #[test]
    fn test_arms_touch_diagonally() {
        let cells = cross();
        let partition = Partition::new(0, cells.len());
        let neighbors = find_neighbors(cells.as_slice(), partition, 0);

        // (5,4) touches (4,5), (5,5) and (6,5) but not (5,6).
        assert_eq!(neighbors.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_isolated_cell() {
        let cells = cross();
        let partition = Partition::new(0, cells.len());
        assert!(find_neighbors(cells.as_slice(), partition, 5).is_empty());
    }

    #[test]
    fn test_scan_stays_inside_partition() {
        let cells = cross();
        // Partition starting at global 2: local 0 is (5,5).
        let partition = Partition::new(2, 5);
        let neighbors = find_neighbors(cells.as_slice(), partition, 0);
        assert_eq!(neighbors.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_scan_stops_at_module_boundary() {
        let cells = vec![
            Cell::new(0, 0, 1.0, 0),
            Cell::new(0, 0, 1.0, 1),
            Cell::new(1, 0, 1.0, 1),
        ];
        let partition = Partition::new(0, cells.len());
        let neighbors = find_neighbors(cells.as_slice(), partition, 1);
        assert_eq!(neighbors.as_slice(), &[2]);
    }

    #[test]
    fn test_full_ring_of_eight() {
        let mut cells = Vec::new();
        for c1 in 0..3 {
            for c0 in 0..3 {
                cells.push(Cell::new(c0, c1, 1.0, 0));
            }
        }
        let partition = Partition::new(0, cells.len());
        let neighbors = find_neighbors(cells.as_slice(), partition, 4);
        assert_eq!(neighbors.len(), MAX_NEIGHBORS);
    }

    #[test]
    fn test_struct_of_arrays_layout_agrees() {
        let cells = cross();
        let batch = CellBatch::from(cells.as_slice());
        let partition = Partition::new(0, cells.len());
        for cid in 0..cells.len() {
            assert_eq!(
                find_neighbors(cells.as_slice(), partition, cid),
                find_neighbors(&batch, partition, cid)
            );
        }
    }

    #[test]
    #[should_panic(expected = "outside partition")]
    fn test_local_index_out_of_range_panics() {
        let cells = cross();
        let _ = find_neighbors(cells.as_slice(), Partition::new(0, 2), 2);
    }

    #[test]
    #[should_panic(expected = "more than 8 neighbours")]
    fn test_overflow_panics() {
        let mut list = NeighborList::new();
        for i in 0..=MAX_NEIGHBORS {
            list.push(i);
        }
    }
}
