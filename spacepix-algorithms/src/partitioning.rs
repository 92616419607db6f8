//! Splitting the sorted cell sequence into independent partitions.

use spacepix_core::{CellSource, Partition};

/// Splits sorted cells into partitions that no cluster can straddle.
///
/// A new partition starts whenever the module changes. Within a module, a
/// partition is closed once it holds at least `target_size` cells and the
/// next cell is more than one `channel1` step past the previous one; such a
/// gap guarantees no cell on one side touches a cell on the other. When a
/// module offers no gap, its partition grows past the target.
///
/// # Panics
///
/// Panics if `target_size` is zero.
pub fn partition_cells<C: CellSource + ?Sized>(cells: &C, target_size: usize) -> Vec<Partition> {
    assert!(target_size > 0, "target partition size must be positive");

    let n = cells.len();
    let mut partitions = Vec::with_capacity(n / target_size + 1);
    if n == 0 {
        return partitions;
    }

    let mut start = 0;
    for i in 1..n {
        let module_changed = cells.module(i) != cells.module(i - 1);
        let gap = cells.channel1(i) > cells.channel1(i - 1).saturating_add(1);
        if module_changed || (i - start >= target_size && gap) {
            partitions.push(Partition::new(start, i));
            start = i;
        }
    }
    partitions.push(Partition::new(start, n));

    partitions
}
