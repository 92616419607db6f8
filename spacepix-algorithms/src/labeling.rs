//! Connected-component labelling of a partition.
//!
//! Builds clusters from the adjacency lists with a union-find structure.
//! Roots are always the smallest index of their set, so the final label of
//! every cell is the lowest local index in its cluster, which is what the
//! aggregation scan requires of its representatives.

use crate::adjacency::find_neighbors;
use spacepix_core::{CellSource, Partition};

/// Union-Find over local indices with minimum-index roots.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving.
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, x: usize, y: usize) {
        let px = self.find(x);
        let py = self.find(y);

        match px.cmp(&py) {
            std::cmp::Ordering::Less => self.parent[py] = px,
            std::cmp::Ordering::Greater => self.parent[px] = py,
            std::cmp::Ordering::Equal => {}
        }
    }
}

/// Labels every cell of `partition` with the local index of its cluster
/// representative.
///
/// # Panics
///
/// Panics if a cell has more than eight neighbours (duplicate cells).
pub fn label_partition<C: CellSource + ?Sized>(cells: &C, partition: Partition) -> Vec<usize> {
    let n = partition.len();
    let mut uf = UnionFind::new(n);

    for cid in 0..n {
        for &neighbor in &find_neighbors(cells, partition, cid) {
            // Each edge is reported from both ends; handle it once.
            if neighbor > cid {
                uf.union(cid, neighbor);
            }
        }
    }

    (0..n).map(|i| uf.find(i)).collect()
}

/// Local indices of the cluster representatives, in ascending order.
pub fn representatives(labels: &[usize]) -> impl Iterator<Item = usize> + '_ {
    labels
        .iter()
        .enumerate()
        .filter(|&(i, &label)| label == i)
        .map(|(i, _)| i)
}

/// Number of distinct clusters in a label array.
#[must_use]
pub fn count_clusters(labels: &[usize]) -> usize {
    representatives(labels).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacepix_core::Cell;

    #[test]
    fn test_union_find_keeps_minimum_root() {
        let mut uf = UnionFind::new(6);
        uf.union(4, 5);
        uf.union(2, 3);
        uf.union(5, 3);
        uf.union(1, 0);

        assert_eq!(uf.find(5), 2);
        assert_eq!(uf.find(4), 2);
        assert_eq!(uf.find(1), 0);
        assert_ne!(uf.find(0), uf.find(2));
    }

    #[test]
    fn test_single_cluster() {
        let cells = vec![
            Cell::new(0, 0, 1.0, 0),
            Cell::new(1, 0, 1.0, 0),
            Cell::new(1, 1, 1.0, 0),
        ];
        let labels = label_partition(cells.as_slice(), Partition::new(0, 3));
        assert_eq!(labels, vec![0, 0, 0]);
        assert_eq!(count_clusters(&labels), 1);
    }

    #[test]
    fn test_separate_clusters() {
        let cells = vec![
            Cell::new(0, 0, 1.0, 0),
            Cell::new(9, 0, 1.0, 0),
            Cell::new(1, 1, 1.0, 0),
            Cell::new(9, 1, 1.0, 0),
            Cell::new(4, 4, 1.0, 0),
        ];
        let labels = label_partition(cells.as_slice(), Partition::new(0, 5));
        assert_eq!(labels, vec![0, 1, 0, 1, 4]);
        assert_eq!(representatives(&labels).collect::<Vec<_>>(), vec![0, 1, 4]);
    }

    #[test]
    fn test_u_shape_merges_late() {
        // Two arms joined only by the bottom row, which sorts last.
        let cells = vec![
            Cell::new(0, 0, 1.0, 0),
            Cell::new(2, 0, 1.0, 0),
            Cell::new(0, 1, 1.0, 0),
            Cell::new(2, 1, 1.0, 0),
            Cell::new(1, 2, 1.0, 0),
        ];
        let labels = label_partition(cells.as_slice(), Partition::new(0, 5));
        assert_eq!(labels, vec![0; 5]);
    }

    #[test]
    fn test_labels_are_local_to_partition() {
        let cells = vec![
            Cell::new(0, 0, 1.0, 0),
            Cell::new(5, 5, 1.0, 1),
            Cell::new(5, 6, 1.0, 1),
        ];
        let labels = label_partition(cells.as_slice(), Partition::new(1, 3));
        assert_eq!(labels, vec![0, 0]);
    }
}
