//! # Cluster partitioning
//!
//! Contacts are merged with an index-based union-find (parent array, path
//! compression, union by size). The resulting partition does not depend on
//! the order in which contacts are applied, and it is emitted in a
//! canonical form:
//!
//! - members of a cluster are sorted ascending,
//! - clusters are sorted by their smallest member.
//!
//! Every particle index `0..n` belongs to exactly one cluster. That is
//! checked whenever a [`ClusterPartition`] is assembled; a violation means
//! the partition is corrupt and the snapshot must not be analysed further.

use crate::error::{AnalysisError, Result};

/// Disjoint-set forest over `0..n`
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set holding `i`
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets of `i` and `j`. Returns `false` when they were
    /// already the same set, in which case nothing changes.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let (mut a, mut b) = (self.find(i), self.find(j));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        true
    }

    /// Size of the set holding `i`
    pub fn set_size(&mut self, i: usize) -> usize {
        let root = self.find(i);
        self.size[root]
    }
}

/// Disjoint clusters covering every particle index exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterPartition {
    clusters: Vec<Vec<usize>>,
    membership: Vec<usize>, // particle index -> position in `clusters`
}

impl ClusterPartition {
    /// Partition `0..n` by the transitive closure of `contacts`.
    pub fn from_contacts(n: usize, contacts: &[(usize, usize)]) -> Result<Self> {
        let mut uf = UnionFind::new(n);
        for &(i, j) in contacts {
            if i >= n || j >= n {
                return Err(AnalysisError::ContactOutOfRange { i, j, n });
            }
            uf.union(i, j);
        }

        // group by root; iterating 0..n keeps members ascending and makes the
        // first member of each group its smallest
        let mut slot_of_root = vec![usize::MAX; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = uf.find(i);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = clusters.len();
                clusters.push(Vec::with_capacity(uf.size[root]));
            }
            clusters[slot_of_root[root]].push(i);
        }

        Self::from_clusters(n, clusters)
    }

    /// Assemble a partition from explicit clusters, verifying that they
    /// cover `0..n` exactly once. Empty clusters are dropped.
    pub fn from_clusters(n: usize, clusters: Vec<Vec<usize>>) -> Result<Self> {
        let mut clusters: Vec<Vec<usize>> = clusters.into_iter().filter(|c| !c.is_empty()).collect();
        let covered: usize = clusters.iter().map(Vec::len).sum();

        let mut membership = vec![usize::MAX; n];
        let mut valid = covered == n;
        if valid {
            for c in clusters.iter_mut() {
                c.sort_unstable();
            }
            clusters.sort_unstable_by_key(|c| c[0]);

            'outer: for (slot, c) in clusters.iter().enumerate() {
                for &i in c {
                    if i >= n || membership[i] != usize::MAX {
                        valid = false;
                        break 'outer;
                    }
                    membership[i] = slot;
                }
            }
        }

        if !valid {
            log::error!("cluster partition invariant violated: {covered} slots for {n} particles");
            return Err(AnalysisError::PartitionInvariant { covered, expected: n });
        }

        Ok(Self { clusters, membership })
    }

    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Number of (non-empty) clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of partitioned particles
    pub fn n_particles(&self) -> usize {
        self.membership.len()
    }

    /// Cluster slot of particle `i`
    pub fn cluster_of(&self, i: usize) -> usize {
        self.membership[i]
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// Members of the biggest cluster (earliest wins ties)
    pub fn largest(&self) -> Option<&[usize]> {
        self.clusters
            .iter()
            .fold(None, |best: Option<&Vec<usize>>, c| match best {
                Some(b) if b.len() >= c.len() => Some(b),
                _ => Some(c),
            })
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_with_self_is_noop() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(0, 1));
        let before: Vec<usize> = (0..4).map(|i| uf.find(i)).collect();

        assert!(!uf.union(1, 1));
        assert!(!uf.union(0, 1));
        assert!(!uf.union(1, 0));

        let after: Vec<usize> = (0..4).map(|i| uf.find(i)).collect();
        assert_eq!(before, after);
        assert_eq!(uf.set_size(0), 2);
        assert_eq!(uf.set_size(3), 1);
    }

    #[test]
    fn self_contacts_keep_membership() {
        let p = ClusterPartition::from_contacts(3, &[(0, 1), (1, 1), (0, 0), (0, 1)]).unwrap();
        assert_eq!(p.clusters(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn out_of_range_contact_is_rejected() {
        let err = ClusterPartition::from_contacts(2, &[(0, 2)]).unwrap_err();
        assert!(matches!(err, AnalysisError::ContactOutOfRange { i: 0, j: 2, n: 2 }));
    }

    #[test]
    fn corrupt_clusters_fail_loudly() {
        // duplicated member, right total
        let err = ClusterPartition::from_clusters(3, vec![vec![0, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, AnalysisError::PartitionInvariant { covered: 3, expected: 3 }));
        // missing member
        assert!(ClusterPartition::from_clusters(3, vec![vec![0, 1]]).is_err());
        // empty clusters are fine
        assert!(ClusterPartition::from_clusters(2, vec![vec![], vec![1, 0], vec![]]).is_ok());
    }

    #[test]
    fn largest_cluster() {
        let p = ClusterPartition::from_contacts(6, &[(4, 5), (3, 4), (0, 1)]).unwrap();
        assert_eq!(p.largest(), Some(&[3, 4, 5][..]));
        assert_eq!(p.sizes(), vec![2, 1, 3]);
        assert_eq!(p.cluster_of(5), 2);
        assert_eq!(ClusterPartition::from_contacts(0, &[]).unwrap().largest(), None);
    }
}
