//! Index-based union-find with path compression and union by size.

use crate::error::{Result, alloc_vec};

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
    size: Vec<u32>,
    sets: usize,
}

impl DisjointSet {
    pub fn new(len: usize) -> Result<Self> {
        let mut parent = alloc_vec(len, 0u32, "disjoint set parents")?;
        parent
            .iter_mut()
            .enumerate()
            .for_each(|(i, p)| *p = i as u32);
        Ok(DisjointSet {
            parent,
            size: alloc_vec(len, 1u32, "disjoint set sizes")?,
            sets: len,
        })
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets left.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Root of the set holding `x`. Every node on the way is pointed
    /// straight at the root.
    pub fn find(&mut self, x: u32) -> u32 {
        debug_assert!((x as usize) < self.parent.len(), "node outside the set");
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    pub fn same(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }

    /// Merge the sets holding `a` and `b`, hanging the smaller tree under the
    /// larger. Returns `false` if they were already one set.
    pub fn union(&mut self, a: u32, b: u32) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false; // Already in same set
        }
        let (big, small) = if self.size[root_a as usize] >= self.size[root_b as usize] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small as usize] = big;
        self.size[big as usize] += self.size[small as usize];
        self.sets -= 1;
        true
    }

    /// Number of elements in the set holding `x`.
    pub fn size_of(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}
