//! Breadth-first flood shared by the solvers and the repair passes.
//!
//! Entries are never dropped from the queue; popping only moves a head
//! index. That keeps every `parent` index valid for the whole pass, so a
//! path can be traced back from any entry once the flood is done.

use crate::error::{Result, alloc_vec, alloc_with_capacity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub node: u32,
    /// Index of the entry this one was discovered from
    pub parent: Option<usize>,
    pub distance: u32,
}

#[derive(Debug, Default)]
pub struct FrontierQueue {
    entries: Vec<Entry>,
    head: usize,
}

impl FrontierQueue {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(FrontierQueue {
            entries: alloc_with_capacity(capacity, "frontier queue")?,
            head: 0,
        })
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, node: u32, parent: Option<usize>, distance: u32) -> usize {
        self.entries.push(Entry {
            node,
            parent,
            distance,
        });
        self.entries.len() - 1
    }

    pub fn pop(&mut self) -> Option<(usize, Entry)> {
        let entry = *self.entries.get(self.head)?;
        self.head += 1;
        Some((self.head - 1, entry))
    }

    pub fn is_empty(&self) -> bool {
        self.head >= self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Entry {
        self.entries[index]
    }

    /// Nodes from the root of the flood to the entry at `index`.
    pub fn trace(&self, index: usize) -> Vec<u32> {
        let mut nodes = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let entry = self.entries[i];
            nodes.push(entry.node);
            current = entry.parent;
        }
        nodes.reverse();
        nodes
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
    }
}

/// Breadth-first search over nodes `0..len`.
pub struct Bfs {
    queue: FrontierQueue,
    /// Entry index per reached node
    reached: Vec<Option<usize>>,
}

impl Bfs {
    pub fn new(len: usize) -> Result<Self> {
        Ok(Bfs {
            queue: FrontierQueue::with_capacity(len)?,
            reached: alloc_vec(len, None, "flood marks")?,
        })
    }

    /// Add a starting node at distance zero. Already reached nodes are skipped.
    pub fn seed(&mut self, node: u32) {
        if self.reached[node as usize].is_none() {
            let index = self.queue.push(node, None, 0);
            self.reached[node as usize] = Some(index);
        }
    }

    /// Flood from the seeds until the queue drains or a node satisfying
    /// `is_goal` is reached, and return that node's entry index.
    /// `neighbors` yields the nodes reachable in one step from a node.
    pub fn run<F, I, G>(&mut self, mut neighbors: F, mut is_goal: G) -> Option<usize>
    where
        F: FnMut(u32) -> I,
        I: IntoIterator<Item = u32>,
        G: FnMut(u32) -> bool,
    {
        if let Some(index) = (self.queue.head..self.queue.entries.len())
            .find(|&i| is_goal(self.queue.entries[i].node))
        {
            return Some(index);
        }
        while let Some((index, entry)) = self.queue.pop() {
            for next in neighbors(entry.node) {
                if self.reached[next as usize].is_some() {
                    continue;
                }
                let child = self.queue.push(next, Some(index), entry.distance + 1);
                self.reached[next as usize] = Some(child);
                if is_goal(next) {
                    return Some(child);
                }
            }
        }
        None
    }

    /// Forget every reached node so the flood can be reused.
    pub fn reset(&mut self) {
        for entry in &self.queue.entries {
            self.reached[entry.node as usize] = None;
        }
        self.queue.clear();
    }

    pub fn is_reached(&self, node: u32) -> bool {
        self.reached[node as usize].is_some()
    }

    pub fn distance(&self, node: u32) -> Option<u32> {
        self.reached[node as usize].map(|i| self.queue.entry(i).distance)
    }

    /// Nodes from a seed to `node`, if `node` was reached.
    pub fn path_to(&self, node: u32) -> Option<Vec<u32>> {
        self.reached[node as usize].map(|i| self.queue.trace(i))
    }

    /// Nodes from a seed to the entry at `index`, as returned by [`Bfs::run`].
    pub fn trace(&self, index: usize) -> Vec<u32> {
        self.queue.trace(index)
    }

    /// Every reached node, in discovery order.
    pub fn reached_nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.entries.iter().map(|e| e.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A path graph 0 - 1 - 2 - ... - (n-1)
    fn line(n: u32) -> impl FnMut(u32) -> Vec<u32> {
        move |node| {
            let mut v = Vec::new();
            if node > 0 {
                v.push(node - 1);
            }
            if node + 1 < n {
                v.push(node + 1);
            }
            v
        }
    }

    #[test]
    fn test_bfs_distances() {
        let mut bfs = Bfs::new(6).unwrap();
        bfs.seed(2);
        assert_eq!(bfs.run(line(6), |_| false), None);
        assert_eq!(bfs.distance(0), Some(2));
        assert_eq!(bfs.distance(5), Some(3));
        assert_eq!(bfs.path_to(5), Some(vec![2, 3, 4, 5]));
    }

    #[test]
    fn test_bfs_stops_at_target() {
        let mut bfs = Bfs::new(10).unwrap();
        bfs.seed(0);
        let index = bfs.run(line(10), |n| n == 3);
        assert!(index.is_some());
        assert!(!bfs.is_reached(5));

        bfs.reset();
        assert!(!bfs.is_reached(3));
        bfs.seed(9);
        assert_eq!(bfs.run(line(10), |n| n == 7).map(|_| bfs.distance(7)), Some(Some(2)));
    }

    #[test]
    fn test_queue_keeps_parents() {
        let mut queue = FrontierQueue::with_capacity(4).unwrap();
        let root = queue.push(7, None, 0);
        let (popped, _) = queue.pop().unwrap();
        assert_eq!(popped, root);
        let child = queue.push(8, Some(root), 1);
        assert!(!queue.is_empty());
        assert_eq!(queue.trace(child), vec![7, 8]);
    }
}
