//! Index-based dominance forest.
//!
//! Nodes live in an arena and refer to each other by position. A node is
//! always in exactly one place: on a sibling chain (linked through `next`),
//! on some node's pending queue (also linked through `next`), or at the head
//! of a chain waiting on the work stack. Every node in a `child` subtree is
//! dominated by the subtree's owner.
//!
//! Merging a demoted node into its dominator's subtree can demote further
//! nodes, down to the depth of the longest dominance chain. Those merges are
//! queued on an explicit work stack instead of recursing, so stack usage does
//! not grow with the number of fronts.

use super::config::{Insertion, MergeOrder};
use crate::dominance::{dominance_cmp, weakly_dominates, Dominance};

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    next: Option<usize>,
    child: Option<usize>,
    pending: Option<usize>,
    pending_tail: Option<usize>,
}

/// Head and tail of a chain under construction.
#[derive(Debug, Clone, Copy, Default)]
struct Chain {
    head: Option<usize>,
    tail: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct Forest {
    max_points: usize,
    max_dimension: usize,
    nodes: Vec<Node>,
    coords: Vec<f64>,
    dim: usize,
    /// Nodes are numbered in lexicographic order of unique points.
    presorted: bool,
    insertion: Insertion,
    merge_order: MergeOrder,
    roots: Vec<usize>,
    /// `(parent, chain)`: merges of `chain` into `parent`'s child subtree
    /// still to be done.
    work: Vec<(usize, usize)>,
}

impl Forest {
    pub(crate) fn new(
        max_points: usize,
        max_dimension: usize,
        presorted: bool,
        insertion: Insertion,
        merge_order: MergeOrder,
    ) -> Self {
        Self {
            max_points,
            max_dimension,
            nodes: Vec::with_capacity(max_points),
            coords: vec![0.0; max_points * max_dimension],
            dim: 0,
            presorted,
            insertion,
            merge_order,
            roots: Vec::with_capacity(max_points),
            work: Vec::with_capacity(max_points),
        }
    }

    /// Drops all nodes and prepares `count` singletons of dimension `dim`.
    pub(crate) fn reset(&mut self, count: usize, dim: usize) {
        assert!(
            count <= self.max_points && dim <= self.max_dimension,
            "dominance forest capacity exceeded"
        );
        self.dim = dim;
        self.work.clear();
        self.nodes.clear();
        self.nodes.resize(count, Node::default());
    }

    pub(crate) fn set_point(&mut self, node: usize, point: &[f64]) {
        let dim = self.dim;
        self.coords[node * dim..(node + 1) * dim].copy_from_slice(point);
    }

    #[inline]
    fn point(&self, node: usize) -> &[f64] {
        &self.coords[node * self.dim..(node + 1) * self.dim]
    }

    /// Builds the forest and peels it front by front into `ranks`.
    ///
    /// Nodes not reached once the front index passes `max_rank` keep
    /// `max_rank + 1`.
    pub(crate) fn rank(&mut self, ranks: &mut [usize], max_rank: usize) {
        let count = self.nodes.len();
        ranks[..count].fill(max_rank.saturating_add(1));

        self.roots.clear();
        self.roots.extend(0..count);
        let mut front = self.merge_roots();
        let mut rank = 0;
        while let Some(head) = front {
            if rank > max_rank {
                break;
            }
            self.roots.clear();
            let mut cursor = Some(head);
            while let Some(node) = cursor {
                ranks[node] = rank;
                if let Some(child) = self.nodes[node].child.take() {
                    self.roots.push(child);
                }
                cursor = self.nodes[node].next;
            }
            front = self.merge_roots();
            rank += 1;
        }
        log::trace!("dominance tree: {rank} fronts peeled from {count} nodes");
    }

    /// Merges every chain listed in `roots` in the configured order and
    /// settles all subtree merges this causes.
    fn merge_roots(&mut self) -> Option<usize> {
        let roots = std::mem::take(&mut self.roots);
        let merged = match self.merge_order {
            MergeOrder::Recursive => self.merge_balanced(&roots),
            MergeOrder::Sequential => {
                let mut acc = None;
                for &root in &roots {
                    acc = self.merge(acc, Some(root));
                }
                acc
            }
        };
        self.roots = roots;
        self.drain();
        merged
    }

    /// Runs queued subtree merges until none are left.
    fn drain(&mut self) {
        while let Some((parent, chain)) = self.work.pop() {
            let child = self.nodes[parent].child.take();
            self.nodes[parent].child = self.merge(child, Some(chain));
        }
    }

    fn merge_balanced(&mut self, roots: &[usize]) -> Option<usize> {
        match roots.len() {
            0 => None,
            1 => Some(roots[0]),
            len => {
                let (left, right) = roots.split_at(len / 2);
                let left = self.merge_balanced(left);
                let right = self.merge_balanced(right);
                self.merge(left, right)
            }
        }
    }

    /// Merges two antichains into one; dominated nodes move under their
    /// dominators together with their subtrees.
    ///
    /// Only the returned chain is final. Merges into child subtrees are
    /// left on the work stack for [`drain`](Self::drain).
    fn merge(&mut self, a: Option<usize>, b: Option<usize>) -> Option<usize> {
        let (a, b) = match (a, b) {
            (None, other) | (other, None) => return other,
            (Some(a), Some(b)) => (a, b),
        };
        let head = if self.presorted {
            self.merge_sorted(a, b)
        } else {
            self.merge_unsorted(a, b)
        };
        if self.insertion.is_delayed() {
            let mut cursor = head;
            while let Some(node) = cursor {
                self.schedule_pending(node);
                cursor = self.nodes[node].next;
            }
        }
        head
    }

    /// Merge of two chains sorted by node number.
    ///
    /// Nodes are visited in increasing number; a node can only be dominated
    /// by an already visited survivor of the other chain.
    fn merge_sorted(&mut self, a: usize, b: usize) -> Option<usize> {
        let mut kept = [Chain::default(); 2];
        let mut cursors = [Some(a), Some(b)];
        loop {
            let (side, node) = match (cursors[0], cursors[1]) {
                (Some(x), Some(y)) if x < y => (0, x),
                (_, Some(y)) => (1, y),
                (Some(x), None) => (0, x),
                (None, None) => break,
            };
            cursors[side] = self.nodes[node].next;
            match self.find_dominator(kept[1 - side].head, node) {
                Some(dominator) => self.attach(dominator, node),
                None => self.push(&mut kept[side], node),
            }
        }
        self.interleave(kept[0].head, kept[1].head)
    }

    fn find_dominator(&self, chain: Option<usize>, node: usize) -> Option<usize> {
        let mut cursor = chain;
        while let Some(candidate) = cursor {
            if weakly_dominates(self.point(candidate), self.point(node)) {
                return Some(candidate);
            }
            cursor = self.nodes[candidate].next;
        }
        None
    }

    /// Merge of two chains in arbitrary order, comparing both ways.
    ///
    /// Equal points are left side by side.
    fn merge_unsorted(&mut self, a: usize, b: usize) -> Option<usize> {
        let mut survivors = Some(a);
        let mut kept = Chain::default();
        let mut cursor = Some(b);
        while let Some(y) = cursor {
            cursor = self.nodes[y].next;
            self.nodes[y].next = None;

            let mut dominated = false;
            let mut prev: Option<usize> = None;
            let mut current = survivors;
            while let Some(x) = current {
                let next = self.nodes[x].next;
                match dominance_cmp(self.point(x), self.point(y)) {
                    Dominance::Dominates => {
                        self.attach(x, y);
                        dominated = true;
                        break;
                    }
                    Dominance::Dominated => {
                        match prev {
                            Some(p) => self.nodes[p].next = next,
                            None => survivors = next,
                        }
                        self.nodes[x].next = None;
                        self.attach(y, x);
                    }
                    Dominance::Equal | Dominance::Incomparable => prev = Some(x),
                }
                current = next;
            }
            if !dominated {
                self.push(&mut kept, y);
            }
        }

        match kept.tail {
            Some(tail) => {
                self.nodes[tail].next = survivors;
                kept.head
            }
            None => survivors,
        }
    }

    /// Moves `node` (with its subtree) under `parent`.
    fn attach(&mut self, parent: usize, node: usize) {
        self.nodes[node].next = None;
        if self.insertion.is_delayed() {
            // A node demoted mid-pass may already hold a queue of its own.
            self.schedule_pending(node);
            match self.nodes[parent].pending_tail {
                Some(tail) => self.nodes[tail].next = Some(node),
                None => self.nodes[parent].pending = Some(node),
            }
            self.nodes[parent].pending_tail = Some(node);
        } else {
            self.work.push((parent, node));
        }
    }

    /// Moves the pending queue of `node`, concatenated, onto the work stack.
    fn schedule_pending(&mut self, node: usize) {
        let Some(queue) = self.nodes[node].pending.take() else {
            return;
        };
        self.nodes[node].pending_tail = None;
        let batch = match self.insertion {
            Insertion::DelayedRecursive => {
                let len = self.chain_len(queue);
                self.concat_balanced(queue, len)
            }
            Insertion::DelayedSequential | Insertion::Immediate => Some(queue),
        };
        if let Some(batch) = batch {
            self.work.push((node, batch));
        }
    }

    fn chain_len(&self, head: usize) -> usize {
        let mut len = 1;
        let mut cursor = self.nodes[head].next;
        while let Some(node) = cursor {
            len += 1;
            cursor = self.nodes[node].next;
        }
        len
    }

    /// Splits a queue of `len` nodes in halves and links them back by node
    /// number.
    fn concat_balanced(&mut self, head: usize, len: usize) -> Option<usize> {
        if len == 1 {
            return Some(head);
        }
        let half = len / 2;
        let mut cut = head;
        for _ in 1..half {
            match self.nodes[cut].next {
                Some(next) => cut = next,
                None => break,
            }
        }
        let Some(second) = self.nodes[cut].next.take() else {
            return Some(head);
        };
        let left = self.concat_balanced(head, half);
        let right = self.concat_balanced(second, len - half);
        self.interleave(left, right)
    }

    /// Links two chains into one, ordered by node number where both are.
    fn interleave(&mut self, a: Option<usize>, b: Option<usize>) -> Option<usize> {
        let mut out = Chain::default();
        let (mut x, mut y) = (a, b);
        loop {
            let node = match (x, y) {
                (Some(p), Some(q)) => {
                    if p < q {
                        x = self.nodes[p].next;
                        p
                    } else {
                        y = self.nodes[q].next;
                        q
                    }
                }
                (Some(rest), None) | (None, Some(rest)) => {
                    match out.tail {
                        Some(tail) => self.nodes[tail].next = Some(rest),
                        None => out.head = Some(rest),
                    }
                    break;
                }
                (None, None) => break,
            };
            self.push(&mut out, node);
        }
        out.head
    }

    fn push(&mut self, chain: &mut Chain, node: usize) {
        self.nodes[node].next = None;
        match chain.tail {
            Some(tail) => self.nodes[tail].next = Some(node),
            None => chain.head = Some(node),
        }
        chain.tail = Some(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(points: &[[f64; 2]], presorted: bool, insertion: Insertion) -> Forest {
        let mut forest = Forest::new(points.len(), 2, presorted, insertion, MergeOrder::Recursive);
        forest.reset(points.len(), 2);
        for (i, p) in points.iter().enumerate() {
            forest.set_point(i, p);
        }
        forest
    }

    fn chain(forest: &Forest, head: Option<usize>) -> Vec<usize> {
        let mut nodes = Vec::new();
        let mut cursor = head;
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = forest.nodes[node].next;
        }
        nodes
    }

    #[test]
    fn test_merge_sorted_keeps_number_order() {
        // Lexicographically numbered; only 2 dominates 3.
        let points = [[0.0, 5.0], [1.0, 3.0], [2.0, 1.0], [3.0, 2.0]];
        let mut f = forest(&points, true, Insertion::Immediate);
        let a = f.interleave(Some(0), Some(2));
        let b = f.interleave(Some(1), Some(3));
        let head = f.merge(a, b);
        assert_eq!(chain(&f, head), vec![0, 1, 2]);
        assert_eq!(f.nodes[2].child, None);
        assert_eq!(f.work, vec![(2, 3)]);
        f.drain();
        assert_eq!(f.nodes[2].child, Some(3));
    }

    #[test]
    fn test_merge_unsorted_both_directions() {
        let points = [[3.0, 3.0], [1.0, 1.0], [0.0, 4.0], [3.0, 3.0]];
        let mut f = forest(&points, false, Insertion::DelayedSequential);
        let a = f.interleave(Some(0), Some(2));
        let head = f.merge(a, Some(1));
        f.drain();
        let mut front = chain(&f, head);
        front.sort_unstable();
        assert_eq!(front, vec![1, 2]);
        assert_eq!(chain(&f, f.nodes[1].child), vec![0]);

        // An equal point ends up next to its twin, not under it.
        let head = f.merge(head, Some(3));
        f.drain();
        assert_eq!(chain(&f, f.nodes[1].child).len(), 2);
        assert_eq!(f.nodes[0].child, None);
        assert_eq!(chain(&f, head).len(), 2);
    }

    #[test]
    fn test_concat_balanced_links_whole_queue() {
        let points = [[0.0, 4.0], [1.0, 3.0], [2.0, 2.0], [3.0, 1.0], [4.0, 0.0]];
        let mut f = forest(&points, true, Insertion::DelayedRecursive);
        let mut queue = Chain::default();
        for node in 0..5 {
            f.push(&mut queue, node);
        }
        let head = queue.head.map(|h| {
            let len = f.chain_len(h);
            f.concat_balanced(h, len)
        });
        assert_eq!(chain(&f, head.flatten()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_stops_after_cap() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let mut f = forest(&points, true, Insertion::Immediate);
        let mut ranks = vec![0; 4];
        f.rank(&mut ranks, 1);
        assert_eq!(ranks, vec![0, 1, 2, 2]);
    }
}
