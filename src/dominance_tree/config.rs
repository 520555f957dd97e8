//! Dominance-tree configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// When a node found dominated during a merge is moved into its dominator's
/// child subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Insertion {
    /// Merged into the dominator's child subtree as soon as it is found.
    Immediate,
    /// Queued on the dominator; the queue is linked in order and merged into
    /// the child subtree once the pass ends.
    DelayedSequential,
    /// Queued on the dominator; the queue is combined by balanced halving and
    /// merged into the child subtree once the pass ends.
    #[default]
    DelayedRecursive,
}

impl Insertion {
    /// All insertion policies.
    pub const ALL: [Insertion; 3] = [
        Insertion::Immediate,
        Insertion::DelayedSequential,
        Insertion::DelayedRecursive,
    ];

    /// Returns `true` for the two delayed policies.
    pub fn is_delayed(self) -> bool {
        !matches!(self, Insertion::Immediate)
    }

    fn label(self) -> &'static str {
        match self {
            Insertion::Immediate => "immediate insertion",
            Insertion::DelayedSequential => "delayed insertion with sequential concatenation",
            Insertion::DelayedRecursive => "delayed insertion with recursive concatenation",
        }
    }
}

/// Order in which singleton trees (and, while ranking, child subtrees) are
/// merged together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergeOrder {
    /// Balanced binary recursion over the list of trees.
    #[default]
    Recursive,
    /// Left fold: each tree is merged into the accumulated result.
    Sequential,
}

impl MergeOrder {
    /// All merge orders.
    pub const ALL: [MergeOrder; 2] = [MergeOrder::Recursive, MergeOrder::Sequential];

    fn label(self) -> &'static str {
        match self {
            MergeOrder::Recursive => "recursive merge",
            MergeOrder::Sequential => "sequential merge",
        }
    }
}

/// Configuration for the dominance-tree engine.
///
/// # Examples
///
/// ```
/// use u_ndsort::dominance_tree::{DominanceTreeConfig, Insertion, MergeOrder};
///
/// let config = DominanceTreeConfig::default()
///     .with_presort(false)
///     .with_insertion(Insertion::Immediate)
///     .with_merge_order(MergeOrder::Sequential);
/// assert_eq!(
///     config.name(),
///     "Dominance tree (no presort, immediate insertion, sequential merge)"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DominanceTreeConfig {
    /// Deduplicate and sort points lexicographically first.
    ///
    /// Merges then only test "earlier dominates later" and use the position
    /// as an O(1) tie-break. Without it every pair is compared both ways.
    pub presort: bool,

    /// Insertion policy for dominated nodes.
    pub insertion: Insertion,

    /// Merge order for building the forest and peeling fronts.
    pub merge_order: MergeOrder,
}

impl Default for DominanceTreeConfig {
    fn default() -> Self {
        Self {
            presort: true,
            insertion: Insertion::DelayedRecursive,
            merge_order: MergeOrder::Recursive,
        }
    }
}

impl DominanceTreeConfig {
    /// Enables or disables the lexicographic presort.
    pub fn with_presort(mut self, presort: bool) -> Self {
        self.presort = presort;
        self
    }

    /// Sets the insertion policy.
    pub fn with_insertion(mut self, insertion: Insertion) -> Self {
        self.insertion = insertion;
        self
    }

    /// Sets the merge order.
    pub fn with_merge_order(mut self, merge_order: MergeOrder) -> Self {
        self.merge_order = merge_order;
        self
    }

    /// Every combination of presort, insertion policy and merge order.
    pub fn all() -> Vec<DominanceTreeConfig> {
        let mut configs = Vec::with_capacity(12);
        for presort in [true, false] {
            for insertion in Insertion::ALL {
                for merge_order in MergeOrder::ALL {
                    configs.push(DominanceTreeConfig {
                        presort,
                        insertion,
                        merge_order,
                    });
                }
            }
        }
        configs
    }

    /// Display name of this configuration.
    pub fn name(&self) -> String {
        format!(
            "Dominance tree ({}, {}, {})",
            if self.presort { "presort" } else { "no presort" },
            self.insertion.label(),
            self.merge_order.label()
        )
    }

    /// Validates the configuration.
    ///
    /// Every combination is valid; kept for symmetry with the other engine
    /// configurations.
    pub fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
