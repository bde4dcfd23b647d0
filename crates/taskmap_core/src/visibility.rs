use std::collections::BTreeSet;

use crate::NodeId;

/// Nodes that appear or disappear between two visible-id sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibilityDiff {
    pub entering: BTreeSet<NodeId>,
    pub exiting: BTreeSet<NodeId>,
}

impl VisibilityDiff {
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

pub fn diff(previous: &BTreeSet<NodeId>, next: &BTreeSet<NodeId>) -> VisibilityDiff {
    VisibilityDiff {
        entering: next.difference(previous).cloned().collect(),
        exiting: previous.difference(next).cloned().collect(),
    }
}
