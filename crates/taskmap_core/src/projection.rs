use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::{AggregationPolicy, Node, NodeId, ParseFilterModeError, TreeError};

const VIRTUAL_ROOT_ID: &str = "taskmap-virtual-root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Uncompleted,
    Completed,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Uncompleted, FilterMode::Completed];

    /// Cycle order: all → uncompleted → completed → all.
    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Uncompleted,
            FilterMode::Uncompleted => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Uncompleted => "uncompleted",
            FilterMode::Completed => "completed",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ParseFilterModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FilterMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ParseFilterModeError(raw.to_string()))
    }
}

/// A pruned, immutable copy of the tree for one filter mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    mode: FilterMode,
    tree: Node,
    visible_ids: BTreeSet<NodeId>,
    virtual_root: Option<NodeId>,
}

impl ViewSnapshot {
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Source-tree ids present in the view. A synthesized root is never listed.
    pub fn visible_ids(&self) -> &BTreeSet<NodeId> {
        &self.visible_ids
    }

    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.visible_ids.contains(id)
    }

    /// Id of the synthesized wrapper, when the view has one.
    pub fn virtual_root(&self) -> Option<&NodeId> {
        self.virtual_root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_ids.is_empty()
    }
}

/// Projects `root` for `mode`. Fails fast on a malformed tree.
///
/// The source tree is not modified: aggregation runs on a private copy so the
/// projection depends only on the `checked` flags and the policy.
pub fn project(
    root: &Node,
    mode: FilterMode,
    policy: AggregationPolicy,
) -> Result<ViewSnapshot, TreeError> {
    root.validate()?;
    let mut aggregated = root.clone();
    aggregate(&mut aggregated, policy);
    Ok(build(&aggregated, mode))
}

/// Projection over an already validated and aggregated tree.
pub(crate) fn build(root: &Node, mode: FilterMode) -> ViewSnapshot {
    let (tree, virtual_root) = match mode {
        FilterMode::All => (root.clone(), None),
        FilterMode::Uncompleted => match prune_uncompleted(root) {
            Some(tree) => (tree, None),
            None => {
                let id = fresh_virtual_id(root);
                (Node::new(id.clone()), Some(id))
            }
        },
        FilterMode::Completed => {
            let mut roots = Vec::new();
            collect_completed(root, &mut roots);
            let id = fresh_virtual_id(root);
            (Node::branch(id.clone(), roots), Some(id))
        }
    };

    let mut visible_ids = BTreeSet::new();
    tree.walk(&mut |node, _| {
        if virtual_root.as_ref() != Some(&node.id) {
            visible_ids.insert(node.id.clone());
        }
    });

    ViewSnapshot {
        mode,
        tree,
        visible_ids,
        virtual_root,
    }
}

fn is_complete(node: &Node) -> bool {
    node.completion.is_some_and(|c| c.is_complete())
}

fn prune_uncompleted(node: &Node) -> Option<Node> {
    if node.is_leaf() {
        return (!node.checked).then(|| node.clone());
    }
    let kept: Vec<Node> = node.children.iter().filter_map(prune_uncompleted).collect();
    if !kept.is_empty() || !is_complete(node) {
        Some(node.with_pruned_children(kept))
    } else {
        None
    }
}

fn collect_completed(node: &Node, roots: &mut Vec<Node>) {
    if is_complete(node) {
        roots.push(keep_completed(node));
        return;
    }
    for child in &node.children {
        collect_completed(child, roots);
    }
}

fn keep_completed(node: &Node) -> Node {
    let kept = node
        .children
        .iter()
        .filter(|child| is_complete(child))
        .map(keep_completed)
        .collect();
    node.with_pruned_children(kept)
}

fn fresh_virtual_id(source: &Node) -> NodeId {
    let base = NodeId::new(VIRTUAL_ROOT_ID);
    if !source.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| NodeId::new(format!("{VIRTUAL_ROOT_ID}-{n}")))
        .find(|candidate| !source.contains(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_mode_parses_case_insensitively() {
        assert_eq!("Completed".parse::<FilterMode>(), Ok(FilterMode::Completed));
        assert_eq!(" all ".parse::<FilterMode>(), Ok(FilterMode::All));
        assert_eq!(
            "done".parse::<FilterMode>(),
            Err(ParseFilterModeError("done".to_string()))
        );
    }

    #[test]
    fn virtual_id_avoids_source_collisions() {
        let tree = Node::branch(
            VIRTUAL_ROOT_ID,
            vec![Node::leaf(format!("{VIRTUAL_ROOT_ID}-1"), true)],
        );
        assert_eq!(
            fresh_virtual_id(&tree),
            NodeId::new(format!("{VIRTUAL_ROOT_ID}-2"))
        );
    }
}
