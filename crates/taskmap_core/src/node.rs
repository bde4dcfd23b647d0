use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TreeError;

/// Stable node identifier, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Subtree completion. Derived from leaf `checked` flags, never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Completion {
    /// Number of leaves in the subtree.
    pub total: u32,
    /// Number of checked leaves in the subtree.
    pub completed: u32,
    /// 0..=100
    pub percentage: u8,
}

impl Completion {
    pub fn leaf(checked: bool) -> Self {
        Self {
            total: 1,
            completed: u32::from(checked),
            percentage: if checked { 100 } else { 0 },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

/// A mind-map node carrying task state.
///
/// A node without children is a leaf and its `checked` flag is authoritative.
/// For internal nodes `checked` is ignored; their completion is aggregated from
/// the leaves below them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub checked: bool,
    /// Display order.
    pub children: Vec<Node>,
    pub(crate) completion: Option<Completion>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            checked: false,
            children: Vec::new(),
            completion: None,
        }
    }

    pub fn leaf(id: impl Into<NodeId>, checked: bool) -> Self {
        Self::new(id).with_checked(checked)
    }

    pub fn branch(id: impl Into<NodeId>, children: Vec<Node>) -> Self {
        Self::new(id).with_children(children)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Completion cached by the last aggregation pass, if any.
    pub fn cached_completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Copy of this node with a replacement child list.
    pub(crate) fn with_pruned_children(&self, children: Vec<Node>) -> Node {
        Node {
            id: self.id.clone(),
            text: self.text.clone(),
            checked: self.checked,
            children,
            completion: self.completion,
        }
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Pre-order walk over the subtree, this node included.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn for_each_leaf_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        if self.is_leaf() {
            visit(self);
            return;
        }
        for child in &mut self.children {
            child.for_each_leaf_mut(visit);
        }
    }

    /// Identifiers in pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(&mut |node, _| ids.push(node.id.clone()));
        ids
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children.iter().map(Node::leaf_count).sum()
    }

    /// Fails on the first empty or repeated identifier.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        self.validate_into(None, &mut seen)
    }

    fn validate_into<'a>(
        &'a self,
        parent: Option<&NodeId>,
        seen: &mut HashSet<&'a NodeId>,
    ) -> Result<(), TreeError> {
        if self.id.is_empty() {
            return Err(TreeError::MissingId {
                parent: parent.cloned(),
            });
        }
        if !seen.insert(&self.id) {
            return Err(TreeError::DuplicateId(self.id.clone()));
        }
        for child in &self.children {
            child.validate_into(Some(&self.id), seen)?;
        }
        Ok(())
    }
}
