use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, completion_of};
use crate::{AggregationPolicy, Completion, Node, NodeId, TreeError};

/// One leaf assignment reported to the host's data channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub id: NodeId,
    pub checked: bool,
}

/// Flips a leaf, or completes/resets an internal node's whole subtree.
///
/// An internal node at exactly 100% resets every leaf below it to unchecked;
/// any other percentage (0% included) checks every leaf. Mutations are
/// returned in display order and the whole tree is re-aggregated before
/// returning.
pub fn toggle(
    root: &mut Node,
    id: &NodeId,
    policy: AggregationPolicy,
) -> Result<Vec<Mutation>, TreeError> {
    let target = root
        .find_mut(id)
        .ok_or_else(|| TreeError::NotFound(id.clone()))?;

    let mutations = if target.is_leaf() {
        target.checked = !target.checked;
        vec![Mutation {
            id: target.id.clone(),
            checked: target.checked,
        }]
    } else {
        let complete = completion_of(target, policy).is_complete();
        assign_leaves(target, !complete)
    };

    aggregate(root, policy);
    Ok(mutations)
}

/// Sets a leaf explicitly. On an internal node the value is applied to every
/// leaf below it.
pub fn set_checked(
    root: &mut Node,
    id: &NodeId,
    checked: bool,
    policy: AggregationPolicy,
) -> Result<Vec<Mutation>, TreeError> {
    let target = root
        .find_mut(id)
        .ok_or_else(|| TreeError::NotFound(id.clone()))?;
    let mutations = assign_leaves(target, checked);
    aggregate(root, policy);
    Ok(mutations)
}

/// Leaf flag, or whether the subtree is complete for internal nodes.
pub fn is_checked(root: &Node, id: &NodeId, policy: AggregationPolicy) -> Result<bool, TreeError> {
    let node = root.find(id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
    if node.is_leaf() {
        Ok(node.checked)
    } else {
        Ok(completion_of(node, policy).is_complete())
    }
}

pub fn completion(
    root: &Node,
    id: &NodeId,
    policy: AggregationPolicy,
) -> Result<Completion, TreeError> {
    let node = root.find(id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
    Ok(completion_of(node, policy))
}

fn assign_leaves(node: &mut Node, checked: bool) -> Vec<Mutation> {
    let mut mutations = Vec::new();
    node.for_each_leaf_mut(&mut |leaf| {
        leaf.checked = checked;
        mutations.push(Mutation {
            id: leaf.id.clone(),
            checked,
        });
    });
    mutations
}
