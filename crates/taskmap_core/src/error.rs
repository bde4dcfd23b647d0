use thiserror::Error;

use crate::NodeId;

/// Precondition violations on the task tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node without identifier (child of {parent:?})")]
    MissingId { parent: Option<NodeId> },
    #[error("duplicate node identifier {0}")]
    DuplicateId(NodeId),
    #[error("no node with identifier {0}")]
    NotFound(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter mode {0:?} (expected all, uncompleted or completed)")]
pub struct ParseFilterModeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown aggregation policy {0:?} (expected leaf_weighted or mean_of_children)")]
pub struct ParseAggregationPolicyError(pub String);
