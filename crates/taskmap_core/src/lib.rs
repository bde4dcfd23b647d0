//! Taskmap core: task-tree aggregation, view projection and the pure board
//! state machine.
mod aggregate;
mod effect;
mod error;
mod msg;
mod node;
mod projection;
mod state;
mod toggle;
mod update;
mod view_model;
mod visibility;

pub use aggregate::{aggregate, completion_of, AggregationPolicy};
pub use effect::Effect;
pub use error::{ParseAggregationPolicyError, ParseFilterModeError, TreeError};
pub use msg::Msg;
pub use node::{Completion, Node, NodeId};
pub use projection::{project, FilterMode, ViewSnapshot};
pub use state::{BoardConfig, BoardState};
pub use toggle::{completion, is_checked, set_checked, toggle, Mutation};
pub use update::update;
pub use view_model::{
    filter_notification, should_animate, tooltip, BoardViewModel, NodeRow, PrefixKind, PrefixState,
    PrefixView, ProgressArc, CHECKBOX_MARGIN, CHECKBOX_SIZE,
};
pub use visibility::{diff, VisibilityDiff};
