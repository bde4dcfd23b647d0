use crate::{FilterMode, Mutation, VisibilityDiff};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Leaf assignments for the host's data channel.
    ApplyMutations(Vec<Mutation>),
    /// Ask the host to redraw.
    RequestRender,
    FilterChanged { mode: FilterMode },
    /// Short user-facing message.
    Notify(String),
    /// Nodes to fade in and out around the next redraw.
    AnimateVisibility(VisibilityDiff),
}
