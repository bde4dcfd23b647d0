use crate::{FilterMode, Node, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked a node's checkbox or progress circle.
    ToggleClicked(NodeId),
    /// Programmatic assignment of a task state.
    SetChecked { id: NodeId, checked: bool },
    /// User picked a filter from the menu.
    FilterSelected(FilterMode),
    /// Keyboard shortcut: advance to the next filter mode.
    CycleFilter,
    /// Host reported new tree data.
    DocumentReplaced { root: Node, at_ms: u64 },
    /// Host reported nodes added, removed or activated.
    StructureChanged { at_ms: u64 },
    /// Caller clock; flushes a refresh once the debounce window has passed.
    Tick { now_ms: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
