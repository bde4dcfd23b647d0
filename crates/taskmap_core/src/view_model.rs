use std::f64::consts::PI;

use crate::{Completion, FilterMode, NodeId};

pub const CHECKBOX_SIZE: u32 = 18;
pub const CHECKBOX_MARGIN: u32 = 8;

/// What a node's prefix looked like the last time it was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixState {
    pub checked: bool,
    pub percentage: u8,
}

/// Stroke geometry of the progress circle, clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressArc {
    pub center: f64,
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl ProgressArc {
    pub fn new(size: u32, percentage: u8) -> Self {
        let size = f64::from(size);
        let radius = size / 2.0 - 2.0;
        let circumference = 2.0 * PI * radius;
        Self {
            center: size / 2.0,
            radius,
            circumference,
            dash_offset: circumference * (1.0 - f64::from(percentage) / 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrefixKind {
    Checkbox { checked: bool },
    ProgressCircle { percentage: u8, arc: ProgressArc },
}

impl PrefixKind {
    /// Whether the prefix shows its completed look (tick, green ring).
    pub fn is_complete(&self) -> bool {
        match self {
            PrefixKind::Checkbox { checked } => *checked,
            PrefixKind::ProgressCircle { percentage, .. } => *percentage == 100,
        }
    }
}

/// Everything the host's prefix renderer needs for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixView {
    pub kind: PrefixKind,
    pub tooltip: String,
    /// Play the completion animation on this render.
    pub animate: bool,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: NodeId,
    pub text: String,
    pub depth: usize,
    /// `None` for a synthesized view root.
    pub prefix: Option<PrefixView>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardViewModel {
    pub filter: FilterMode,
    pub root_completion: Completion,
    pub rows: Vec<NodeRow>,
    pub dirty: bool,
}

pub fn tooltip(completion: &Completion, is_leaf: bool) -> String {
    if is_leaf {
        let status = if completion.is_complete() {
            "completed"
        } else {
            "uncompleted"
        };
        format!("Status: {status}")
    } else {
        format!(
            "Completion: {}% ({}/{})",
            completion.percentage, completion.completed, completion.total
        )
    }
}

pub fn filter_notification(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::All => "Showing all tasks",
        FilterMode::Uncompleted => "Showing uncompleted tasks only",
        FilterMode::Completed => "Showing completed tasks only",
    }
}

/// A node's first render never animates. After that, a leaf animates when it
/// becomes checked and an internal node when it reaches 100%.
pub fn should_animate(previous: Option<PrefixState>, is_leaf: bool, current: PrefixState) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    if is_leaf {
        !previous.checked && current.checked
    } else {
        previous.percentage != 100 && current.percentage == 100
    }
}

pub(crate) fn prefix_view(
    completion: &Completion,
    is_leaf: bool,
    checked: bool,
    previous: Option<PrefixState>,
    size: u32,
    margin: u32,
) -> (PrefixView, PrefixState) {
    let current = PrefixState {
        checked,
        percentage: completion.percentage,
    };
    let kind = if is_leaf {
        PrefixKind::Checkbox { checked }
    } else {
        PrefixKind::ProgressCircle {
            percentage: completion.percentage,
            arc: ProgressArc::new(size, completion.percentage),
        }
    };
    let view = PrefixView {
        kind,
        tooltip: tooltip(completion, is_leaf),
        animate: should_animate(previous, is_leaf, current),
        width: size + margin,
        height: size,
    };
    (view, current)
}
