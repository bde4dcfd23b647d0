//! Plain-text presentation of a board view.

use std::fmt::Write;

use taskmap_core::{BoardViewModel, PrefixKind, PrefixView, VisibilityDiff};

fn glyph(prefix: &PrefixView) -> String {
    match &prefix.kind {
        PrefixKind::Checkbox { checked: true } => "[x]".to_string(),
        PrefixKind::Checkbox { checked: false } => "[ ]".to_string(),
        PrefixKind::ProgressCircle { percentage: 100, .. } => "(ok)".to_string(),
        PrefixKind::ProgressCircle { percentage, .. } => format!("({percentage}%)"),
    }
}

pub fn render(view: &BoardViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "filter: {}  overall: {}% ({}/{})",
        view.filter,
        view.root_completion.percentage,
        view.root_completion.completed,
        view.root_completion.total
    );
    for row in &view.rows {
        let indent = "  ".repeat(row.depth);
        match &row.prefix {
            Some(prefix) => {
                let marker = if prefix.animate { " *" } else { "" };
                let _ = writeln!(
                    out,
                    "{indent}{} {} <{}>  {}{marker}",
                    glyph(prefix),
                    row.text,
                    row.id,
                    prefix.tooltip
                );
            }
            None => {
                let _ = writeln!(out, "{indent}<view>");
            }
        }
    }
    if view.rows.iter().all(|row| row.prefix.is_none()) {
        let _ = writeln!(out, "  (no tasks match this filter)");
    }
    out
}

pub fn render_transition(changes: &VisibilityDiff) -> String {
    let mut out = String::new();
    for id in &changes.exiting {
        let _ = writeln!(out, "  - {id}");
    }
    for id in &changes.entering {
        let _ = writeln!(out, "  + {id}");
    }
    out
}
