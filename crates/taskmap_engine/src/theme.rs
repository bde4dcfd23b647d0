//! The "modern" mind-map theme and JSON overrides on top of it.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskmap_logging::taskmap_debug;
use thiserror::Error;

const SYSTEM_FONT_STACK: &str =
    "-apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, \"Helvetica Neue\", Arial, sans-serif";

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid theme json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("theme overrides must be a json object")]
    NotAnObject,
    #[error("invalid theme value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    /// Bezier curves.
    Curve,
    /// Elbow lines with rounded corners (`lineRadius`).
    Straight,
    /// Straight segments from parent to child.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    Rectangle,
    RoundedRectangle,
    Circle,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerDir {
    Start,
    End,
    Both,
}

/// Style of one node level (root, second level, deeper nodes, summaries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub shape: Shape,
    /// Horizontal gap to neighbouring nodes. Not used for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_y: Option<u32>,
    pub fill_color: String,
    pub font_family: String,
    pub color: String,
    pub font_size: u32,
    pub font_weight: String,
    pub font_style: String,
    pub line_height: f64,
    pub border_color: String,
    pub border_width: f64,
    pub border_dasharray: String,
    pub border_radius: u32,
    pub text_decoration: String,
    pub gradient_style: bool,
    pub start_color: String,
    pub end_color: String,
    pub start_dir: [f64; 2],
    pub end_dir: [f64; 2],
    pub line_marker_dir: MarkerDir,
    /// Empty keeps the regular border colour on hover.
    pub hover_rect_color: String,
    pub hover_rect_radius: u32,
    pub text_align: TextAlign,
    pub img_placement: Placement,
    pub tag_placement: Placement,
}

impl NodeStyle {
    fn base(color: &str, font_size: u32, font_weight: &str) -> Self {
        Self {
            shape: Shape::Rectangle,
            margin_x: None,
            margin_y: None,
            fill_color: "#ffffff".to_string(),
            font_family: SYSTEM_FONT_STACK.to_string(),
            color: color.to_string(),
            font_size,
            font_weight: font_weight.to_string(),
            font_style: "normal".to_string(),
            line_height: 1.5,
            border_color: "#e2e8f0".to_string(),
            border_width: 1.0,
            border_dasharray: "none".to_string(),
            border_radius: 6,
            text_decoration: "none".to_string(),
            gradient_style: false,
            start_color: String::new(),
            end_color: String::new(),
            start_dir: [0.0, 0.0],
            end_dir: [1.0, 0.0],
            line_marker_dir: MarkerDir::End,
            hover_rect_color: String::new(),
            hover_rect_radius: 5,
            text_align: TextAlign::Left,
            img_placement: Placement::Top,
            tag_placement: Placement::Right,
        }
    }

    pub fn modern_root() -> Self {
        Self {
            border_width: 2.0,
            border_radius: 12,
            hover_rect_radius: 8,
            ..Self::base("#0f172a", 20, "600")
        }
    }

    pub fn modern_second() -> Self {
        Self {
            margin_x: Some(45),
            margin_y: Some(10),
            border_color: "#cbd5e1".to_string(),
            border_width: 1.5,
            border_radius: 8,
            hover_rect_radius: 6,
            ..Self::base("#1e293b", 16, "500")
        }
    }

    pub fn modern_node() -> Self {
        Self {
            margin_x: Some(35),
            margin_y: Some(7),
            ..Self::base("#334155", 14, "400")
        }
    }

    pub fn modern_generalization() -> Self {
        Self {
            margin_x: Some(50),
            margin_y: Some(15),
            fill_color: "#f8f9fa".to_string(),
            border_color: "#c4b5fd".to_string(),
            border_width: 1.5,
            ..Self::base("#8b5cf6", 14, "500")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub padding_x: u32,
    pub padding_y: u32,
    pub img_max_width: u32,
    pub img_max_height: u32,
    pub icon_size: u32,

    pub line_width: f64,
    pub line_color: String,
    pub line_dasharray: String,
    pub line_style: LineStyle,
    pub root_line_keep_same_in_curve: bool,
    pub root_line_start_position_keep_same_in_curve: bool,
    pub line_radius: u32,
    pub show_line_marker: bool,

    pub generalization_line_width: f64,
    pub generalization_line_color: String,
    pub generalization_line_margin: u32,
    pub generalization_node_margin: u32,

    pub associative_line_width: f64,
    pub associative_line_color: String,
    pub associative_line_active_width: f64,
    pub associative_line_active_color: String,
    pub associative_line_dasharray: String,
    pub associative_line_text_color: String,
    pub associative_line_text_font_size: u32,
    pub associative_line_text_line_height: f64,
    pub associative_line_text_font_family: String,

    pub background_color: String,
    pub background_image: String,
    pub background_repeat: String,
    pub background_position: String,
    pub background_size: String,

    /// Underline-only nodes instead of full borders.
    pub node_use_line_style: bool,

    pub root: NodeStyle,
    pub second: NodeStyle,
    pub node: NodeStyle,
    pub generalization: NodeStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            padding_x: 20,
            padding_y: 12,
            img_max_width: 200,
            img_max_height: 100,
            icon_size: 18,

            line_width: 2.0,
            line_color: "#94a3b8".to_string(),
            line_dasharray: "none".to_string(),
            line_style: LineStyle::Curve,
            root_line_keep_same_in_curve: true,
            root_line_start_position_keep_same_in_curve: false,
            line_radius: 8,
            show_line_marker: false,

            generalization_line_width: 2.0,
            generalization_line_color: "#8b5cf6".to_string(),
            generalization_line_margin: 5,
            generalization_node_margin: 25,

            associative_line_width: 2.0,
            associative_line_color: "#64748b".to_string(),
            associative_line_active_width: 3.0,
            associative_line_active_color: "#3b82f6".to_string(),
            associative_line_dasharray: "none".to_string(),
            associative_line_text_color: "#475569".to_string(),
            associative_line_text_font_size: 13,
            associative_line_text_line_height: 1.4,
            associative_line_text_font_family: SYSTEM_FONT_STACK.to_string(),

            background_color: "#f8fafc".to_string(),
            background_image: "none".to_string(),
            background_repeat: "no-repeat".to_string(),
            background_position: "center center".to_string(),
            background_size: "cover".to_string(),

            node_use_line_style: false,

            root: NodeStyle::modern_root(),
            second: NodeStyle::modern_second(),
            node: NodeStyle::modern_node(),
            generalization: NodeStyle::modern_generalization(),
        }
    }
}

impl Theme {
    /// Modern theme with `overrides` deep-merged on top. Any subset of keys
    /// may be given, nested node styles included.
    pub fn with_overrides(overrides: &str) -> Result<Self, ThemeError> {
        let overrides: Value = serde_json::from_str(overrides)?;
        if !overrides.is_object() {
            return Err(ThemeError::NotAnObject);
        }
        let mut merged = serde_json::to_value(Theme::default())?;
        merge(&mut merged, overrides);
        let theme: Theme = serde_json::from_value(merged)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let text = fs::read_to_string(path)?;
        let theme = Self::with_overrides(&text)?;
        taskmap_debug!("Loaded theme overrides from {:?}", path);
        Ok(theme)
    }

    pub fn to_json(&self) -> Result<String, ThemeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The style block used for a node at `depth` (0 = root).
    pub fn style_for_depth(&self, depth: usize) -> &NodeStyle {
        match depth {
            0 => &self.root,
            1 => &self.second,
            _ => &self.node,
        }
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        let widths = [
            ("lineWidth", self.line_width),
            ("generalizationLineWidth", self.generalization_line_width),
            ("associativeLineWidth", self.associative_line_width),
            ("associativeLineActiveWidth", self.associative_line_active_width),
        ];
        for (field, width) in widths {
            if !width.is_finite() || width < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        let levels = [
            ("root", &self.root),
            ("second", &self.second),
            ("node", &self.node),
            ("generalization", &self.generalization),
        ];
        for (level, style) in levels {
            if style.font_size == 0 {
                return Err(invalid(&format!("{level}.fontSize"), "must be positive"));
            }
            if !(style.line_height.is_finite() && style.line_height > 0.0) {
                return Err(invalid(&format!("{level}.lineHeight"), "must be positive"));
            }
            if style.border_width < 0.0 {
                return Err(invalid(&format!("{level}.borderWidth"), "must not be negative"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ThemeError {
    ThemeError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
