use taskmap_engine::{LineStyle, Shape, Theme, ThemeError};
use tempfile::TempDir;

#[test]
fn defaults_match_modern_theme() {
    let theme = Theme::default();
    assert_eq!(theme.padding_x, 20);
    assert_eq!(theme.padding_y, 12);
    assert_eq!(theme.line_style, LineStyle::Curve);
    assert_eq!(theme.line_color, "#94a3b8");
    assert_eq!(theme.background_color, "#f8fafc");
    assert_eq!(theme.root.font_size, 20);
    assert_eq!(theme.root.margin_x, None);
    assert_eq!(theme.second.margin_x, Some(45));
    assert_eq!(theme.node.margin_y, Some(7));
    assert_eq!(theme.generalization.color, "#8b5cf6");
    assert!(theme.validate().is_ok());
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let theme = Theme::with_overrides(
        r#"{
            "lineStyle": "straight",
            "lineRadius": 12,
            "showLineMarker": true,
            "second": { "marginX": 60, "shape": "roundedRectangle" }
        }"#,
    )
    .unwrap();

    assert_eq!(theme.line_style, LineStyle::Straight);
    assert_eq!(theme.line_radius, 12);
    assert!(theme.show_line_marker);
    assert_eq!(theme.second.margin_x, Some(60));
    assert_eq!(theme.second.margin_y, Some(10));
    assert_eq!(theme.second.shape, Shape::RoundedRectangle);
    assert_eq!(theme.second.font_size, 16);
    assert_eq!(theme.node, Theme::default().node);
}

#[test]
fn theme_json_round_trips_through_overrides() {
    let json = Theme::default().to_json().unwrap();
    assert!(json.contains("\"lineStyle\": \"curve\""));
    assert_eq!(Theme::with_overrides(&json).unwrap(), Theme::default());
}

#[test]
fn invalid_overrides_are_rejected() {
    assert!(matches!(
        Theme::with_overrides("[1, 2]"),
        Err(ThemeError::NotAnObject)
    ));
    assert!(matches!(
        Theme::with_overrides(r#"{"lineStyle": "wavy"}"#),
        Err(ThemeError::Json(_))
    ));
    assert!(matches!(
        Theme::with_overrides(r#"{"node": {"fontSize": 0}}"#),
        Err(ThemeError::Invalid { ref field, .. }) if field == "node.fontSize"
    ));
}

#[test]
fn loads_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("theme.json");
    std::fs::write(&path, r##"{"backgroundColor": "#000000"}"##).unwrap();
    let theme = Theme::load(&path).unwrap();
    assert_eq!(theme.background_color, "#000000");
    assert_eq!(theme.style_for_depth(5), &theme.node);
}
