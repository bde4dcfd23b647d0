use std::sync::Once;

use taskmap_core::{
    should_animate, tooltip, update, BoardConfig, BoardState, Completion, FilterMode, Msg, Node,
    PrefixKind, PrefixState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(taskmap_logging::initialize_for_tests);
}

fn board() -> BoardState {
    let root = Node::branch(
        "root",
        vec![Node::leaf("a", false).with_text("Write docs"), Node::leaf("b", true)],
    )
    .with_text("Release");
    BoardState::new(root, BoardConfig::default()).unwrap()
}

#[test]
fn rows_follow_display_order_with_prefixes() {
    init_logging();
    let view = board().view();

    let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "a", "b"]);
    assert_eq!(view.rows[1].text, "Write docs");
    assert_eq!(view.rows[1].depth, 1);
    assert_eq!(view.root_completion.percentage, 50);

    let root_prefix = view.rows[0].prefix.as_ref().unwrap();
    assert_eq!(root_prefix.tooltip, "Completion: 50% (1/2)");
    assert_eq!(root_prefix.width, 26);
    assert_eq!(root_prefix.height, 18);
    match &root_prefix.kind {
        PrefixKind::ProgressCircle { percentage, arc } => {
            assert_eq!(*percentage, 50);
            assert!((arc.radius - 7.0).abs() < 1e-9);
            assert!((arc.dash_offset - arc.circumference / 2.0).abs() < 1e-9);
        }
        other => panic!("expected progress circle, got {other:?}"),
    }

    let leaf_prefix = view.rows[2].prefix.as_ref().unwrap();
    assert_eq!(leaf_prefix.kind, PrefixKind::Checkbox { checked: true });
    assert_eq!(leaf_prefix.tooltip, "Status: completed");
}

#[test]
fn first_render_never_animates() {
    init_logging();
    let mut state = board();
    let view = state.render();
    assert!(view
        .rows
        .iter()
        .filter_map(|row| row.prefix.as_ref())
        .all(|prefix| !prefix.animate));
}

#[test]
fn checking_last_leaf_animates_leaf_and_parent_once() {
    init_logging();
    let mut state = board();
    state.render();

    let (mut state, _) = update(state, Msg::ToggleClicked("a".into()));
    let view = state.render();
    let animated: Vec<&str> = view
        .rows
        .iter()
        .filter(|row| row.prefix.as_ref().is_some_and(|p| p.animate))
        .map(|row| row.id.as_str())
        .collect();
    assert_eq!(animated, vec!["root", "a"]);

    let again = state.render();
    assert!(again
        .rows
        .iter()
        .all(|row| row.prefix.as_ref().is_some_and(|p| !p.animate)));
}

#[test]
fn unchecking_does_not_animate() {
    init_logging();
    let mut state = board();
    state.render();
    let (mut state, _) = update(state, Msg::ToggleClicked("b".into()));
    let view = state.render();
    assert!(view
        .rows
        .iter()
        .all(|row| row.prefix.as_ref().is_some_and(|p| !p.animate)));
}

#[test]
fn pruned_parent_keeps_progress_circle() {
    init_logging();
    let (state, _) = update(board(), Msg::FilterSelected(FilterMode::Uncompleted));
    let view = state.view();
    let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "a"]);
    assert_eq!(view.filter, FilterMode::Uncompleted);
    assert!(matches!(
        view.rows[0].prefix.as_ref().unwrap().kind,
        PrefixKind::ProgressCircle { percentage: 50, .. }
    ));
}

#[test]
fn filtered_rows_take_completion_from_the_full_tree() {
    init_logging();
    let root = Node::branch(
        "root",
        vec![
            Node::branch("x", vec![Node::leaf("x1", false), Node::leaf("x2", true)]),
            Node::leaf("y", true),
        ],
    );
    let state = BoardState::new(root, BoardConfig::default()).unwrap();
    let (state, _) = update(state, Msg::FilterSelected(FilterMode::Uncompleted));
    let view = state.view();

    let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "x", "x1"]);
    let tooltips: Vec<&str> = view
        .rows
        .iter()
        .map(|row| row.prefix.as_ref().unwrap().tooltip.as_str())
        .collect();
    assert_eq!(
        tooltips,
        vec!["Completion: 67% (2/3)", "Completion: 50% (1/2)", "Status: uncompleted"]
    );
}

#[test]
fn virtual_root_has_no_prefix() {
    init_logging();
    let (state, _) = update(board(), Msg::FilterSelected(FilterMode::Completed));
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert!(view.rows[0].prefix.is_none());
    assert_eq!(view.rows[1].id.as_str(), "b");
}

#[test]
fn tooltip_and_animation_rules() {
    assert_eq!(tooltip(&Completion::leaf(false), true), "Status: uncompleted");
    assert_eq!(
        tooltip(
            &Completion {
                total: 4,
                completed: 4,
                percentage: 100
            },
            false
        ),
        "Completion: 100% (4/4)"
    );

    let open = PrefixState {
        checked: false,
        percentage: 0,
    };
    let done = PrefixState {
        checked: true,
        percentage: 100,
    };
    assert!(!should_animate(None, true, done));
    assert!(should_animate(Some(open), true, done));
    assert!(!should_animate(Some(done), true, done));
    assert!(should_animate(Some(open), false, done));
    assert!(!should_animate(Some(done), false, open));
}
