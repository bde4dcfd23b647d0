use taskmap_core::{update, BoardState, Msg};

#[test]
fn update_is_noop() {
    let state = BoardState::new(
        taskmap_core::Node::leaf("task", false),
        taskmap_core::BoardConfig::default(),
    )
    .unwrap();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
