use taskmap_logging::{taskmap_debug, taskmap_warn};

use crate::view_model::filter_notification;
use crate::{BoardState, Effect, FilterMode, Msg, Mutation, VisibilityDiff};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BoardState, msg: Msg) -> (BoardState, Vec<Effect>) {
    let effects = match msg {
        Msg::ToggleClicked(id) => match state.toggle(&id) {
            Ok((mutations, changes)) => mutation_effects(mutations, changes),
            Err(err) => {
                taskmap_warn!("Toggle ignored: {}", err);
                Vec::new()
            }
        },
        Msg::SetChecked { id, checked } => match state.set_checked(&id, checked) {
            Ok((mutations, changes)) => mutation_effects(mutations, changes),
            Err(err) => {
                taskmap_warn!("Set checked ignored: {}", err);
                Vec::new()
            }
        },
        Msg::FilterSelected(mode) => filter_effects(&mut state, mode),
        Msg::CycleFilter => {
            let next = state.filter().next();
            filter_effects(&mut state, next)
        }
        Msg::DocumentReplaced { root, at_ms } => {
            match state.replace_root(root) {
                Ok(()) => state.schedule_refresh(at_ms),
                Err(err) => taskmap_warn!("Rejected document from host: {}", err),
            }
            Vec::new()
        }
        Msg::StructureChanged { at_ms } => {
            state.schedule_refresh(at_ms);
            Vec::new()
        }
        Msg::Tick { now_ms } => {
            if state.refresh_due(now_ms) {
                taskmap_debug!("Debounced refresh at {} ms", now_ms);
                let changes = state.refresh_view();
                let mut effects = vec![Effect::RequestRender];
                push_visibility(&mut effects, changes);
                effects
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn mutation_effects(mutations: Vec<Mutation>, changes: VisibilityDiff) -> Vec<Effect> {
    let mut effects = vec![Effect::ApplyMutations(mutations), Effect::RequestRender];
    push_visibility(&mut effects, changes);
    effects
}

fn filter_effects(state: &mut BoardState, mode: FilterMode) -> Vec<Effect> {
    let changes = state.set_filter(mode);
    taskmap_debug!(
        "Filter {} entering={} exiting={}",
        mode,
        changes.entering.len(),
        changes.exiting.len()
    );
    let mut effects = vec![
        Effect::FilterChanged { mode },
        Effect::Notify(filter_notification(mode).to_string()),
        Effect::RequestRender,
    ];
    push_visibility(&mut effects, changes);
    effects
}

fn push_visibility(effects: &mut Vec<Effect>, changes: VisibilityDiff) {
    if !changes.is_empty() {
        effects.push(Effect::AnimateVisibility(changes));
    }
}
