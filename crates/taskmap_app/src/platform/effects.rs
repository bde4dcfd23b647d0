use std::path::PathBuf;

use taskmap_core::{Effect, FilterMode};
use taskmap_engine::MindMapDocument;
use taskmap_logging::{taskmap_error, taskmap_info};

use super::persistence::{save_preferences, Preferences};
use super::render::render_transition;

/// Carries out board effects against the open document and the terminal.
pub struct EffectRunner {
    pub document: MindMapDocument,
    prefs_dir: Option<PathBuf>,
    prefs: Preferences,
    render_requested: bool,
    unsaved: bool,
}

impl EffectRunner {
    pub fn new(document: MindMapDocument, prefs_dir: Option<PathBuf>, prefs: Preferences) -> Self {
        Self {
            document,
            prefs_dir,
            prefs,
            render_requested: false,
            unsaved: false,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ApplyMutations(mutations) => {
                    taskmap_info!("Applying {} task mutation(s)", mutations.len());
                    match self.document.apply(&mutations) {
                        Ok(()) => self.unsaved = true,
                        Err(err) => taskmap_error!("Document rejected mutations: {}", err),
                    }
                }
                Effect::RequestRender => self.render_requested = true,
                Effect::FilterChanged { mode } => self.remember_filter(mode),
                Effect::Notify(message) => println!(">> {message}"),
                Effect::AnimateVisibility(changes) => print!("{}", render_transition(&changes)),
            }
        }
    }

    /// Returns whether a redraw was requested and clears the request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    fn remember_filter(&mut self, mode: FilterMode) {
        taskmap_info!("Filter mode changed to {}", mode);
        self.prefs.filter = mode;
        if let Some(dir) = &self.prefs_dir {
            save_preferences(dir, &self.prefs);
        }
    }
}
