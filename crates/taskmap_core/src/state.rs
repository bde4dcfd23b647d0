use std::collections::{BTreeSet, HashMap};

use crate::aggregate::aggregate;
use crate::projection::build;
use crate::toggle;
use crate::view_model::{prefix_view, BoardViewModel, NodeRow, PrefixState, CHECKBOX_MARGIN, CHECKBOX_SIZE};
use crate::visibility::{diff, VisibilityDiff};
use crate::{AggregationPolicy, Completion, FilterMode, Mutation, Node, NodeId, TreeError, ViewSnapshot};

/// Tunables for a board. Fixed for the board's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub policy: AggregationPolicy,
    /// Quiet period after a host change notification before the view refreshes.
    pub debounce_ms: u64,
    pub checkbox_size: u32,
    pub checkbox_margin: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            policy: AggregationPolicy::default(),
            debounce_ms: 200,
            checkbox_size: CHECKBOX_SIZE,
            checkbox_margin: CHECKBOX_MARGIN,
        }
    }
}

/// Caller-owned task board: the tree, the active filter and the render caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    config: BoardConfig,
    root: Node,
    filter: FilterMode,
    snapshot: Option<ViewSnapshot>,
    visible: BTreeSet<NodeId>,
    rendered: HashMap<NodeId, PrefixState>,
    pending_since: Option<u64>,
    dirty: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        let mut root = Node::new("root");
        aggregate(&mut root, AggregationPolicy::default());
        let visible = root.ids().into_iter().collect();
        Self {
            config: BoardConfig::default(),
            root,
            filter: FilterMode::All,
            snapshot: None,
            visible,
            rendered: HashMap::new(),
            pending_since: None,
            dirty: false,
        }
    }
}

impl BoardState {
    pub fn new(root: Node, config: BoardConfig) -> Result<Self, TreeError> {
        root.validate()?;
        let mut state = Self {
            config,
            root,
            ..Self::default()
        };
        aggregate(&mut state.root, config.policy);
        state.visible = state.root.ids().into_iter().collect();
        Ok(state)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Present only while a non-`all` filter is active.
    pub fn snapshot(&self) -> Option<&ViewSnapshot> {
        self.snapshot.as_ref()
    }

    /// The tree the presentation layer should draw.
    pub fn displayed_tree(&self) -> &Node {
        self.snapshot
            .as_ref()
            .map(ViewSnapshot::tree)
            .unwrap_or(&self.root)
    }

    pub fn visible_ids(&self) -> &BTreeSet<NodeId> {
        &self.visible
    }

    pub fn completion(&self, id: &NodeId) -> Result<Completion, TreeError> {
        toggle::completion(&self.root, id, self.config.policy)
    }

    pub fn is_checked(&self, id: &NodeId) -> Result<bool, TreeError> {
        toggle::is_checked(&self.root, id, self.config.policy)
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Returns whether a redraw is owed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Builds the view without recording it as rendered.
    pub fn view(&self) -> BoardViewModel {
        self.build_view(&mut |_, _| {})
    }

    /// Builds the view and records each prefix, so the next render animates
    /// only real transitions.
    pub fn render(&mut self) -> BoardViewModel {
        let mut seen = Vec::new();
        let view = self.build_view(&mut |id, state| seen.push((id.clone(), state)));
        self.rendered.extend(seen);
        view
    }

    fn build_view(&self, record: &mut impl FnMut(&NodeId, PrefixState)) -> BoardViewModel {
        let virtual_root = self.snapshot.as_ref().and_then(ViewSnapshot::virtual_root);
        let size = self.config.checkbox_size;
        let margin = self.config.checkbox_margin;
        let mut rows = Vec::new();

        // The full tree decides leaf-ness: a pruned internal node keeps its circle.
        let mut sources: HashMap<&NodeId, &Node> = HashMap::new();
        if self.snapshot.is_some() {
            self.root.walk(&mut |node, _| {
                sources.insert(&node.id, node);
            });
        }

        self.displayed_tree().walk(&mut |node, depth| {
            if virtual_root == Some(&node.id) {
                rows.push(NodeRow {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    depth,
                    prefix: None,
                });
                return;
            }
            let source = sources.get(&node.id).copied().unwrap_or(node);
            let completion = source
                .cached_completion()
                .unwrap_or_else(|| Completion::leaf(source.checked));
            let (prefix, state) = prefix_view(
                &completion,
                source.is_leaf(),
                source.checked,
                self.rendered.get(&node.id).copied(),
                size,
                margin,
            );
            record(&node.id, state);
            rows.push(NodeRow {
                id: node.id.clone(),
                text: node.text.clone(),
                depth,
                prefix: Some(prefix),
            });
        });

        BoardViewModel {
            filter: self
                .snapshot
                .as_ref()
                .map_or(self.filter, ViewSnapshot::mode),
            root_completion: self.root.cached_completion().unwrap_or_default(),
            rows,
            dirty: self.dirty,
        }
    }

    pub(crate) fn toggle(&mut self, id: &NodeId) -> Result<(Vec<Mutation>, VisibilityDiff), TreeError> {
        let mutations = toggle::toggle(&mut self.root, id, self.config.policy)?;
        Ok((mutations, self.refresh_view()))
    }

    pub(crate) fn set_checked(
        &mut self,
        id: &NodeId,
        checked: bool,
    ) -> Result<(Vec<Mutation>, VisibilityDiff), TreeError> {
        let mutations = toggle::set_checked(&mut self.root, id, checked, self.config.policy)?;
        Ok((mutations, self.refresh_view()))
    }

    pub(crate) fn set_filter(&mut self, mode: FilterMode) -> VisibilityDiff {
        self.filter = mode;
        self.refresh_view()
    }

    /// Takes a new tree from the host. The view refresh is left to the
    /// debounce window.
    pub(crate) fn replace_root(&mut self, mut root: Node) -> Result<(), TreeError> {
        root.validate()?;
        aggregate(&mut root, self.config.policy);
        // Forget prefixes of nodes that no longer exist.
        self.rendered.retain(|id, _| root.contains(id));
        self.root = root;
        Ok(())
    }

    /// Starts, or restarts, the debounce window. The board owes a redraw
    /// from here on, even before the window elapses.
    pub(crate) fn schedule_refresh(&mut self, at_ms: u64) {
        self.pending_since = Some(at_ms);
        self.mark_dirty();
    }

    pub(crate) fn refresh_due(&self, now_ms: u64) -> bool {
        self.pending_since
            .is_some_and(|since| now_ms.saturating_sub(since) >= self.config.debounce_ms)
    }

    /// Re-aggregates, re-projects and diffs against the previous visible set.
    pub(crate) fn refresh_view(&mut self) -> VisibilityDiff {
        aggregate(&mut self.root, self.config.policy);
        let next_visible: BTreeSet<NodeId> = match self.filter {
            FilterMode::All => {
                self.snapshot = None;
                self.root.ids().into_iter().collect()
            }
            mode => {
                let snapshot = build(&self.root, mode);
                let ids = snapshot.visible_ids().clone();
                self.snapshot = Some(snapshot);
                ids
            }
        };
        let changes = diff(&self.visible, &next_visible);
        self.visible = next_visible;
        self.pending_since = None;
        self.mark_dirty();
        changes
    }
}
