//! Mind-map documents in the host's node-data JSON shape.
//!
//! A document is either a bare node (`{"data": {...}, "children": [...]}`) or
//! an envelope holding one under `"root"` next to layout and theme settings.
//! Fields this crate does not interpret are carried through a load/save cycle
//! untouched.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use taskmap_core::{Mutation, Node, NodeId, TreeError};
use taskmap_logging::taskmap_info;
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

/// Cached completion the host writes into node data; always recomputed here.
const COMPLETION_CACHE_KEY: &str = "_completion";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed tree: {0}")]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    data: RawData,
    #[serde(default)]
    children: Vec<RawNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawData {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task_checked: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MindMapDocument {
    root: Node,
    node_extras: HashMap<NodeId, Map<String, Value>>,
    /// Internal nodes whose input carried `taskChecked`; it is written back.
    flagged: HashSet<NodeId>,
    envelope: Option<Map<String, Value>>,
}

impl MindMapDocument {
    pub fn new(root: Node) -> Result<Self, DocumentError> {
        root.validate()?;
        Ok(Self {
            root,
            node_extras: HashMap::new(),
            flagged: HashSet::new(),
            envelope: None,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        let (raw_root, envelope) = match value {
            Value::Object(mut map) if map.contains_key("root") => {
                let root = map.remove("root").unwrap_or(Value::Null);
                (serde_json::from_value::<RawNode>(root)?, Some(map))
            }
            other => (serde_json::from_value::<RawNode>(other)?, None),
        };

        let mut node_extras = HashMap::new();
        let mut flagged = HashSet::new();
        let root = into_node(raw_root, None, &mut node_extras, &mut flagged)?;
        root.validate()?;
        Ok(Self {
            root,
            node_extras,
            flagged,
            envelope,
        })
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        let raw = self.to_raw(&self.root);
        let text = match &self.envelope {
            Some(envelope) => {
                let mut map = envelope.clone();
                map.insert("root".to_string(), serde_json::to_value(raw)?);
                serde_json::to_string_pretty(&Value::Object(map))?
            }
            None => serde_json::to_string_pretty(&raw)?,
        };
        Ok(text)
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path)?;
        let document = Self::from_json(&text)?;
        taskmap_info!(
            "Loaded {:?}: {} nodes, {} leaves",
            path,
            document.root.node_count(),
            document.root.leaf_count()
        );
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        write_atomically(path, &self.to_json()?)?;
        taskmap_info!("Saved {:?}", path);
        Ok(())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Writes leaf assignments coming from the task board.
    pub fn apply(&mut self, mutations: &[Mutation]) -> Result<(), DocumentError> {
        for mutation in mutations {
            let node = self
                .root
                .find_mut(&mutation.id)
                .ok_or_else(|| TreeError::NotFound(mutation.id.clone()))?;
            node.checked = mutation.checked;
        }
        Ok(())
    }

    fn to_raw(&self, node: &Node) -> RawNode {
        let task_checked = if node.is_leaf() || node.checked || self.flagged.contains(&node.id) {
            Some(node.checked)
        } else {
            None
        };
        RawNode {
            data: RawData {
                uid: Some(node.id.to_string()),
                text: node.text.clone(),
                task_checked,
                extra: self.node_extras.get(&node.id).cloned().unwrap_or_default(),
            },
            children: node.children.iter().map(|child| self.to_raw(child)).collect(),
        }
    }
}

fn into_node(
    raw: RawNode,
    parent: Option<&NodeId>,
    extras: &mut HashMap<NodeId, Map<String, Value>>,
    flagged: &mut HashSet<NodeId>,
) -> Result<Node, DocumentError> {
    let RawData {
        uid,
        text,
        task_checked,
        mut extra,
    } = raw.data;
    let id = match uid {
        Some(uid) if !uid.is_empty() => NodeId::new(uid),
        _ => {
            return Err(TreeError::MissingId {
                parent: parent.cloned(),
            }
            .into())
        }
    };

    let children = raw
        .children
        .into_iter()
        .map(|child| into_node(child, Some(&id), extras, flagged))
        .collect::<Result<Vec<_>, _>>()?;

    if !children.is_empty() && task_checked.is_some() {
        flagged.insert(id.clone());
    }
    extra.remove(COMPLETION_CACHE_KEY);
    if !extra.is_empty() {
        extras.insert(id.clone(), extra);
    }

    Ok(Node::new(id)
        .with_text(text)
        .with_checked(task_checked == Some(true))
        .with_children(children))
}
