//! Taskmap engine: filesystem, theme and HTTP plumbing around the core.
mod document;
mod persist;
mod server;
mod theme;

pub use document::{DocumentError, MindMapDocument};
pub use persist::{write_atomically, PersistError};
pub use server::{router, serve, ServeError, ServerConfig, DEFAULT_INDEX, DEFAULT_PORT};
pub use theme::{LineStyle, MarkerDir, NodeStyle, Placement, Shape, TextAlign, Theme, ThemeError};
