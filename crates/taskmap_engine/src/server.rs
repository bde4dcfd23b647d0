//! Static file server for local demos.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use taskmap_logging::{taskmap_error, taskmap_info};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_INDEX: &str = "example-modern-task.html";

const NOT_FOUND_BODY: &str = "<h1>404 - File not found</h1>";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server stopped: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub root: PathBuf,
    /// File served for `/`, relative to `root`.
    pub index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            index: DEFAULT_INDEX.to_string(),
        }
    }
}

/// Router serving `config.root`; every path is looked up as a file.
pub fn router(config: ServerConfig) -> Router {
    Router::new()
        .fallback(serve_file)
        .with_state(Arc::new(config))
}

/// Binds `0.0.0.0:port` and serves until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    taskmap_info!("Serving directory {:?}", config.root);
    taskmap_info!("Open http://localhost:{}/{}", config.port, config.index);
    taskmap_info!("Press Ctrl+C to stop the server");

    axum::serve(listener, router(config)).await?;
    Ok(())
}

async fn serve_file(State(config): State<Arc<ServerConfig>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    taskmap_info!("{} {}", method, path);

    let Some(file) = resolve(&config, &path) else {
        return not_found();
    };

    match tokio::fs::read(&file).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file)
                .first_or_octet_stream()
                .to_string();
            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], Body::from(content)).into_response()
        }
        Err(err) if err.kind() == ErrorKind::NotFound => not_found(),
        // Directories and other unreadable entries.
        Err(err) => {
            taskmap_error!("Failed to read {:?}: {}", file, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Server error: {:?}", err.kind()),
            )
                .into_response()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        NOT_FOUND_BODY,
    )
        .into_response()
}

/// Maps a request path onto the served directory. `None` when the path would
/// leave it.
fn resolve(config: &ServerConfig, request_path: &str) -> Option<PathBuf> {
    let relative = match request_path.trim_start_matches('/') {
        "" => config.index.as_str(),
        rest => rest,
    };
    let mut resolved = config.root.clone();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_maps_root_to_index_and_rejects_traversal() {
        let config = ServerConfig {
            root: PathBuf::from("/srv/demo"),
            ..ServerConfig::default()
        };
        assert_eq!(
            resolve(&config, "/"),
            Some(PathBuf::from("/srv/demo/example-modern-task.html"))
        );
        assert_eq!(
            resolve(&config, "/css/site.css"),
            Some(PathBuf::from("/srv/demo/css/site.css"))
        );
        assert_eq!(resolve(&config, "/../etc/passwd"), None);
        assert_eq!(resolve(&config, "/a/../../b"), None);
    }
}
