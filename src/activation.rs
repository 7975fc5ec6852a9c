//! Activation bootstrap: ensure a loader stub exists in the host's
//! always-loaded directory.
//!
//! Files under `preload.d` are loaded before ordinary plugins, so dropping a
//! stub there on first activation guarantees the core initializes before any
//! dependent. The existence check makes repeated activations a no-op.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

/// Always-loaded directory name under the host content directory.
pub const PRELOAD_DIR: &str = "preload.d";

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render loader stub: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Describes the loader stub written on activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderSpec {
    /// Plugin the stub loads (also names the stub file).
    pub plugin: String,
    /// Human-readable purpose, kept in the stub for operators.
    pub description: String,
    /// Entry point the host should load, relative to its plugin directory.
    pub entry_point: String,
}

impl LoaderSpec {
    pub fn new(
        plugin: impl Into<String>,
        description: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            description: description.into(),
            entry_point: entry_point.into(),
        }
    }

    /// Stub file name: `<plugin>-loader.toml`.
    #[must_use]
    pub fn loader_file_name(&self) -> String {
        format!("{}-loader.toml", self.plugin)
    }

    fn render(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Path of the loader stub for `spec` under `content_dir`.
#[must_use]
pub fn loader_path(content_dir: &Path, spec: &LoaderSpec) -> PathBuf {
    content_dir.join(PRELOAD_DIR).join(spec.loader_file_name())
}

/// Ensure the loader stub exists, creating the preload directory if needed.
///
/// Returns `true` if the stub was created, `false` if it already existed
/// (the existence check short-circuits; the stub is never rewritten).
pub async fn ensure_loader(content_dir: &Path, spec: &LoaderSpec) -> Result<bool, ActivationError> {
    let preload_dir = content_dir.join(PRELOAD_DIR);
    if !preload_dir.exists() {
        fs::create_dir_all(&preload_dir).await?;
    }

    let stub = preload_dir.join(spec.loader_file_name());
    if stub.exists() {
        debug!(path = %stub.display(), "loader stub already present");
        return Ok(false);
    }

    fs::write(&stub, spec.render()?).await?;
    info!(path = %stub.display(), plugin = %spec.plugin, "created loader stub");
    Ok(true)
}
