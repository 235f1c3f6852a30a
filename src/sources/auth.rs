use crate::utils::error::{FirehoseError, Result};
use std::path::{Path, PathBuf};

/// Scoped credential file for importer subprocesses.
///
/// Importer tools read their credentials from a JSON file. The file is
/// written on construction and removed when the guard drops, so it
/// disappears on every exit path, including a failed update.
#[derive(Debug)]
pub struct AuthFile {
    path: PathBuf,
}

impl AuthFile {
    pub fn write(path: impl Into<PathBuf>, entries: &[(&str, String)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(FirehoseError::Config {
                message: "auth file requires 1 or more key/value pairs".to_string(),
            });
        }

        let path = path.into();
        let mut body = serde_json::Map::new();
        for (key, value) in entries {
            body.insert(
                (*key).to_string(),
                serde_json::Value::String(value.clone()),
            );
        }
        std::fs::write(&path, serde_json::to_vec(&body)?)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AuthFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to remove auth file {}: {}", self.path.display(), e);
        }
    }
}
