//! Request payload staging.
//!
//! External engines read their input by path, so each request payload is
//! written to a fresh file in the shared staging directory. Paths are unique
//! per request (kind + ULID) so concurrent requests of the same kind never
//! race on a shared filename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;
use ulid::Ulid;

/// On-disk copy of a request payload, owned by exactly one invocation.
#[derive(Debug, Clone)]
pub struct StagedArtifact {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Fatal pre-spawn failures: nothing is invoked when staging fails.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize payload for staging: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write staged payload {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `payload` as pretty JSON under `dir`, named `<kind>-<ulid>.json`.
/// Returns the absolute path so engines can read it from any working
/// directory. Directory creation is idempotent.
pub async fn stage_payload(
    dir: &Path,
    kind: &str,
    payload: &serde_json::Value,
) -> Result<StagedArtifact, StagingError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StagingError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
    let dir = fs::canonicalize(dir)
        .await
        .map_err(|e| StagingError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let path = dir.join(format!("{kind}-{}.json", Ulid::new()));
    let bytes = serde_json::to_vec_pretty(payload)?;
    fs::write(&path, bytes)
        .await
        .map_err(|e| StagingError::Write {
            path: path.clone(),
            source: e,
        })?;

    debug!(path = %path.display(), kind, "staged request payload");
    Ok(StagedArtifact {
        path,
        created_at: Utc::now(),
    })
}
