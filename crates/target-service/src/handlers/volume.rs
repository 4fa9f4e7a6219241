//! Mounted file relay.
//!
//! Volumes, secrets and configs declared by a fixture all end up as files under
//! the volumes root. `GET /volumefile` reads one back so the harness can check
//! it was materialized with the declared content.

use crate::errors::TargetError;
use crate::routes::AppState;
use axum::extract::{Query, State};
use axum::Json;
use common::types::ServiceResponse;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, Deserialize)]
pub struct VolumeFileQuery {
    #[serde(default)]
    pub filename: String,
}

/// Handle `GET /volumefile?filename=<name>`.
#[instrument(name = "target.volumefile", skip_all, fields(filename = %query.filename))]
pub async fn volume_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VolumeFileQuery>,
) -> Result<Json<ServiceResponse>, TargetError> {
    let path = resolve_volume_path(&state.config.volumes_root, &query.filename)?;

    let contents = tokio::fs::read(&path).await.map_err(|e| {
        warn!(error = %e, path = %path.display(), "Failed to read mounted file");
        match e.kind() {
            ErrorKind::NotFound => TargetError::FileNotFound(query.filename.clone()),
            _ => TargetError::FileRead(e.to_string()),
        }
    })?;

    Ok(Json(ServiceResponse::new(
        String::from_utf8_lossy(&contents).into_owned(),
    )))
}

/// Join `filename` onto `root`, accepting only plain relative paths.
///
/// Absolute paths, `..` and `.` components are rejected so a probe can never
/// read outside the mount root.
pub fn resolve_volume_path(root: &Path, filename: &str) -> Result<PathBuf, TargetError> {
    let relative = Path::new(filename);
    let mut components = relative.components().peekable();

    if components.peek().is_none() {
        return Err(TargetError::InvalidFilename(filename.to_string()));
    }

    if components.all(|c| matches!(c, Component::Normal(_))) {
        Ok(root.join(relative))
    } else {
        Err(TargetError::InvalidFilename(filename.to_string()))
    }
}
