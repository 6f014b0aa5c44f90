//! HTTP handlers for the flag API

use super::error::ApiError;
use super::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use flagpanel_application::{RepoMeta, UpdateFeaturesError, UpdateFeaturesInput};
use flagpanel_domain::FlagSet;
use serde_json::{Value, json};
use tracing::error;

/// Get the current flags
///
/// GET /features
pub async fn get_features(State(state): State<AppState>) -> Json<FlagSet> {
    Json(state.get_features.execute().await)
}

/// Merge a partial update into the flags and save
///
/// POST /features
///
/// Responds with the full flag set. When publish-on-update is enabled the
/// response is `{"ok": true, "flags": {...}, "git": {...}}` instead.
pub async fn update_features(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Value::Object(changes) = body else {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let mut input = UpdateFeaturesInput::new(changes);
    if state.publish_on_update {
        input = input.and_publish();
    }

    match state.update_features.execute(input).await {
        Ok(output) => match output.publish {
            Some(git) => Ok(Json(json!({
                "ok": true,
                "flags": output.flags,
                "git": git,
            }))
            .into_response()),
            None => Ok(Json(output.flags).into_response()),
        },
        Err(e @ UpdateFeaturesError::Publish { .. }) => {
            error!("Failed to push flags: {}", e);
            Err(ApiError::Publish(e.to_string()))
        }
        Err(e) => {
            error!("Failed to update flags: {}", e);
            Err(ApiError::Internal("Failed to update feature flags".to_string()))
        }
    }
}

/// Commit and push the flags file
///
/// POST /apply
pub async fn apply_changes(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let output = state.apply_changes.execute().await.map_err(|e| {
        error!("Failed to apply flags: {}", e);
        ApiError::Publish(e.to_string())
    })?;

    Ok(Json(json!({
        "ok": true,
        "attempt": output.attempt,
        "stdout": output.stdout,
        "stderr": output.stderr,
    })))
}

/// Branch and last commit of the repository
///
/// GET /meta
pub async fn describe_repo(State(state): State<AppState>) -> Json<RepoMeta> {
    Json(state.describe_repo.execute().await)
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
