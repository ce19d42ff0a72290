//! Status API: lets the postback side mark a user's funnel stage.
//! Narrow, idempotent, and validated before storage is touched.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::error;

use funnel_db::models::user::FunnelStatus;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/setStatus", get(set_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct SetStatusParams {
    #[serde(rename = "telegramId")]
    telegram_id: Option<i64>,
    status: Option<String>,
}

fn validate(params: &SetStatusParams) -> Result<(i64, FunnelStatus), &'static str> {
    let telegram_id = params.telegram_id.ok_or("telegramId is required")?;
    let status = params
        .status
        .as_deref()
        .ok_or("status is required")?
        .parse::<FunnelStatus>()
        .map_err(|_| "status must be one of: mes, reg, dep")?;
    Ok((telegram_id, status))
}

async fn set_status(
    State(state): State<AppState>,
    Query(params): Query<SetStatusParams>,
) -> (StatusCode, Json<Value>) {
    let (telegram_id, status) = match validate(&params) {
        Ok(v) => v,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": msg })),
            );
        }
    };

    match state.users.set_status(telegram_id, status).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({ "success": true, "user": user })),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "user not found" })),
        ),
        Err(e) => {
            error!("setStatus storage failure for {}: {}", telegram_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "storage failure" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_are_rejected() {
        assert!(validate(&SetStatusParams { telegram_id: None, status: Some("reg".into()) }).is_err());
        assert!(validate(&SetStatusParams { telegram_id: Some(1), status: None }).is_err());
    }

    #[test]
    fn bogus_status_is_rejected_before_storage() {
        let params = SetStatusParams {
            telegram_id: Some(1),
            status: Some("bogus".into()),
        };
        assert!(validate(&params).is_err());
    }

    #[test]
    fn valid_params_pass() {
        let params = SetStatusParams {
            telegram_id: Some(1),
            status: Some("reg".into()),
        };
        assert_eq!(validate(&params).unwrap(), (1, FunnelStatus::Registered));
    }
}
