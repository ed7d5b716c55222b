//! HTTP handlers and request/response bodies

use crate::auth::Verifier;
use crate::error::handlers::{
    MSG_AUTHENTICATED, MSG_INVALID_REQUEST, error_to_status, handle_error, public_message,
};
use crate::storage::AccountStore;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Login body. Missing fields deserialize as empty and are refused by the verifier.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "identifier")]
    pub username: String,
    #[serde(default, alias = "secret")]
    pub password: String,
}

/// Login result. Identical shape for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

pub type LoginReply = (StatusCode, Json<LoginResponse>);

fn reply(status: StatusCode, success: bool, message: &str) -> LoginReply {
    (
        status,
        Json(LoginResponse {
            success,
            message: message.to_string(),
        }),
    )
}

/// POST /api/login
pub async fn handle_login<S: AccountStore>(
    State(verifier): State<Arc<Verifier<S>>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> LoginReply {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable login body: {}", rejection.body_text());
            return reply(StatusCode::BAD_REQUEST, false, MSG_INVALID_REQUEST);
        }
    };

    match verifier.verify(&request.username, &request.password).await {
        Ok(account) => {
            debug!("Login succeeded for {:?}", account.identifier);
            reply(StatusCode::OK, true, MSG_AUTHENTICATED)
        }
        Err(err) => {
            handle_error(&err);
            reply(error_to_status(&err), false, public_message(&err))
        }
    }
}

/// GET /health — liveness only, never touches the store
pub async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
