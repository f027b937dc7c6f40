//! HTTP handlers: OAuth callback and Slack delivery endpoints
//!
//! Slack expects an answer within three seconds, so events and interactions
//! are acknowledged immediately and handled on a spawned task.

use super::AppState;
use super::error::AppError;
use super::signature;
use crate::slack::payload::{EventEnvelope, Interaction};
use axum::Json;
use axum::body::Body;
use axum::extract::{Form, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use triage_application::TokenError;

/// Body returned once the authorization code has been exchanged
pub const CALLBACK_CONFIRMATION: &str = "Jira OAuth callback received successfully.";

/// Body returned for a `state` this process did not issue, or no longer holds
pub const LINK_EXPIRED: &str =
    "This connection link has expired. Reopen the app home in Slack to get a new one.";

/// Largest Slack request body accepted
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// `GET /oauth/callback` (also served at `/jira/oauth/callback`)
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    if let Some(declined) = query.error {
        let reason = query.error_description.unwrap_or(declined);
        warn!("Jira authorization declined: {}", reason);
        return Err(AppError::bad_request(format!(
            "Authorization was declined: {}",
            reason
        )));
    }

    let code = query
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Missing `code` parameter"))?;

    let tokens = state.bot.tokens();
    if state.verify_state {
        let issued = match query.state.as_deref() {
            Some(value) => tokens.take_state(value).await,
            None => false,
        };
        if !issued {
            warn!("OAuth callback rejected: {}", TokenError::InvalidState);
            return Ok((StatusCode::BAD_REQUEST, LINK_EXPIRED).into_response());
        }
    }

    match tokens.exchange_code(&code).await {
        Ok(_) => {
            info!("Jira authorization completed");
            Ok(CALLBACK_CONFIRMATION.into_response())
        }
        Err(e) => {
            error!("Jira authorization failed: {}", e);
            state
                .bot
                .notify_operator(&format!("Jira authorization failed: {}", e))
                .await;
            Err(e.into())
        }
    }
}

/// `POST /slack/events`
pub async fn slack_events(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            let bot = state.bot.clone();
            state.tasks.spawn(async move { bot.handle_event(event).await });
            StatusCode::OK.into_response()
        }
        EventEnvelope::Unsupported => StatusCode::OK.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct InteractivityForm {
    pub payload: String,
}

/// `POST /slack/interactivity`
pub async fn slack_interactivity(
    State(state): State<AppState>,
    Form(form): Form<InteractivityForm>,
) -> Result<StatusCode, AppError> {
    let interaction: Interaction = serde_json::from_str(&form.payload)?;
    let bot = state.bot.clone();
    state
        .tasks
        .spawn(async move { bot.handle_interaction(interaction).await });
    Ok(StatusCode::OK)
}

/// Reject requests that do not carry a valid Slack signature
pub async fn verify_slack_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::bad_request(format!("Unreadable body: {}", e)))?;

    let now = chrono::Utc::now().timestamp();
    if let Err(e) = signature::verify(&parts.headers, &bytes, &state.signing_secret, now) {
        warn!("Rejected Slack request on {}: {}", parts.uri.path(), e);
        return Err(e.into());
    }

    Ok(next
        .run(Request::from_parts(parts, Body::from(bytes)))
        .await)
}
