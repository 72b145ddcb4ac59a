//! HTTP routes
//!
//! - `GET /` - the room page
//! - `POST /api/token` - mint a participant token
//! - `GET /health` - liveness check

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::info;

use crate::livekit::{ErrorResponse, TOKEN_PATH, TokenResponse};
use crate::server::issuer::{IssueError, TokenIssuer};

const ROOM_PAGE: &str = include_str!("../../static/index.html");

/// Shared state for route handlers
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self {
            issuer: Arc::new(issuer),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(room_page))
        .route(TOKEN_PATH, post(issue_token))
        .route("/health", get(health_handler))
        .with_state(state)
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.public_message());
        no_store((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
    }
}

/// Tokens are single-use per page load; nothing along the way may cache them.
fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

async fn issue_token(State(state): State<AppState>) -> Result<Response, IssueError> {
    let details: TokenResponse = state.issuer.issue()?;
    info!(
        "issued token for {} in room {}",
        details.participant_name, details.room_name
    );
    Ok(no_store(Json(details).into_response()))
}

async fn room_page() -> Html<&'static str> {
    Html(ROOM_PAGE)
}

async fn health_handler() -> &'static str {
    "ok"
}
