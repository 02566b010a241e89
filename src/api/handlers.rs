//! HTTP request handlers

use super::AppState;
use crate::backend::{Content, ContinueRequest, RpcError, StartRequest};
use crate::render::RenderError;
use crate::session::{SessionValues, CLIENT_ID, SESSION_ID};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use minijinja::HtmlEscape;

/// Create the gateway router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(start_session).fallback(unknown))
        .route("/input/:step", post(submit_input).fallback(unknown))
        .route("/choose/:step/:option", get(choose_option).fallback(unknown))
        .route("/favicon.ico", get(unknown).fallback(unknown))
        // Wrong method on a known path is a 404 as well, never a 405
        .fallback(unknown)
        .with_state(state)
}

// ============================================================
// Start
// ============================================================

async fn start_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Response, GatewayError> {
    tracing::debug!(method = "GET", path = "/", "HTTP request");

    let mut values = SessionValues::load(&jar);
    values.log("Retrieved");

    // Empty on a first visit, the backend then assigns a client id
    let request = StartRequest {
        client_id: values.get_str(CLIENT_ID).to_string(),
    };
    let response = state
        .backend
        .start(&request)
        .await
        .map_err(GatewayError::Start)?;

    // The backend is authoritative for identity, so always overwrite
    values.set(CLIENT_ID, response.client_id);
    values.set(SESSION_ID, response.session_id);
    values.log("Saving");
    let jar = values.save(jar);

    // Identity was established even if the page fails to render
    Ok(match render_page(&state, &response.content) {
        Ok(page) => (jar, page).into_response(),
        Err(e) => (jar, e).into_response(),
    })
}

// ============================================================
// Continue
// ============================================================

/// Body is parsed as form-encoded whatever the content type says
async fn submit_input(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(step): Path<String>,
    body: Bytes,
) -> Result<Html<String>, GatewayError> {
    let input = form_input(&body);
    tracing::debug!(method = "POST", %step, %input, "HTTP request");
    continue_session(&state, &jar, step, input).await
}

/// First `input` value of a form-encoded body, empty when absent
fn form_input(body: &[u8]) -> String {
    url::form_urlencoded::parse(body)
        .find(|(name, _)| name == "input")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

async fn choose_option(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path((step, option)): Path<(String, String)>,
) -> Result<Html<String>, GatewayError> {
    tracing::debug!(method = "GET", %step, %option, "HTTP request");
    continue_session(&state, &jar, step, option).await
}

/// Submit `input` for `step_id` and render whatever step the backend returns.
///
/// The cookie is only read here; continuation never changes identity.
async fn continue_session(
    state: &AppState,
    jar: &PrivateCookieJar,
    step_id: String,
    input: String,
) -> Result<Html<String>, GatewayError> {
    let values = SessionValues::load(jar);
    values.log("Retrieved");

    let request = ContinueRequest::new(values.get_str(SESSION_ID), step_id, input);
    let response = state
        .backend
        .cont(&request)
        .await
        .map_err(GatewayError::Continue)?;

    render_page(state, &response.content)
}

/// Render content keyed by its own step id, which the backend may have moved on
fn render_page(state: &AppState, content: &Content) -> Result<Html<String>, GatewayError> {
    let page = state
        .renderer
        .render(&content.step_id, content.body.as_ref())?;
    Ok(Html(page))
}

async fn unknown() -> StatusCode {
    StatusCode::NOT_FOUND
}

// ============================================================
// Error Handling
// ============================================================

/// Terminal failure of one request
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to start session: {0}")]
    Start(#[source] RpcError),

    #[error("failed to continue session: {0}")]
    Continue(#[source] RpcError),

    #[error("Failed to render page: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            // Every backend failure looks the same to the browser
            GatewayError::Start(_) | GatewayError::Continue(_) => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            GatewayError::Render(e) => {
                tracing::error!(error = %e, "Render failed");
                let message = e.to_string();
                let body = format!(
                    "<h1>Error</h1><p>Failed to render page: {}</p>",
                    HtmlEscape(&message)
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
        }
    }
}
