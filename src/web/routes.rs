use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Serialize;

use super::AppState;
use crate::browser::{BrowserSession, SessionConfig};
use crate::constants::ATTACHMENT_FILENAME;
use crate::convert::{convert_share, ConvertError, ConvertRequest};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert).options(convert_preflight))
        .route("/diag", get(diag))
        .route("/healthz", get(health))
}

/// Standardized error envelope for every client and server error.
#[derive(Debug, Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { ok: false, error })).into_response()
}

/// Handler for share conversion (POST /convert).
async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Response {
    // A missing or malformed body (including a missing `url`) is a client
    // error, not axum's default 422
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {rejection}"),
            );
        }
    };

    match convert_share(&state.config, &request).await {
        Ok(pdf) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{ATTACHMENT_FILENAME}\""),
                ),
            ],
            pdf,
        )
            .into_response(),
        Err(e @ ConvertError::InvalidUrl(_)) => {
            tracing::warn!(url = %request.url, "Rejected conversion request: {e}");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(url = %request.url, "Conversion failed: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Plain OPTIONS on /convert (CORS preflights are answered by the layer).
async fn convert_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
struct DiagBody {
    ok: bool,
    title: String,
    chrome_path: String,
}

/// Handler for the browser environment smoke test (GET /diag).
async fn diag(State(state): State<AppState>) -> Response {
    match run_diag(&state).await {
        Ok(title) => Json(DiagBody {
            ok: true,
            title,
            chrome_path: state
                .config
                .chrome_path
                .clone()
                .unwrap_or_else(|| "auto".to_string()),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Diag failed: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
        }
    }
}

/// Launch a browser, load a fixed external page, and report its title.
async fn run_diag(state: &AppState) -> anyhow::Result<String> {
    let mut session_config = SessionConfig::from(state.config.as_ref());
    session_config.request_timeout = Duration::from_secs(30);

    let session = BrowserSession::launch(&session_config).await?;
    let result = fetch_example_title(&session).await;
    session.close().await;
    result
}

async fn fetch_example_title(session: &BrowserSession) -> anyhow::Result<String> {
    let page = session.new_page().await?;
    tokio::time::timeout(Duration::from_secs(30), page.goto("https://example.com"))
        .await
        .map_err(|_| anyhow::anyhow!("Diag navigation timed out"))??;
    let title: String = page.evaluate("document.title").await?.into_value()?;
    Ok(title)
}

async fn health() -> &'static str {
    "OK"
}
