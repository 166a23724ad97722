//! Dashboard handler and HTTP error mapping.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use webstats_core::error::{ErrorCode, WebStatsError};

use crate::app_state::AppState;

/// `GET /`
pub async fn page(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let res = tokio::time::timeout(state.render_timeout(), state.composer().generate()).await;

    match res {
        Ok(Ok(body)) => {
            tracing::debug!(
                elapsed_us = started.elapsed().as_micros() as u64,
                bytes = body.len(),
                "page rendered"
            );
            Html(body).into_response()
        }
        Ok(Err(e)) => HttpError(e).into_response(),
        Err(_) => HttpError(WebStatsError::Timeout).into_response(),
    }
}

/// Request-time failure turned into a 5xx.
#[derive(Debug)]
pub struct HttpError(pub WebStatsError);

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.code().as_str();
        tracing::error!(status = status.as_u16(), code, error = %self.0, "page render failed");
        (status, format!("{code}: {}", self.0)).into_response()
    }
}
