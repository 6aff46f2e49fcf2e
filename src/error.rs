//! Error types and HTTP error responses.
//!
//! Every failure a route can hit is an [`AppError`]. Converting one into a response
//! logs the cause server-side and sends only a fixed plain-text message.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{MSG_CONFIGURATION_ERROR, MSG_INTERNAL_ERROR, MSG_QUOTE_ERROR};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store unreachable: {0}")]
    Connectivity(sqlx::Error),

    #[error("Query failed: {0}")]
    Query(sqlx::Error),

    #[error("Query timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("No row at offset {offset} of {total}")]
    EmptyResult { offset: u64, total: u64 },

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => AppError::Connectivity(err),
            _ => AppError::Query(err),
        }
    }
}

impl AppError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_CONFIGURATION_ERROR),
            AppError::Connectivity(_)
            | AppError::Query(_)
            | AppError::Timeout(_)
            | AppError::EmptyResult { .. } => (StatusCode::INTERNAL_SERVER_ERROR, MSG_QUOTE_ERROR),
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            AppError::EmptyResult { .. } => tracing::warn!(error = %self, "Quote vanished between count and fetch"),
            _ => tracing::error!(error = %self, "Error retrieving quote"),
        }
        plain_text(status, message)
    }
}

/// Plain-text response with an explicit UTF-8 content type.
pub fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_configuration_maps_to_configuration_message() {
        let (status, message) = AppError::Configuration("unset".into()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Configuration error.");
    }

    #[test]
    fn test_store_failures_share_one_message() {
        let errors = [
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::from(sqlx::Error::RowNotFound),
            AppError::Timeout(Duration::from_secs(5)),
            AppError::EmptyResult { offset: 3, total: 4 },
        ];
        for err in errors {
            assert_eq!(err.status_and_message().1, "Error retrieving quote.");
        }
    }

    #[test]
    fn test_sqlx_errors_are_classified() {
        assert!(matches!(
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::Connectivity(_)
        ));
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::Query(_)
        ));
    }

    #[test]
    fn test_response_hides_details() {
        let response = AppError::Configuration("SQL_CONNECTION_STRING is missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
