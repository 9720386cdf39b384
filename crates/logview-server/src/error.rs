//! Error types for the query surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use logview_core::RetrievalError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the query surface.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No retriever has been configured for this server.
    #[error("log retriever not initialized")]
    RetrieverUnavailable,

    /// The retriever reported a failure.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ServerError {
    /// HTTP status and machine-readable kind for this error.
    #[must_use]
    pub const fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) | Self::Retrieval(RetrievalError::InvalidCriteria(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            Self::RetrieverUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            Self::Retrieval(e) if e.is_store_unavailable() => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            Self::Retrieval(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "retrieval_error")
            }
            Self::BindFailed(_, _) | Self::Config(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"error":"internal_error","message":"failed to serialize error"}"#.to_string()
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use logview_store::StoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unavailable_error_response() {
        let response = ServerError::RetrieverUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["error"], "unavailable");
        assert_eq!(json["message"], "log retriever not initialized");
    }

    #[tokio::test]
    async fn test_store_unavailable_error_response() {
        let err = ServerError::from(RetrievalError::from(StoreError::Unavailable(
            "connection refused".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["error"], "store_unavailable");
        assert!(json["message"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_malformed_record_error_response() {
        let err = ServerError::from(RetrievalError::MalformedRecord("not an object".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "retrieval_error");
    }

    #[tokio::test]
    async fn test_invalid_request_error_response() {
        let response = ServerError::InvalidRequest("bad limit".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let response = ServerError::Internal("join failed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "internal_error");
    }

    #[test]
    fn test_error_display() {
        let err = ServerError::InvalidRequest("bad param".to_string());
        assert_eq!(err.to_string(), "invalid request: bad param");

        let err = ServerError::from(RetrievalError::InvalidCriteria("limit".to_string()));
        assert_eq!(err.to_string(), "invalid criteria: limit");
        assert_eq!(err.status().0, StatusCode::BAD_REQUEST);
    }
}
