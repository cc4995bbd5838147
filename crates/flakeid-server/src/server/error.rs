use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors surfaced to HTTP clients.
///
/// Generation failures are not retried; the client sees a 500 with the
/// reason in a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Internal Server Error: {0}")]
    Generator(#[from] flakeid::Error),

    #[error("Internal Server Error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Generator(err) => tracing::error!(error = %err, "ID generation failed"),
            Self::Join(err) => tracing::error!(error = %err, "ID generation task failed"),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
