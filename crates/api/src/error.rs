use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use extract::{ExtractionError, SessionError, SessionView};
use query::TriageError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<SessionView>,
}

/// A failed request: status, message and, for form routes, the session as
/// it stands after the failure.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub session: Option<SessionView>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            session: None,
        }
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", what))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn with_session(mut self, session: SessionView) -> Self {
        self.session = Some(session);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            session: self.session,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        let status = match err {
            ExtractionError::UnsupportedIntent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ExtractionError::Provider(_) | ExtractionError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::InvalidState { .. } => StatusCode::CONFLICT,
            SessionError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::Generation(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}
