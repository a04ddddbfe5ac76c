use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diversity_core::DiversityError;

/// A [`DiversityError`] on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DiversityError);

impl From<DiversityError> for ApiError {
    fn from(err: DiversityError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DiversityError::InvalidInput(_)
            | DiversityError::Identifier(_)
            | DiversityError::Text(_) => StatusCode::BAD_REQUEST,
            DiversityError::CustomerReadOnly(_) => StatusCode::FORBIDDEN,
            DiversityError::CustomerNotFound(_) => StatusCode::NO_CONTENT,
            DiversityError::NotFound(_) => StatusCode::NOT_FOUND,
            DiversityError::AlreadyExists(_) => StatusCode::CONFLICT,
            DiversityError::MalformedRequest(_) | DiversityError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DiversityError::MergeFailed(_)
            | DiversityError::Store(_)
            | DiversityError::StorageDirCreation(_)
            | DiversityError::FileWrite(_)
            | DiversityError::FileRead(_)
            | DiversityError::Serialization(_)
            | DiversityError::Deserialization(_)
            | DiversityError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0 {
            DiversityError::Validation(failures) => (status, Json(failures)).into_response(),
            _ if status == StatusCode::NO_CONTENT => status.into_response(),
            err if status.is_server_error() => {
                tracing::error!(error = %err, "request failed");
                (status, "Internal error").into_response()
            }
            err => (status, err.to_string()).into_response(),
        }
    }
}
