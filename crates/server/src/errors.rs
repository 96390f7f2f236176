use anicards_core::anilist::AniListError;
use anicards_core::domain::model::DomainError;
use anicards_core::render::RenderError;
use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = status_code_to_string(status);
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, axum::Json(body)).into_response()
    }
}

impl From<AniListError> for ServerError {
    fn from(err: AniListError) -> Self {
        let status = match err {
            AniListError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AniListError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AniListError::ServerError
            | AniListError::Status(_)
            | AniListError::Transport(_)
            | AniListError::MissingData(_)
            | AniListError::Decode(_) => StatusCode::BAD_GATEWAY,
        };
        ServerError::new(status, err.to_string())
    }
}

impl From<DomainError> for ServerError {
    fn from(err: DomainError) -> Self {
        ServerError::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<RenderError> for ServerError {
    fn from(err: RenderError) -> Self {
        ServerError::internal(format!("card render failed: {err}"))
    }
}

pub fn map_db_error(err: sqlx::Error, message: &str) -> ServerError {
    if is_unique_violation(&err) {
        return ServerError::new(StatusCode::CONFLICT, message);
    }
    ServerError::internal(format!("{message}: {err}"))
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                || db_err.code().as_deref() == Some("2067")
    )
}

fn status_code_to_string(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        StatusCode::BAD_GATEWAY => "upstream_error",
        StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
        _ => status.canonical_reason().unwrap_or("error"),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use anicards_core::ports::http::ErrorKind;

    use super::*;

    #[test]
    fn anilist_errors_map_to_http_statuses() {
        let cases = [
            (AniListError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (AniListError::UserNotFound("x".into()), StatusCode::NOT_FOUND),
            (AniListError::ServerError, StatusCode::BAD_GATEWAY),
            (AniListError::Transport(ErrorKind::Timeout), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn domain_errors_are_bad_requests() {
        let err = ServerError::from(DomainError::UnknownStatKey("nope".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
    }
}
