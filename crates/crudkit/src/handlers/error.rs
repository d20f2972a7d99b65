use axum::response::{IntoResponse, Response};
use crudkit_core::response::ErrorCode;
use crudkit_core::storage::{repository_error_to_status_code, RepositoryError};
use crudkit_core::Envelope;

use super::Reply;

/// Error type returned by resource handlers.
///
/// `Rejected` carries an envelope produced by the pipeline or by a not-found
/// lookup. `Repository` is any other storage failure; it is answered at this
/// boundary with the status from [`repository_error_to_status_code`].
#[derive(Debug)]
pub enum AppError {
    Rejected(Envelope),
    Repository(RepositoryError),
}

impl AppError {
    /// Maps a failed lookup of `id`: `NotFound` becomes the not-found envelope.
    pub fn from_lookup(err: RepositoryError, id: &str) -> Self {
        if err.is_not_found() {
            AppError::Rejected(Envelope::not_found(id))
        } else {
            AppError::Repository(err)
        }
    }
}

/// Whether a repository failure answered with `status` is the caller's fault.
fn is_client_fault(status: u16) -> bool {
    (400..500).contains(&status)
}

fn error_code_for(status: u16) -> ErrorCode {
    match status {
        400 => ErrorCode::BadRequest,
        404 => ErrorCode::NotFound,
        409 => ErrorCode::Conflict,
        503 => ErrorCode::ServiceUnavailable,
        _ => ErrorCode::InternalError,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Rejected(envelope) => {
                tracing::warn!(
                    status = envelope.status_code,
                    error_code = ?envelope.error_code,
                    message = ?envelope.message,
                    "Request rejected"
                );
                Reply(envelope).into_response()
            }
            AppError::Repository(err) => {
                let status = repository_error_to_status_code(&err);
                if is_client_fault(status) {
                    tracing::warn!(error = %err, status, "Repository rejected request");
                } else {
                    tracing::error!(error = %err, status, "Repository error");
                }

                Reply(Envelope::failure(status, error_code_for(status), err.to_string()))
                    .into_response()
            }
        }
    }
}

impl From<Envelope> for AppError {
    fn from(envelope: Envelope) -> Self {
        AppError::Rejected(envelope)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_lookup_not_found_becomes_envelope() {
        let err = RepositoryError::NotFound {
            entity_type: "Widget",
            id: "42".to_string(),
        };
        match AppError::from_lookup(err, "42") {
            AppError::Rejected(envelope) => assert_eq!(envelope, Envelope::not_found("42")),
            other => panic!("Expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_keeps_other_failures() {
        let err = RepositoryError::ConnectionFailed("refused".to_string());
        assert!(matches!(
            AppError::from_lookup(err, "42"),
            AppError::Repository(RepositoryError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_connection_failure_is_503() {
        let response =
            AppError::Repository(RepositoryError::ConnectionFailed("refused".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_bad_page_token_is_client_fault() {
        let err = RepositoryError::InvalidData("Invalid pagination_page".to_string());
        let status = repository_error_to_status_code(&err);

        assert!(is_client_fault(status));
        assert_eq!(error_code_for(status), ErrorCode::BadRequest);
        assert_eq!(
            AppError::Repository(err).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_backend_faults_are_not_client_faults() {
        for err in [
            RepositoryError::ConnectionFailed("refused".to_string()),
            RepositoryError::QueryFailed("boom".to_string()),
        ] {
            assert!(!is_client_fault(repository_error_to_status_code(&err)));
        }
    }

    #[test]
    fn test_serialization_failure_is_500() {
        let response =
            AppError::Repository(RepositoryError::Serialization("bad".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
