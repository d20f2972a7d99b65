use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crudkit_core::Envelope;

/// An [`Envelope`] sent as `application/json` with its own status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply(pub Envelope);

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

impl From<Envelope> for Reply {
    fn from(envelope: Envelope) -> Self {
        Reply(envelope)
    }
}
