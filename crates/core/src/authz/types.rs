use crate::request::RequestContext;

/// Outcome of a single authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub success: bool,
    pub message: Option<String>,
}

impl AuthorizationResult {
    pub fn allow() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Allows when `condition` holds, denies with `message` otherwise.
    pub fn allow_if(condition: bool, message: impl Into<String>) -> Self {
        if condition {
            Self::allow()
        } else {
            Self::deny(message)
        }
    }
}

/// Parameters seen by checks on `GET /{version}/{resource}`.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub request: RequestContext,
    pub item_count: usize,
    pub page: Option<String>,
}

/// Parameters seen by checks on `GET /{version}/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct GetParams {
    pub request: RequestContext,
    pub id: String,
}

/// Parameters seen by checks on `POST /{version}/{resource}`.
#[derive(Debug, Clone)]
pub struct CreateParams<I> {
    pub request: RequestContext,
    pub input: I,
}

/// Parameters seen by checks on `PUT /{version}/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct UpdateParams<I> {
    pub request: RequestContext,
    pub id: String,
    pub input: I,
}

/// Parameters seen by checks on `PATCH /{version}/{resource}/{id}`.
///
/// The patch document is not yet merged at authorization time.
#[derive(Debug, Clone)]
pub struct PatchParams {
    pub request: RequestContext,
    pub id: String,
}

/// Parameters seen by checks on `DELETE /{version}/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct DeleteParams {
    pub request: RequestContext,
    pub id: String,
}
