//! Reusable per-action authorization checks.

use crudkit_core::authz::{
    AuthorizationResult, Authorize, CreateParams, DeleteParams, GetParams, ListParams,
    PatchParams, UpdateParams,
};
use crudkit_core::RequestContext;

/// Requires a request header to hold an exact value.
///
/// Usable on every action.
#[derive(Debug, Clone)]
pub struct RequireHeader {
    name: String,
    value: String,
}

impl RequireHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn check_request(&self, request: &RequestContext) -> AuthorizationResult {
        AuthorizationResult::allow_if(
            request.header(&self.name) == Some(self.value.as_str()),
            format!("Header {} must be {}", self.name, self.value),
        )
    }
}

impl Authorize<ListParams> for RequireHeader {
    fn check(&self, params: &ListParams) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

impl Authorize<GetParams> for RequireHeader {
    fn check(&self, params: &GetParams) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

impl<I> Authorize<CreateParams<I>> for RequireHeader {
    fn check(&self, params: &CreateParams<I>) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

impl<I> Authorize<UpdateParams<I>> for RequireHeader {
    fn check(&self, params: &UpdateParams<I>) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

impl Authorize<PatchParams> for RequireHeader {
    fn check(&self, params: &PatchParams) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

impl Authorize<DeleteParams> for RequireHeader {
    fn check(&self, params: &DeleteParams) -> AuthorizationResult {
        self.check_request(&params.request)
    }
}

/// Caps the page size a list call may ask for.
#[derive(Debug, Clone, Copy)]
pub struct MaxPageSize(pub usize);

impl Authorize<ListParams> for MaxPageSize {
    fn check(&self, params: &ListParams) -> AuthorizationResult {
        AuthorizationResult::allow_if(
            params.item_count <= self.0,
            format!("pagination_item_count cannot exceed {}", self.0),
        )
    }
}
