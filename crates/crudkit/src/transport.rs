//! Transport-level authorization applied before the resource pipeline runs.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crudkit_core::authz::AuthorizationResult;
use crudkit_core::{Envelope, RequestContext};

use crate::extractors::request_context;
use crate::handlers::Reply;

/// Decides whether a request may reach a resource at all.
#[async_trait]
pub trait TransportAuthorizer: Send + Sync + 'static {
    async fn authorize(&self, request: &RequestContext) -> AuthorizationResult;
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl TransportAuthorizer for AllowAll {
    async fn authorize(&self, _request: &RequestContext) -> AuthorizationResult {
        AuthorizationResult::allow()
    }
}

/// Accepts requests carrying `Authorization: Bearer <token>` with a known token.
#[derive(Debug, Clone)]
pub struct BearerToken {
    tokens: HashSet<String>,
}

impl BearerToken {
    pub fn new<T: Into<String>>(tokens: impl IntoIterator<Item = T>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TransportAuthorizer for BearerToken {
    async fn authorize(&self, request: &RequestContext) -> AuthorizationResult {
        match request.bearer_token() {
            None => AuthorizationResult::deny("Missing bearer token"),
            Some(token) if self.tokens.contains(token) => AuthorizationResult::allow(),
            Some(_) => AuthorizationResult::deny("Invalid bearer token"),
        }
    }
}

/// Middleware running a [`TransportAuthorizer`] in front of resource routes.
pub async fn transport_gate(
    State(authorizer): State<Arc<dyn TransportAuthorizer>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let context = match request_context(&parts) {
        Ok(context) => context,
        Err(message) => return Reply(Envelope::bad_request(message)).into_response(),
    };

    let result = authorizer.authorize(&context).await;
    if !result.success {
        tracing::warn!(
            method = %context.method,
            path = %context.path,
            message = ?result.message,
            "Transport authorization denied"
        );
        return Reply(Envelope::unauthorized(result.message)).into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allow_all() {
        let request = RequestContext::new("GET", "/v1/widgets");
        assert!(AllowAll.authorize(&request).await.success);
    }

    #[tokio::test]
    async fn test_bearer_token() {
        let authorizer = BearerToken::new(["s3cret"]);

        let missing = RequestContext::new("GET", "/v1/widgets");
        assert_eq!(
            authorizer.authorize(&missing).await,
            AuthorizationResult::deny("Missing bearer token")
        );

        let wrong = missing.clone().with_header("Authorization", "Bearer nope");
        assert_eq!(
            authorizer.authorize(&wrong).await,
            AuthorizationResult::deny("Invalid bearer token")
        );

        let valid = missing.with_header("Authorization", "Bearer s3cret");
        assert!(authorizer.authorize(&valid).await.success);
    }
}
