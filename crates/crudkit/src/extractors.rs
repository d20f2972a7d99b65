//! Axum extractors that turn an inbound request into a [`RequestContext`].

use std::collections::BTreeMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use crudkit_core::{Envelope, RequestContext};

use crate::handlers::Reply;

/// Builds the transport-independent view of a request.
///
/// Fails with a message when the query string cannot be decoded. Headers
/// with non UTF-8 values are skipped.
pub fn request_context(parts: &Parts) -> Result<RequestContext, String> {
    let query = match parts.uri.query() {
        Some(_) => {
            let Query(query) = Query::<BTreeMap<String, String>>::try_from_uri(&parts.uri)
                .map_err(|e| e.body_text())?;
            query
        }
        None => BTreeMap::new(),
    };

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();

    Ok(RequestContext {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        query,
        headers,
    })
}

/// Extractor for the [`RequestContext`] of the current request.
///
/// Rejects with a 400 envelope when the query string is malformed.
pub struct Inbound(pub RequestContext);

impl<S> FromRequestParts<S> for Inbound
where
    S: Send + Sync,
{
    type Rejection = Reply;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        request_context(parts)
            .map(Inbound)
            .map_err(|message| Reply(Envelope::bad_request(message)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(uri: &str) -> Parts {
        let (parts, _) = Request::builder()
            .method("GET")
            .uri(uri)
            .header("X-Role", "admin")
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_request_context_reads_query_and_headers() {
        let context =
            request_context(&parts("/v1/widgets?pagination_item_count=2&range_key=a%20b")).unwrap();

        assert_eq!(context.method, "GET");
        assert_eq!(context.path, "/v1/widgets");
        assert_eq!(context.query_param("pagination_item_count"), Some("2"));
        assert_eq!(context.query_param("range_key"), Some("a b"));
        assert_eq!(context.header("x-role"), Some("admin"));
    }

    #[test]
    fn test_request_context_without_query() {
        let context = request_context(&parts("/v1/widgets/42")).unwrap();
        assert!(context.query.is_empty());
    }
}
