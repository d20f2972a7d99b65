use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::RepositoryError;
use crate::pagination::{PAGINATION_ITEM_COUNT_PARAM, PAGINATION_PAGE_PARAM};

/// Key under which a page carries the backend position it stopped at.
pub const LAST_EVALUATED_KEY: &str = "last_evaluated_key";

/// Key under which a page carries the encoded continuation token.
pub const NEXT_PAGE: &str = "next_page";

/// One page of a paginated scan.
///
/// `meta` always contains [`LAST_EVALUATED_KEY`] (the raw backend key, or
/// `null` once the scan is exhausted) and [`NEXT_PAGE`], the same key encoded
/// as a string ready to be sent back as `pagination_page`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationResult<E> {
    pub models: Vec<E>,
    pub meta: Map<String, Value>,
}

impl<E> PaginationResult<E> {
    /// Builds a page from the returned models and the key the scan stopped at.
    pub fn new(models: Vec<E>, last_evaluated_key: Option<Value>) -> Self {
        let mut meta = Map::new();
        let next_page = last_evaluated_key
            .as_ref()
            .map(|key| Value::String(encode_page_token(key)))
            .unwrap_or(Value::Null);
        meta.insert(
            LAST_EVALUATED_KEY.to_string(),
            last_evaluated_key.unwrap_or(Value::Null),
        );
        meta.insert(NEXT_PAGE.to_string(), next_page);
        Self { models, meta }
    }

    /// The continuation token for the next call, if the scan can resume.
    pub fn next_page_token(&self) -> Option<&str> {
        self.meta.get(NEXT_PAGE).and_then(Value::as_str)
    }

    /// Maps every model, keeping the pagination metadata.
    pub fn try_map<T, F, Err>(self, f: F) -> Result<PaginationResult<T>, Err>
    where
        F: FnMut(E) -> Result<T, Err>,
    {
        let models = self.models.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginationResult {
            models,
            meta: self.meta,
        })
    }
}

/// Encodes a backend key as an opaque continuation token.
pub fn encode_page_token(key: &Value) -> String {
    key.to_string()
}

/// Decodes a continuation token previously produced by [`encode_page_token`].
pub fn decode_page_token(token: &str) -> Result<Value, RepositoryError> {
    serde_json::from_str(token)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid pagination_page: {e}")))
}

/// Backend-specific lookup parameters forwarded from the query string.
///
/// Pagination parameters are never part of this set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams(BTreeMap<String, String>);

impl ExtraParams {
    /// Name of the parameter carrying a secondary (range) key.
    pub const RANGE_KEY: &'static str = "range_key";

    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the non-pagination query parameters of a request.
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        Self(
            query
                .iter()
                .filter(|(k, _)| {
                    k.as_str() != PAGINATION_ITEM_COUNT_PARAM && k.as_str() != PAGINATION_PAGE_PARAM
                })
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn range_key(&self) -> Option<&str> {
        self.get(Self::RANGE_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_with_key_carries_token() {
        let page = PaginationResult::new(vec![1, 2], Some(json!({"id": "b"})));

        assert_eq!(page.meta[LAST_EVALUATED_KEY], json!({"id": "b"}));
        assert_eq!(page.next_page_token(), Some(r#"{"id":"b"}"#));
    }

    #[test]
    fn test_exhausted_page_has_null_key() {
        let page: PaginationResult<i32> = PaginationResult::new(vec![], None);

        assert_eq!(page.meta[LAST_EVALUATED_KEY], Value::Null);
        assert_eq!(page.meta[NEXT_PAGE], Value::Null);
        assert!(page.next_page_token().is_none());
    }

    #[test]
    fn test_token_round_trips() {
        let key = json!({"id": {"S": "w-1"}, "sort": 3});
        let token = encode_page_token(&key);
        assert_eq!(decode_page_token(&token).unwrap(), key);
    }

    #[test]
    fn test_malformed_token_is_invalid_data() {
        let result = decode_page_token("not-json{");
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[test]
    fn test_try_map_keeps_meta() {
        let page = PaginationResult::new(vec![1, 2], Some(json!({"id": "2"})));
        let mapped: PaginationResult<String> =
            page.try_map(|n| Ok::<_, ()>(n.to_string())).unwrap();

        assert_eq!(mapped.models, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.next_page_token(), Some(r#"{"id":"2"}"#));
    }

    #[test]
    fn test_extra_params_skip_pagination() {
        let mut query = BTreeMap::new();
        query.insert("pagination_item_count".to_string(), "5".to_string());
        query.insert("pagination_page".to_string(), "{}".to_string());
        query.insert("range_key".to_string(), "2024".to_string());

        let extra = ExtraParams::from_query(&query);

        assert_eq!(extra.range_key(), Some("2024"));
        assert!(extra.get("pagination_item_count").is_none());
        assert!(extra.get("pagination_page").is_none());
    }
}
