use std::{env, sync::Arc, time::Duration};

use crudkit_core::pagination::DEFAULT_PAGINATION_ITEM_COUNT;

use crate::resource::DEFAULT_VERSION;
use crate::transport::{AllowAll, BearerToken, TransportAuthorizer};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Version segment of every route (default: "v1")
    pub api_version: String,
    /// Default page size (default: 10, values below 1 fall back to it)
    pub pagination_item_count: usize,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Accepted bearer tokens. Empty means every request is let through.
    pub api_tokens: Vec<String>,
    /// DynamoDB table name (default: "crudkit")
    /// Only read when the `dynamodb` feature is enabled.
    pub dynamodb_table_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `API_VERSION` - Route version segment (default: "v1")
    /// - `PAGINATION_ITEM_COUNT` - Default page size (default: 10)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `API_TOKENS` - Comma separated bearer tokens (default: none)
    /// - `DYNAMODB_TABLE_NAME` - DynamoDB table (default: "crudkit")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_version: lookup("API_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            pagination_item_count: lookup("PAGINATION_ITEM_COUNT")
                .and_then(|v| v.trim().parse().ok())
                .filter(|count: &usize| *count >= 1)
                .unwrap_or(DEFAULT_PAGINATION_ITEM_COUNT),
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10),
            api_tokens: lookup("API_TOKENS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            dynamodb_table_name: lookup("DYNAMODB_TABLE_NAME")
                .unwrap_or_else(|| "crudkit".to_string()),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Bearer token checks when tokens are configured, otherwise allow all.
    pub fn transport_authorizer(&self) -> Arc<dyn TransportAuthorizer> {
        if self.api_tokens.is_empty() {
            Arc::new(AllowAll)
        } else {
            Arc::new(BearerToken::new(self.api_tokens.iter().cloned()))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.api_version, "v1");
        assert_eq!(config.pagination_item_count, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.api_tokens.is_empty());
        assert_eq!(config.dynamodb_table_name, "crudkit");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("API_VERSION", "v2"),
            ("PAGINATION_ITEM_COUNT", "25"),
            ("REQUEST_TIMEOUT_SECONDS", "3"),
            ("API_TOKENS", "alpha, beta,,"),
            ("DYNAMODB_TABLE_NAME", "widgets"),
        ]);

        assert_eq!(config.api_version, "v2");
        assert_eq!(config.pagination_item_count, 25);
        assert_eq!(config.request_timeout_seconds, 3);
        assert_eq!(config.api_tokens, vec!["alpha", "beta"]);
        assert_eq!(config.dynamodb_table_name, "widgets");
    }

    #[test]
    fn test_invalid_page_size_falls_back() {
        assert_eq!(config(&[("PAGINATION_ITEM_COUNT", "0")]).pagination_item_count, 10);
        assert_eq!(config(&[("PAGINATION_ITEM_COUNT", "-3")]).pagination_item_count, 10);
        assert_eq!(config(&[("PAGINATION_ITEM_COUNT", "lots")]).pagination_item_count, 10);
    }
}
