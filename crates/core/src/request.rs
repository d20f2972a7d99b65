use std::collections::BTreeMap;

/// Transport-independent view of an inbound request.
///
/// Header names are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// The token of an `Authorization: Bearer <token>` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RequestContext::new("GET", "/v1/widgets").with_header("X-Role", "admin");
        assert_eq!(request.header("x-role"), Some("admin"));
        assert_eq!(request.header("X-ROLE"), Some("admin"));
    }

    #[test]
    fn test_bearer_token() {
        let request =
            RequestContext::new("GET", "/").with_header("Authorization", "Bearer secret-1");
        assert_eq!(request.bearer_token(), Some("secret-1"));

        let basic = RequestContext::new("GET", "/").with_header("Authorization", "Basic abc");
        assert_eq!(basic.bearer_token(), None);

        let empty = RequestContext::new("GET", "/").with_header("Authorization", "Bearer ");
        assert_eq!(empty.bearer_token(), None);
    }
}
