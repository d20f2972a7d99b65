use std::collections::BTreeMap;

use thiserror::Error;

/// Query parameter holding the requested page size.
pub const PAGINATION_ITEM_COUNT_PARAM: &str = "pagination_item_count";

/// Query parameter holding the continuation token.
pub const PAGINATION_PAGE_PARAM: &str = "pagination_page";

/// Page size used when a resource does not configure one.
pub const DEFAULT_PAGINATION_ITEM_COUNT: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("pagination_item_count cannot be less than 1")]
    ItemCountTooSmall,
    #[error("pagination_item_count must be an integer, got {0:?}")]
    ItemCountNotANumber(String),
}

/// The pagination inputs of a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub item_count: usize,
    pub page: Option<String>,
}

impl PageRequest {
    /// Reads the pagination parameters from a query string.
    ///
    /// A missing item count falls back to `default_item_count`; an empty
    /// page token means "start from the beginning".
    pub fn from_query(
        query: &BTreeMap<String, String>,
        default_item_count: usize,
    ) -> Result<Self, PageRequestError> {
        let item_count = match query.get(PAGINATION_ITEM_COUNT_PARAM) {
            None => default_item_count,
            Some(raw) => {
                let count: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| PageRequestError::ItemCountNotANumber(raw.clone()))?;
                if count < 1 {
                    return Err(PageRequestError::ItemCountTooSmall);
                }
                usize::try_from(count).map_err(|_| PageRequestError::ItemCountNotANumber(raw.clone()))?
            }
        };

        if item_count < 1 {
            return Err(PageRequestError::ItemCountTooSmall);
        }

        let page = query
            .get(PAGINATION_PAGE_PARAM)
            .filter(|token| !token.is_empty())
            .cloned();

        Ok(Self { item_count, page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let request = PageRequest::from_query(&query(&[]), 25).unwrap();
        assert_eq!(
            request,
            PageRequest {
                item_count: 25,
                page: None
            }
        );
    }

    #[test]
    fn test_reads_both_params() {
        let request = PageRequest::from_query(
            &query(&[
                ("pagination_item_count", "3"),
                ("pagination_page", r#"{"id":"b"}"#),
            ]),
            10,
        )
        .unwrap();

        assert_eq!(request.item_count, 3);
        assert_eq!(request.page.as_deref(), Some(r#"{"id":"b"}"#));
    }

    #[test]
    fn test_zero_and_negative_counts_are_rejected() {
        for raw in ["0", "-1", "-100"] {
            let result = PageRequest::from_query(&query(&[("pagination_item_count", raw)]), 10);
            assert_eq!(result, Err(PageRequestError::ItemCountTooSmall), "count {raw}");
        }
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let result = PageRequest::from_query(&query(&[("pagination_item_count", "ten")]), 10);
        assert_eq!(
            result,
            Err(PageRequestError::ItemCountNotANumber("ten".to_string()))
        );
    }

    #[test]
    fn test_empty_page_token_starts_over() {
        let request =
            PageRequest::from_query(&query(&[("pagination_page", "")]), 10).unwrap();
        assert!(request.page.is_none());
    }

    #[test]
    fn test_too_small_message() {
        assert_eq!(
            PageRequestError::ItemCountTooSmall.to_string(),
            "pagination_item_count cannot be less than 1"
        );
    }
}
