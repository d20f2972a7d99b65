mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::Repository;
pub use types::{
    decode_page_token, encode_page_token, ExtraParams, PaginationResult, LAST_EVALUATED_KEY,
    NEXT_PAGE,
};
