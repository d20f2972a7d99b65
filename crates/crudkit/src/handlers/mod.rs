pub mod error;
pub mod reply;
pub mod resource;

pub use error::AppError;
pub use reply::Reply;
