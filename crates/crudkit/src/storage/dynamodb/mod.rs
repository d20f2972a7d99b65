//! DynamoDB storage backend.
//!
//! Entities are stored as plain attribute maps mirroring their serde
//! representation, keyed by a hash key and an optional range key.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
