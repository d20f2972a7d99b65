//! Storage backend implementations.
//!
//! The in-memory backend is always available. The DynamoDB backend is
//! compiled in with the `dynamodb` feature:
//!
//! ```bash
//! cargo build -p crudkit --features dynamodb
//! ```

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbRepository;
