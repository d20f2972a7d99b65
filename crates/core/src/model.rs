//! Schema traits for the three shapes a resource deals with.
//!
//! - [`InputModel`]: what clients send on create, update and (after merging) patch.
//! - [`Entity`]: what the repository persists.
//! - [`OutputModel`]: what clients receive; entities are shaped through it.
//!
//! All conversions go through the plain JSON mapping of a value, the same
//! representation a merge patch is applied to.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors produced while turning raw input into a validated model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The document could not be parsed into the input schema.
    #[error("{0}")]
    Malformed(String),
    /// The document parsed but a field holds an unacceptable value.
    #[error("{field}: {message}")]
    Field { field: String, message: String },
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validated input schema.
pub trait InputModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Checks constraints serde cannot express. Runs after deserialization.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A persisted record.
pub trait Entity<I>: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name used in repository errors and logs.
    const ENTITY_TYPE: &'static str;

    /// The identity (hash key) of this entity.
    fn id(&self) -> String;

    /// Builds a new entity, assigning any backend-owned fields.
    fn from_input(input: &I) -> Self;

    /// Overwrites every mutable field with the values in `input`.
    ///
    /// Implementations must not touch identity or key fields.
    fn apply_input(&mut self, input: &I);
}

/// A response schema. Any serde round-trippable type qualifies.
pub trait OutputModel: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> OutputModel for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Parses and validates a raw request body.
pub fn parse_input<I: InputModel>(raw: &[u8]) -> Result<I, ValidationError> {
    let input: I =
        serde_json::from_slice(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    input.validate()?;
    Ok(input)
}

/// Validates an already-parsed JSON document, e.g. the result of a merge patch.
pub fn input_from_value<I: InputModel>(value: Value) -> Result<I, ValidationError> {
    let input: I =
        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    input.validate()?;
    Ok(input)
}

/// Converts a value to its plain key/value mapping.
pub fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, RepositoryError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Shapes an entity through the output schema `O`.
///
/// Fields the output schema does not declare are dropped.
pub fn shape_output<O: OutputModel, E: Serialize>(
    entity: &E,
) -> Result<Map<String, Value>, RepositoryError> {
    let output: O = serde_json::from_value(Value::Object(to_map(entity)?))?;
    to_map(&output)
}
