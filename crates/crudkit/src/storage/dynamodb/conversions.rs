//! DynamoDB attribute conversion functions.
//!
//! Pure functions mapping JSON documents to attribute maps and back, so any
//! serde entity can be stored without hand-written item layouts.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use crudkit_core::model::to_map;
use crudkit_core::storage::RepositoryError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value to an attribute value.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

fn parse_number(raw: &str) -> Result<Value, RepositoryError> {
    serde_json::from_str::<Number>(raw)
        .map(Value::Number)
        .map_err(|_| RepositoryError::InvalidData(format!("Invalid number attribute: {raw}")))
}

/// Convert an attribute value to JSON. Binary attributes are not supported.
pub fn attribute_to_json(attribute: &AttributeValue) -> Result<Value, RepositoryError> {
    match attribute {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(items) => items
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_json(map),
        AttributeValue::Ss(items) => Ok(Value::Array(
            items.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(_) | AttributeValue::Bs(_) => Err(RepositoryError::InvalidData(
            "Binary attributes are not supported".to_string(),
        )),
        other => Err(RepositoryError::InvalidData(format!(
            "Unsupported attribute: {other:?}"
        ))),
    }
}

/// Convert a whole item to a JSON object.
pub fn item_to_json(item: &Item) -> Result<Value, RepositoryError> {
    item.iter()
        .map(|(k, v)| attribute_to_json(v).map(|v| (k.clone(), v)))
        .collect::<Result<Map<_, _>, _>>()
        .map(Value::Object)
}

/// Convert a JSON object to an item. Anything else is rejected.
pub fn json_to_item(value: &Value) -> Result<Item, RepositoryError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), json_to_attribute(v)))
            .collect()),
        other => Err(RepositoryError::InvalidData(format!(
            "Expected an object key, got {other}"
        ))),
    }
}

/// Convert an entity to a DynamoDB item.
pub fn entity_to_item<E: Serialize>(entity: &E) -> Result<Item, RepositoryError> {
    Ok(to_map(entity)?
        .iter()
        .map(|(k, v)| (k.clone(), json_to_attribute(v)))
        .collect())
}

/// Convert a DynamoDB item to an entity.
pub fn item_to_entity<E: DeserializeOwned>(item: &Item) -> Result<E, RepositoryError> {
    let value = item_to_json(item)?;
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::InvalidData(format!("Stored item does not match: {e}")))
}
