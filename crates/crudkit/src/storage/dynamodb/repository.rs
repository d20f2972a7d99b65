//! DynamoDB repository implementation.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use crudkit_core::storage::{
    decode_page_token, ExtraParams, PaginationResult, Repository, RepositoryError, Result,
};
use crudkit_core::{Entity, InputModel};

use super::conversions::{entity_to_item, item_to_entity, item_to_json, json_to_item, Item};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_scan_error,
    map_update_item_error,
};

/// Default name of the hash key attribute.
pub const DEFAULT_HASH_KEY: &str = "id";

/// DynamoDB-backed repository for one table.
///
/// The entity's serialized fields map one-to-one onto item attributes. The
/// hash key attribute must hold the entity id. When a range key is
/// configured, lookups read its (string) value from the `range_key` query
/// parameter.
pub struct DynamoDbRepository<I, E> {
    client: Client,
    table_name: String,
    hash_key: String,
    range_key: Option<String>,
    types: PhantomData<fn(I) -> E>,
}

impl<I, E> Clone for DynamoDbRepository<I, E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            table_name: self.table_name.clone(),
            hash_key: self.hash_key.clone(),
            range_key: self.range_key.clone(),
            types: PhantomData,
        }
    }
}

impl<I, E> fmt::Debug for DynamoDbRepository<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbRepository")
            .field("table_name", &self.table_name)
            .field("hash_key", &self.hash_key)
            .field("range_key", &self.range_key)
            .finish_non_exhaustive()
    }
}

impl<I, E> DynamoDbRepository<I, E>
where
    I: InputModel,
    E: Entity<I>,
{
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            hash_key: DEFAULT_HASH_KEY.to_string(),
            range_key: None,
            types: PhantomData,
        }
    }

    /// Creates a repository using the AWS SDK default credential chain.
    pub async fn from_env(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table_name)
    }

    pub fn with_hash_key(mut self, name: impl Into<String>) -> Self {
        self.hash_key = name.into();
        self
    }

    pub fn with_range_key(mut self, name: impl Into<String>) -> Self {
        self.range_key = Some(name.into());
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key(&self, id: &str, extra: &ExtraParams) -> Result<Item> {
        let mut key = Item::new();
        key.insert(self.hash_key.clone(), AttributeValue::S(id.to_string()));
        if let Some(range_key) = &self.range_key {
            let value = extra.range_key().ok_or_else(|| {
                RepositoryError::InvalidData(format!(
                    "Query parameter {} is required",
                    ExtraParams::RANGE_KEY
                ))
            })?;
            key.insert(range_key.clone(), AttributeValue::S(value.to_string()));
        }
        Ok(key)
    }

    fn is_key_attribute(&self, name: &str) -> bool {
        name == self.hash_key || self.range_key.as_deref() == Some(name)
    }
}

#[async_trait]
impl<I, E> Repository for DynamoDbRepository<I, E>
where
    I: InputModel,
    E: Entity<I>,
{
    type Input = I;
    type Entity = E;

    async fn list(&self, item_count: usize, page: Option<&str>) -> Result<PaginationResult<E>> {
        let start = page
            .map(|token| decode_page_token(token).and_then(|key| json_to_item(&key)))
            .transpose()?;

        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(i32::try_from(item_count).unwrap_or(i32::MAX))
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(map_scan_error)?;

        let models = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_entity)
            .collect::<Result<Vec<E>>>()?;
        let last_evaluated_key = result
            .last_evaluated_key
            .filter(|key| !key.is_empty())
            .map(|key| item_to_json(&key))
            .transpose()?;

        Ok(PaginationResult::new(models, last_evaluated_key))
    }

    async fn get(&self, id: &str, extra: &ExtraParams) -> Result<E> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(id, extra)?))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => item_to_entity(&item),
            None => Err(RepositoryError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id: id.to_string(),
            }),
        }
    }

    async fn save(&self, input: &I) -> Result<E> {
        let entity = E::from_input(input);
        let item = entity_to_item(&entity)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", &self.hash_key)
            .send()
            .await
            .map_err(|e| map_put_item_error(e, E::ENTITY_TYPE, entity.id()))?;

        Ok(entity)
    }

    async fn update(&self, id: &str, input: &I, extra: &ExtraParams) -> Result<E> {
        let mut entity = self.get(id, extra).await?;
        entity.apply_input(input);

        let attributes: Vec<(String, AttributeValue)> = entity_to_item(&entity)?
            .into_iter()
            .filter(|(name, _)| !self.is_key_attribute(name))
            .collect();
        if attributes.is_empty() {
            return Ok(entity);
        }

        let assignments = (0..attributes.len())
            .map(|i| format!("#a{i} = :v{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(id, extra)?))
            .update_expression(format!("SET {assignments}"))
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", &self.hash_key)
            .return_values(ReturnValue::AllNew);
        for (i, (name, value)) in attributes.into_iter().enumerate() {
            request = request
                .expression_attribute_names(format!("#a{i}"), name)
                .expression_attribute_values(format!(":v{i}"), value);
        }

        let result = request
            .send()
            .await
            .map_err(|e| map_update_item_error(e, E::ENTITY_TYPE, id))?;

        match result.attributes {
            Some(item) => item_to_entity(&item),
            None => Ok(entity),
        }
    }

    async fn delete(&self, id: &str, extra: &ExtraParams) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(id, extra)?))
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", &self.hash_key)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, E::ENTITY_TYPE, id))?;

        Ok(())
    }
}
