//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crudkit_core::storage::{
    decode_page_token, ExtraParams, PaginationResult, Repository, RepositoryError, Result,
};
use crudkit_core::{Entity, InputModel};

/// In-memory storage backend for testing and local runs.
///
/// Entities are kept in an ordered map keyed by id, so a scan is stable and
/// the continuation token is simply the last id returned. Data is lost when
/// the last clone is dropped.
pub struct InMemoryRepository<I, E> {
    entities: Arc<RwLock<BTreeMap<String, E>>>,
    input: PhantomData<fn(I)>,
}

impl<I, E> Clone for InMemoryRepository<I, E> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            input: PhantomData,
        }
    }
}

impl<I, E> Default for InMemoryRepository<I, E> {
    fn default() -> Self {
        Self {
            entities: Arc::new(RwLock::new(BTreeMap::new())),
            input: PhantomData,
        }
    }
}

impl<I, E> fmt::Debug for InMemoryRepository<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository").finish_non_exhaustive()
    }
}

impl<I, E> InMemoryRepository<I, E>
where
    I: InputModel,
    E: Entity<I>,
{
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `entities`.
    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        let map = entities.into_iter().map(|e| (e.id(), e)).collect();
        Self {
            entities: Arc::new(RwLock::new(map)),
            input: PhantomData,
        }
    }

    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    fn not_found(id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            entity_type: E::ENTITY_TYPE,
            id: id.to_string(),
        }
    }
}

fn start_after(page: Option<&str>) -> Result<Option<String>> {
    let Some(token) = page else {
        return Ok(None);
    };
    match decode_page_token(token)?.get("id") {
        Some(Value::String(id)) => Ok(Some(id.clone())),
        _ => Err(RepositoryError::InvalidData(format!(
            "Invalid pagination_page: {token}"
        ))),
    }
}

#[async_trait]
impl<I, E> Repository for InMemoryRepository<I, E>
where
    I: InputModel,
    E: Entity<I>,
{
    type Input = I;
    type Entity = E;

    async fn list(&self, item_count: usize, page: Option<&str>) -> Result<PaginationResult<E>> {
        let lower = match start_after(page)? {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };

        let entities = self.entities.read().await;
        let mut scan = entities.range((lower, Bound::Unbounded));
        let models: Vec<E> = scan.by_ref().take(item_count).map(|(_, e)| e.clone()).collect();

        let last_evaluated_key = match (scan.next(), models.last()) {
            (Some(_), Some(last)) => Some(json!({ "id": last.id() })),
            _ => None,
        };

        Ok(PaginationResult::new(models, last_evaluated_key))
    }

    async fn get(&self, id: &str, _extra: &ExtraParams) -> Result<E> {
        let entities = self.entities.read().await;
        entities.get(id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn save(&self, input: &I) -> Result<E> {
        let entity = E::from_input(input);
        let id = entity.id();

        let mut entities = self.entities.write().await;
        if entities.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: E::ENTITY_TYPE,
                id,
            });
        }
        entities.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &str, input: &I, _extra: &ExtraParams) -> Result<E> {
        let mut entities = self.entities.write().await;
        let entity = entities.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        entity.apply_input(input);
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str, _extra: &ExtraParams) -> Result<()> {
        let mut entities = self.entities.write().await;
        if entities.remove(id).is_none() {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
