use async_trait::async_trait;

use crate::model::{Entity, InputModel};

use super::{ExtraParams, PaginationResult, Result};

/// Storage backend for a single resource collection.
///
/// Handlers only ever talk to this trait, so swapping the storage technology
/// means providing another implementation.
#[async_trait]
pub trait Repository: Send + Sync {
    /// The validated input schema accepted on create and update.
    type Input: InputModel;

    /// The persisted record type.
    type Entity: Entity<Self::Input>;

    /// Returns at most `item_count` entities, starting after `page` when given.
    ///
    /// `page` is a token taken from the `meta` of a previous page.
    async fn list(
        &self,
        item_count: usize,
        page: Option<&str>,
    ) -> Result<PaginationResult<Self::Entity>>;

    /// Gets an entity by its ID. Fails with `NotFound` when absent.
    async fn get(&self, id: &str, extra: &ExtraParams) -> Result<Self::Entity>;

    /// Inserts a new entity built from `input` and returns what was stored.
    async fn save(&self, input: &Self::Input) -> Result<Self::Entity>;

    /// Replaces the mutable fields of an existing entity.
    ///
    /// Key fields are left untouched. Fails with `NotFound` when the entity is
    /// absent, including when it disappears between the read and the write.
    async fn update(
        &self,
        id: &str,
        input: &Self::Input,
        extra: &ExtraParams,
    ) -> Result<Self::Entity>;

    /// Removes an entity. Fails with `NotFound` when absent.
    async fn delete(&self, id: &str, extra: &ExtraParams) -> Result<()>;
}
