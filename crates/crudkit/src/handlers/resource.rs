//! The six CRUD handlers bound to every resource.
//!
//! Each handler first admits the request through the resource's pipeline
//! gate, then performs exactly one repository step per stage and shapes the
//! result through the output schema.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
};
use crudkit_core::model::{shape_output, to_map};
use crudkit_core::pipeline;
use crudkit_core::response::data_with;
use crudkit_core::storage::{ExtraParams, Repository};
use crudkit_core::{Entity, Envelope, OutputModel};

use super::{AppError, Reply};
use crate::extractors::Inbound;
use crate::resource::Resource;

type ResourceState<R, O> = State<Arc<Resource<R, O>>>;

/// List entities (GET /{version}/{resource}).
pub async fn list<R, O>(
    State(resource): ResourceState<R, O>,
    Inbound(request): Inbound,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource
        .gate()
        .admit_list(request, resource.pagination_item_count())?;

    let page = resource
        .repository()
        .list(params.item_count, params.page.as_deref())
        .await?;
    let page = page.try_map(|entity| shape_output::<O, _>(&entity))?;

    tracing::debug!(
        resource = %resource.name(),
        count = page.models.len(),
        has_more = page.next_page_token().is_some(),
        "Listed entities"
    );

    Ok(Envelope::success(to_map(&page)?).into())
}

/// Get a single entity (GET /{version}/{resource}/{id}).
pub async fn fetch<R, O>(
    State(resource): ResourceState<R, O>,
    Path(id): Path<String>,
    Inbound(request): Inbound,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource.gate().admit_get(request, id)?;
    let extra = ExtraParams::from_query(&params.request.query);

    let entity = resource
        .repository()
        .get(&params.id, &extra)
        .await
        .map_err(|e| AppError::from_lookup(e, &params.id))?;

    Ok(Envelope::success(shape_output::<O, _>(&entity)?).into())
}

/// Create an entity (POST /{version}/{resource}).
pub async fn create<R, O>(
    State(resource): ResourceState<R, O>,
    Inbound(request): Inbound,
    body: Bytes,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource.gate().admit_create(request, &body)?;

    let entity = resource.repository().save(&params.input).await?;

    tracing::info!(resource = %resource.name(), id = %entity.id(), "Created entity");

    Ok(Envelope::created(shape_output::<O, _>(&entity)?).into())
}

/// Replace an entity's mutable fields (PUT /{version}/{resource}/{id}).
pub async fn update<R, O>(
    State(resource): ResourceState<R, O>,
    Path(id): Path<String>,
    Inbound(request): Inbound,
    body: Bytes,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource.gate().admit_update(request, id, &body)?;
    let extra = ExtraParams::from_query(&params.request.query);

    let entity = resource
        .repository()
        .update(&params.id, &params.input, &extra)
        .await
        .map_err(|e| AppError::from_lookup(e, &params.id))?;

    tracing::info!(resource = %resource.name(), id = %params.id, "Updated entity");

    Ok(Envelope::success(shape_output::<O, _>(&entity)?).into())
}

/// Merge-patch an entity (PATCH /{version}/{resource}/{id}).
pub async fn patch<R, O>(
    State(resource): ResourceState<R, O>,
    Path(id): Path<String>,
    Inbound(request): Inbound,
    body: Bytes,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource.gate().admit_patch(request, id)?;
    let extra = ExtraParams::from_query(&params.request.query);
    let repository = resource.repository();

    let current = repository
        .get(&params.id, &extra)
        .await
        .map_err(|e| AppError::from_lookup(e, &params.id))?;

    let input = pipeline::merge_input::<R::Input>(to_map(&current)?, &body)?;

    let entity = repository
        .update(&params.id, &input, &extra)
        .await
        .map_err(|e| AppError::from_lookup(e, &params.id))?;

    tracing::info!(resource = %resource.name(), id = %params.id, "Patched entity");

    Ok(Envelope::success(shape_output::<O, _>(&entity)?).into())
}

/// Delete an entity (DELETE /{version}/{resource}/{id}).
pub async fn delete<R, O>(
    State(resource): ResourceState<R, O>,
    Path(id): Path<String>,
    Inbound(request): Inbound,
) -> Result<Reply, AppError>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let params = resource.gate().admit_delete(request, id)?;
    let extra = ExtraParams::from_query(&params.request.query);

    resource
        .repository()
        .delete(&params.id, &extra)
        .await
        .map_err(|e| AppError::from_lookup(e, &params.id))?;

    tracing::info!(resource = %resource.name(), id = %params.id, "Deleted entity");

    Ok(Envelope::success(data_with("id", params.id)).into())
}
