//! Collects bound resources into one router.

use std::collections::BTreeSet;

use axum::Router;
use crudkit_core::storage::Repository;
use crudkit_core::OutputModel;
use thiserror::Error;

use crate::resource::{ConfigError, Resource, ResourceConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a resource is already bound at {0}")]
    DuplicatePrefix(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The set of resources served by one application.
#[derive(Default)]
pub struct Api {
    prefixes: BTreeSet<String>,
    router: Router,
}

impl Api {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an already validated resource. Two resources may not share a
    /// `/{version}/{resource}` prefix.
    pub fn register<R, O>(mut self, resource: Resource<R, O>) -> Result<Self, RegistryError>
    where
        R: Repository + 'static,
        O: OutputModel,
    {
        let prefix = resource.prefix();
        if !self.prefixes.insert(prefix.clone()) {
            return Err(RegistryError::DuplicatePrefix(prefix));
        }

        tracing::info!(prefix = %prefix, "Registered resource");

        self.router = self.router.merge(resource.into_router());
        Ok(self)
    }

    /// Validates and binds a resource configuration.
    pub fn resource<R, O>(self, config: ResourceConfig<R, O>) -> Result<Self, RegistryError>
    where
        R: Repository + 'static,
        O: OutputModel,
    {
        self.register(config.build()?)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{WidgetOut, WidgetRepository};

    fn widgets(version: &str) -> ResourceConfig<WidgetRepository, WidgetOut> {
        ResourceConfig::new("widgets", WidgetRepository::new()).version(version)
    }

    #[test]
    fn test_registers_distinct_prefixes() {
        let api = Api::new()
            .resource(widgets("v1"))
            .unwrap()
            .resource(widgets("v2"))
            .unwrap();

        assert_eq!(
            api.prefixes().collect::<Vec<_>>(),
            vec!["/v1/widgets", "/v2/widgets"]
        );
    }

    #[test]
    fn test_duplicate_prefix_is_rejected() {
        let result = Api::new()
            .resource(widgets("v1"))
            .unwrap()
            .resource(widgets("v1"));

        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicatePrefix("/v1/widgets".to_string()))
        );
    }

    #[test]
    fn test_invalid_config_surfaces() {
        let result = Api::new().resource(widgets("v1").pagination_item_count(0));

        assert!(matches!(
            result,
            Err(RegistryError::Config(ConfigError::InvalidPaginationItemCount(0)))
        ));
    }
}
