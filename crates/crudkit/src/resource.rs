//! Resource configuration and the binder turning it into routes.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, on, MethodFilter, MethodRouter},
    Json, Router,
};
use crudkit_core::authz::AuthorizerChain;
use crudkit_core::pagination::DEFAULT_PAGINATION_ITEM_COUNT;
use crudkit_core::pipeline::Gate;
use crudkit_core::storage::Repository;
use crudkit_core::{route_path, Action, ActionSet, Envelope, HttpMethod, OutputModel};
use thiserror::Error;

use crate::docs;
use crate::handlers::resource as handlers;
use crate::handlers::Reply;
use crate::transport::{transport_gate, AllowAll, TransportAuthorizer};

/// Default API version segment.
pub const DEFAULT_VERSION: &str = "v1";

/// Errors detected when binding a resource configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pagination_item_count must be at least 1, got {0}")]
    InvalidPaginationItemCount(usize),
    #[error("resource name must be a single non-empty path segment, got {0:?}")]
    InvalidResourceName(String),
    #[error("version must be a single non-empty path segment, got {0:?}")]
    InvalidVersion(String),
}

/// Declarative description of a resource.
///
/// `R` is the storage backend and `O` the output schema entities are shaped
/// through before they are returned.
pub struct ResourceConfig<R: Repository, O> {
    resource_name: String,
    version: String,
    repository: Arc<R>,
    pagination_item_count: usize,
    enabled_actions: ActionSet,
    authorizer: Arc<dyn TransportAuthorizer>,
    extra_authorizers: AuthorizerChain<R::Input>,
    api_docs: bool,
    output: PhantomData<fn() -> O>,
}

impl<R: Repository, O> fmt::Debug for ResourceConfig<R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("resource_name", &self.resource_name)
            .field("version", &self.version)
            .field("pagination_item_count", &self.pagination_item_count)
            .field("enabled_actions", &self.enabled_actions)
            .field("extra_authorizers", &self.extra_authorizers)
            .field("api_docs", &self.api_docs)
            .finish_non_exhaustive()
    }
}

impl<R, O> ResourceConfig<R, O>
where
    R: Repository + 'static,
    O: OutputModel,
{
    /// A resource with every action enabled, version `v1`, a page size of 10,
    /// no authorization checks and the docs route on.
    pub fn new(resource_name: impl Into<String>, repository: R) -> Self {
        Self {
            resource_name: resource_name.into(),
            version: DEFAULT_VERSION.to_string(),
            repository: Arc::new(repository),
            pagination_item_count: DEFAULT_PAGINATION_ITEM_COUNT,
            enabled_actions: ActionSet::all(),
            authorizer: Arc::new(AllowAll),
            extra_authorizers: AuthorizerChain::new(),
            api_docs: true,
            output: PhantomData,
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn pagination_item_count(mut self, count: usize) -> Self {
        self.pagination_item_count = count;
        self
    }

    pub fn enabled_actions(mut self, actions: ActionSet) -> Self {
        self.enabled_actions = actions;
        self
    }

    pub fn authorizer(mut self, authorizer: impl TransportAuthorizer) -> Self {
        self.authorizer = Arc::new(authorizer);
        self
    }

    pub fn shared_authorizer(mut self, authorizer: Arc<dyn TransportAuthorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn extra_authorizers(mut self, chain: AuthorizerChain<R::Input>) -> Self {
        self.extra_authorizers = chain;
        self
    }

    pub fn api_docs(mut self, enabled: bool) -> Self {
        self.api_docs = enabled;
        self
    }

    /// Validates the configuration and produces a bindable resource.
    pub fn build(self) -> Result<Resource<R, O>, ConfigError> {
        if !is_path_segment(&self.resource_name) {
            return Err(ConfigError::InvalidResourceName(self.resource_name));
        }
        if !is_path_segment(&self.version) {
            return Err(ConfigError::InvalidVersion(self.version));
        }
        if self.pagination_item_count < 1 {
            return Err(ConfigError::InvalidPaginationItemCount(
                self.pagination_item_count,
            ));
        }
        Ok(Resource { config: self })
    }
}

fn is_path_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '{', '}']) && !value.chars().any(char::is_whitespace)
}

/// A validated resource, shared by its handlers as router state.
pub struct Resource<R: Repository, O> {
    config: ResourceConfig<R, O>,
}

impl<R: Repository, O> fmt::Debug for Resource<R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("config", &self.config)
            .finish()
    }
}

impl<R, O> Resource<R, O>
where
    R: Repository + 'static,
    O: OutputModel,
{
    pub fn name(&self) -> &str {
        &self.config.resource_name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// The route prefix, `/{version}/{resource}`.
    pub fn prefix(&self) -> String {
        format!("/{}/{}", self.config.version, self.config.resource_name)
    }

    pub fn repository(&self) -> &R {
        &self.config.repository
    }

    pub fn pagination_item_count(&self) -> usize {
        self.config.pagination_item_count
    }

    pub fn enabled_actions(&self) -> &ActionSet {
        &self.config.enabled_actions
    }

    pub fn gate(&self) -> Gate<'_, R::Input> {
        Gate::new(&self.config.enabled_actions, &self.config.extra_authorizers)
    }

    /// Registers one route per action, plus the docs route when enabled.
    ///
    /// Enabled actions sit behind the transport authorizer. Disabled actions
    /// keep an unguarded route so that calling them always yields the
    /// method-not-allowed envelope from the pipeline. With docs on, the id
    /// `swagger.json` is reserved and only answers GET.
    pub fn into_router(self) -> Router {
        let prefix = self.prefix();
        let docs = self.config.api_docs.then(|| {
            docs::describe(
                &self.config.resource_name,
                &self.config.version,
                &self.config.enabled_actions,
            )
        });
        let authorizer = self.config.authorizer.clone();

        let mut routes: BTreeMap<String, MethodRouter<Arc<Self>>> = BTreeMap::new();
        for action in Action::ALL {
            let path = route_path(&self.config.version, &self.config.resource_name, action);
            let mut route = action_route::<R, O>(action);
            if self.config.enabled_actions.contains(action) {
                route = route.route_layer(middleware::from_fn_with_state(
                    authorizer.clone(),
                    transport_gate,
                ));
            }
            let method_router = match routes.remove(&path) {
                Some(existing) => existing.merge(route),
                None => route,
            };
            routes.insert(path, method_router);
        }

        tracing::debug!(
            prefix = %prefix,
            enabled = ?self.config.enabled_actions,
            "Binding resource routes"
        );

        let router = routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            })
            .with_state(Arc::new(self));

        match docs {
            Some(doc) => router.route(
                &format!("{prefix}/swagger.json"),
                get(move || {
                    let doc = doc.clone();
                    async move { Json(doc) }
                })
                .fallback(docs_method_not_allowed),
            ),
            None => router,
        }
    }
}

async fn docs_method_not_allowed() -> Reply {
    Reply(Envelope::method_not_allowed(
        "swagger.json is reserved for the route description; only GET is allowed.",
    ))
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

fn action_route<R, O>(action: Action) -> MethodRouter<Arc<Resource<R, O>>>
where
    R: Repository + 'static,
    O: OutputModel,
{
    let filter = method_filter(action.method());
    match action {
        Action::List => on(filter, handlers::list::<R, O>),
        Action::Get => on(filter, handlers::fetch::<R, O>),
        Action::Create => on(filter, handlers::create::<R, O>),
        Action::Update => on(filter, handlers::update::<R, O>),
        Action::Patch => on(filter, handlers::patch::<R, O>),
        Action::Delete => on(filter, handlers::delete::<R, O>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{WidgetOut, WidgetRepository};

    fn config() -> ResourceConfig<WidgetRepository, WidgetOut> {
        ResourceConfig::new("widgets", WidgetRepository::new())
    }

    #[test]
    fn test_defaults() {
        let resource = config().build().unwrap();

        assert_eq!(resource.prefix(), "/v1/widgets");
        assert_eq!(resource.pagination_item_count(), 10);
        assert_eq!(resource.enabled_actions(), &ActionSet::all());
    }

    #[test]
    fn test_custom_version() {
        let resource = config().version("v2").build().unwrap();
        assert_eq!(resource.prefix(), "/v2/widgets");
        assert_eq!(resource.version(), "v2");
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = config().pagination_item_count(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidPaginationItemCount(0));
    }

    #[test]
    fn test_invalid_segments_are_rejected() {
        assert_eq!(
            ResourceConfig::<_, WidgetOut>::new("", WidgetRepository::new())
                .build()
                .unwrap_err(),
            ConfigError::InvalidResourceName(String::new())
        );
        assert!(matches!(
            ResourceConfig::<_, WidgetOut>::new("a/b", WidgetRepository::new()).build(),
            Err(ConfigError::InvalidResourceName(_))
        ));
        assert!(matches!(
            config().version("v 1").build(),
            Err(ConfigError::InvalidVersion(_))
        ));
    }
}
