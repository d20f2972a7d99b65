//! Declarative CRUD resources over pluggable storage backends.
//!
//! A [`ResourceConfig`] names a resource, its repository and its
//! authorization checks. Binding it through an [`Api`] registers the six
//! CRUD routes under `/{version}/{resource}`, each running the request
//! pipeline from `crudkit_core` before touching storage.

pub mod app;
pub mod authorizers;
pub mod config;
pub mod demo;
pub mod docs;
pub mod extractors;
pub mod handlers;
pub mod registry;
pub mod resource;
pub mod storage;
pub mod transport;

pub use app::create_app;
pub use config::Config;
pub use registry::{Api, RegistryError};
pub use resource::{ConfigError, Resource, ResourceConfig};
