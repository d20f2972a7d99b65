//! Functional core for declarative CRUD resources.
//!
//! Everything here is transport independent: the action table, the response
//! envelope, authorization checks, the request pipeline stages, merge patch,
//! pagination, and the [`storage::Repository`] contract backends implement.

pub mod action;
pub mod authz;
pub mod merge;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod storage;

pub use action::{route_path, Action, ActionSet, HttpMethod};
pub use model::{Entity, InputModel, OutputModel, ValidationError};
pub use request::RequestContext;
pub use response::{Envelope, ErrorCode};
