//! Per-action authorization checks.
//!
//! Every action has its own parameter type ([`ListParams`], [`GetParams`],
//! [`CreateParams`], [`UpdateParams`], [`PatchParams`], [`DeleteParams`]), so a
//! check's signature states exactly which actions it can guard.

mod chain;
mod traits;
mod types;

pub use chain::AuthorizerChain;
pub use traits::{ActionParams, Authorize};
pub use types::{
    AuthorizationResult, CreateParams, DeleteParams, GetParams, ListParams, PatchParams,
    UpdateParams,
};
