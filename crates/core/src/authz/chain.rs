use std::fmt;
use std::sync::Arc;

use super::{
    ActionParams, AuthorizationResult, Authorize, CreateParams, DeleteParams, GetParams,
    ListParams, PatchParams, UpdateParams,
};

/// Ordered authorization checks, one list per action.
///
/// Checks run in registration order and stop at the first failure. An action
/// without checks is allowed.
pub struct AuthorizerChain<I> {
    pub(super) list: Vec<Arc<dyn Authorize<ListParams>>>,
    pub(super) get: Vec<Arc<dyn Authorize<GetParams>>>,
    pub(super) create: Vec<Arc<dyn Authorize<CreateParams<I>>>>,
    pub(super) update: Vec<Arc<dyn Authorize<UpdateParams<I>>>>,
    pub(super) patch: Vec<Arc<dyn Authorize<PatchParams>>>,
    pub(super) delete: Vec<Arc<dyn Authorize<DeleteParams>>>,
}

impl<I> Default for AuthorizerChain<I> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            get: Vec::new(),
            create: Vec::new(),
            update: Vec::new(),
            patch: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<I> Clone for AuthorizerChain<I> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            get: self.get.clone(),
            create: self.create.clone(),
            update: self.update.clone(),
            patch: self.patch.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<I> fmt::Debug for AuthorizerChain<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizerChain")
            .field("list", &self.list.len())
            .field("get", &self.get.len())
            .field("create", &self.create.len())
            .field("update", &self.update.len())
            .field("patch", &self.patch.len())
            .field("delete", &self.delete.len())
            .finish()
    }
}

impl<I> AuthorizerChain<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list(mut self, check: impl Authorize<ListParams> + 'static) -> Self {
        self.list.push(Arc::new(check));
        self
    }

    pub fn on_get(mut self, check: impl Authorize<GetParams> + 'static) -> Self {
        self.get.push(Arc::new(check));
        self
    }

    pub fn on_create(mut self, check: impl Authorize<CreateParams<I>> + 'static) -> Self {
        self.create.push(Arc::new(check));
        self
    }

    pub fn on_update(mut self, check: impl Authorize<UpdateParams<I>> + 'static) -> Self {
        self.update.push(Arc::new(check));
        self
    }

    pub fn on_patch(mut self, check: impl Authorize<PatchParams> + 'static) -> Self {
        self.patch.push(Arc::new(check));
        self
    }

    pub fn on_delete(mut self, check: impl Authorize<DeleteParams> + 'static) -> Self {
        self.delete.push(Arc::new(check));
        self
    }

    /// Runs the checks registered for `P`'s action.
    ///
    /// Returns the first failing result, or an allowing one.
    pub fn run<P: ActionParams<I>>(&self, params: &P) -> AuthorizationResult {
        P::checks(self)
            .iter()
            .map(|check| check.check(params))
            .find(|result| !result.success)
            .unwrap_or_else(AuthorizationResult::allow)
    }

    /// Number of checks registered for `P`'s action.
    pub fn len_for<P: ActionParams<I>>(&self) -> usize {
        P::checks(self).len()
    }
}
