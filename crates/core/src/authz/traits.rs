use std::sync::Arc;

use super::{
    AuthorizationResult, AuthorizerChain, CreateParams, DeleteParams, GetParams, ListParams,
    PatchParams, UpdateParams,
};

/// An authorization check over the parameters of one action.
///
/// A check declares which actions it supports by which `P` it is implemented
/// for. Closures `Fn(&P) -> AuthorizationResult` are checks too.
pub trait Authorize<P>: Send + Sync {
    fn check(&self, params: &P) -> AuthorizationResult;
}

impl<P, F> Authorize<P> for F
where
    F: Fn(&P) -> AuthorizationResult + Send + Sync,
{
    fn check(&self, params: &P) -> AuthorizationResult {
        self(params)
    }
}

/// A per-action parameter set, linking it to its slot in an [`AuthorizerChain`].
pub trait ActionParams<I>: Sized {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>];
}

impl<I> ActionParams<I> for ListParams {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.list
    }
}

impl<I> ActionParams<I> for GetParams {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.get
    }
}

impl<I> ActionParams<I> for CreateParams<I> {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.create
    }
}

impl<I> ActionParams<I> for UpdateParams<I> {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.update
    }
}

impl<I> ActionParams<I> for PatchParams {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.patch
    }
}

impl<I> ActionParams<I> for DeleteParams {
    fn checks(chain: &AuthorizerChain<I>) -> &[Arc<dyn Authorize<Self>>] {
        &chain.delete
    }
}
