//! The request gate, as explicit ordered stages.
//!
//! Each stage either continues with an enriched value (`Ok`) or stops the
//! request with a ready envelope (`Err`). [`Gate`] runs the stages for each
//! action in the fixed order:
//!
//! 1. method-enabled check (405)
//! 2. input parsing, only for create and update; pagination parsing for list (400)
//! 3. authorization chain (401)
//!
//! after which the caller dispatches to the repository.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::action::{Action, ActionSet};
use crate::authz::{
    ActionParams, AuthorizerChain, CreateParams, DeleteParams, GetParams, ListParams,
    PatchParams, UpdateParams,
};
use crate::merge::merged;
use crate::model::{input_from_value, parse_input, InputModel};
use crate::pagination::PageRequest;
use crate::request::RequestContext;
use crate::response::Envelope;

/// Result of a pipeline stage.
pub type Stage<T> = Result<T, Envelope>;

/// Rejects actions that are not enabled on the resource.
pub fn check_enabled(enabled: &ActionSet, action: Action) -> Stage<()> {
    if enabled.contains(action) {
        Ok(())
    } else {
        Err(Envelope::method_not_allowed(format!(
            "{action} is not allowed on this resource."
        )))
    }
}

/// Parses a request body into the input schema.
pub fn parse_body<I: InputModel>(body: &[u8]) -> Stage<I> {
    parse_input(body).map_err(|e| Envelope::bad_request(e.to_string()))
}

/// Reads the pagination parameters of a list call.
pub fn page_request(
    query: &BTreeMap<String, String>,
    default_item_count: usize,
) -> Stage<PageRequest> {
    PageRequest::from_query(query, default_item_count)
        .map_err(|e| Envelope::bad_request(e.to_string()))
}

/// Runs the authorization chain for `params`' action.
pub fn authorize<I, P: ActionParams<I>>(chain: &AuthorizerChain<I>, params: P) -> Stage<P> {
    let result = chain.run(&params);
    if result.success {
        Ok(params)
    } else {
        Err(Envelope::unauthorized(result.message))
    }
}

/// Applies a merge-patch body to the current entity mapping and re-validates
/// the result against the input schema.
pub fn merge_input<I: InputModel>(current: Map<String, Value>, body: &[u8]) -> Stage<I> {
    let patch: Value = serde_json::from_slice(body)
        .map_err(|e| Envelope::bad_request(format!("Invalid merge patch document: {e}")))?;
    input_from_value(merged(Value::Object(current), &patch))
        .map_err(|e| Envelope::bad_request(e.to_string()))
}

/// Per-resource view of the pipeline: enabled actions plus authorization checks.
pub struct Gate<'a, I> {
    enabled: &'a ActionSet,
    authorizers: &'a AuthorizerChain<I>,
}

impl<'a, I: InputModel> Gate<'a, I> {
    pub fn new(enabled: &'a ActionSet, authorizers: &'a AuthorizerChain<I>) -> Self {
        Self {
            enabled,
            authorizers,
        }
    }

    pub fn admit_list(
        &self,
        request: RequestContext,
        default_item_count: usize,
    ) -> Stage<ListParams> {
        check_enabled(self.enabled, Action::List)?;
        let page = page_request(&request.query, default_item_count)?;
        authorize(
            self.authorizers,
            ListParams {
                request,
                item_count: page.item_count,
                page: page.page,
            },
        )
    }

    pub fn admit_get(&self, request: RequestContext, id: String) -> Stage<GetParams> {
        check_enabled(self.enabled, Action::Get)?;
        authorize(self.authorizers, GetParams { request, id })
    }

    pub fn admit_create(&self, request: RequestContext, body: &[u8]) -> Stage<CreateParams<I>> {
        check_enabled(self.enabled, Action::Create)?;
        let input = parse_body(body)?;
        authorize(self.authorizers, CreateParams { request, input })
    }

    pub fn admit_update(
        &self,
        request: RequestContext,
        id: String,
        body: &[u8],
    ) -> Stage<UpdateParams<I>> {
        check_enabled(self.enabled, Action::Update)?;
        let input = parse_body(body)?;
        authorize(self.authorizers, UpdateParams { request, id, input })
    }

    pub fn admit_patch(&self, request: RequestContext, id: String) -> Stage<PatchParams> {
        check_enabled(self.enabled, Action::Patch)?;
        authorize(self.authorizers, PatchParams { request, id })
    }

    pub fn admit_delete(&self, request: RequestContext, id: String) -> Stage<DeleteParams> {
        check_enabled(self.enabled, Action::Delete)?;
        authorize(self.authorizers, DeleteParams { request, id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::authz::AuthorizationResult;
    use crate::model::ValidationError;
    use crate::response::ErrorCode;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct WidgetInput {
        name: String,
        #[serde(default)]
        quantity: u32,
    }

    impl InputModel for WidgetInput {
        fn validate(&self) -> Result<(), ValidationError> {
            if self.name.is_empty() {
                return Err(ValidationError::field("name", "must not be empty"));
            }
            Ok(())
        }
    }

    fn request(method: &str) -> RequestContext {
        RequestContext::new(method, "/v1/widgets")
    }

    fn deny_all() -> AuthorizerChain<WidgetInput> {
        AuthorizerChain::new()
            .on_list(|_: &ListParams| AuthorizationResult::deny("no list"))
            .on_get(|_: &GetParams| AuthorizationResult::deny("no get"))
            .on_create(|_: &CreateParams<WidgetInput>| AuthorizationResult::deny("no create"))
            .on_update(|_: &UpdateParams<WidgetInput>| AuthorizationResult::deny("no update"))
            .on_patch(|_: &PatchParams| AuthorizationResult::deny("no patch"))
            .on_delete(|_: &DeleteParams| AuthorizationResult::deny("no delete"))
    }

    #[test]
    fn test_disabled_action_wins_over_body_and_authorization() {
        let enabled = ActionSet::none();
        let chain = deny_all();
        let gate = Gate::new(&enabled, &chain);

        let rejections = [
            gate.admit_list(request("GET"), 10).unwrap_err(),
            gate.admit_get(request("GET"), "1".into()).unwrap_err(),
            gate.admit_create(request("POST"), b"garbage").unwrap_err(),
            gate.admit_update(request("PUT"), "1".into(), b"garbage").unwrap_err(),
            gate.admit_patch(request("PATCH"), "1".into()).unwrap_err(),
            gate.admit_delete(request("DELETE"), "1".into()).unwrap_err(),
        ];

        for envelope in rejections {
            assert_eq!(envelope.status_code, 405);
            assert_eq!(envelope.error_code, Some(ErrorCode::MethodNotAllowed));
        }
    }

    #[test]
    fn test_method_not_allowed_message_names_action() {
        let envelope = check_enabled(&ActionSet::none(), Action::Delete).unwrap_err();
        assert_eq!(
            envelope.message.as_deref(),
            Some("DELETE is not allowed on this resource.")
        );
    }

    #[test]
    fn test_invalid_body_is_rejected_before_authorization() {
        let enabled = ActionSet::all();
        let consulted = Arc::new(AtomicBool::new(false));
        let flag = consulted.clone();
        let chain = AuthorizerChain::new().on_create(move |_: &CreateParams<WidgetInput>| {
            flag.store(true, Ordering::SeqCst);
            AuthorizationResult::allow()
        });
        let gate = Gate::new(&enabled, &chain);

        let envelope = gate
            .admit_create(request("POST"), br#"{"quantity": 3}"#)
            .unwrap_err();

        assert_eq!(envelope.status_code, 400);
        assert!(envelope.message.unwrap().contains("name"));
        assert!(!consulted.load(Ordering::SeqCst));
    }

    #[test]
    fn test_failed_validate_is_bad_request() {
        let enabled = ActionSet::all();
        let chain: AuthorizerChain<WidgetInput> = AuthorizerChain::new();
        let gate = Gate::new(&enabled, &chain);

        let envelope = gate
            .admit_update(request("PUT"), "1".into(), br#"{"name": ""}"#)
            .unwrap_err();

        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.message.as_deref(), Some("name: must not be empty"));
    }

    #[test]
    fn test_authorization_failure_carries_message() {
        let enabled = ActionSet::all();
        let chain = deny_all();
        let gate = Gate::new(&enabled, &chain);

        let envelope = gate
            .admit_create(request("POST"), br#"{"name": "gizmo"}"#)
            .unwrap_err();

        assert_eq!(envelope.status_code, 401);
        assert_eq!(envelope.message.as_deref(), Some("no create"));

        let envelope = gate.admit_patch(request("PATCH"), "1".into()).unwrap_err();
        assert_eq!(envelope.message.as_deref(), Some("no patch"));
    }

    #[test]
    fn test_update_checks_see_id_and_parsed_input() {
        let enabled = ActionSet::all();
        let chain = AuthorizerChain::new().on_update(|p: &UpdateParams<WidgetInput>| {
            AuthorizationResult::allow_if(p.id == "7" && p.input.quantity == 2, "mismatch")
        });
        let gate = Gate::new(&enabled, &chain);

        let params = gate
            .admit_update(request("PUT"), "7".into(), br#"{"name": "gizmo", "quantity": 2}"#)
            .unwrap();

        assert_eq!(params.input.name, "gizmo");
    }

    #[test]
    fn test_list_checks_see_pagination_inputs() {
        let enabled = ActionSet::all();
        let chain = AuthorizerChain::<WidgetInput>::new().on_list(|p: &ListParams| {
            AuthorizationResult::allow_if(p.item_count <= 50, "page too large")
        });
        let gate = Gate::new(&enabled, &chain);

        let big = request("GET").with_query("pagination_item_count", "500");
        assert_eq!(
            gate.admit_list(big, 10).unwrap_err().message.as_deref(),
            Some("page too large")
        );

        let params = gate.admit_list(request("GET"), 10).unwrap();
        assert_eq!(params.item_count, 10);
        assert!(params.page.is_none());
    }

    #[test]
    fn test_list_rejects_small_item_count() {
        let enabled = ActionSet::all();
        let chain: AuthorizerChain<WidgetInput> = AuthorizerChain::new();
        let gate = Gate::new(&enabled, &chain);

        let envelope = gate
            .admit_list(request("GET").with_query("pagination_item_count", "0"), 10)
            .unwrap_err();

        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.message.as_deref(),
            Some("pagination_item_count cannot be less than 1")
        );
    }

    #[test]
    fn test_merge_input_applies_patch_and_revalidates() {
        let current = json!({"id": "w-1", "name": "gizmo", "quantity": 2});
        let Value::Object(current) = current else {
            unreachable!()
        };

        let input: WidgetInput =
            merge_input(current.clone(), br#"{"quantity": 9}"#).unwrap();
        assert_eq!(
            input,
            WidgetInput {
                name: "gizmo".to_string(),
                quantity: 9
            }
        );

        let envelope = merge_input::<WidgetInput>(current.clone(), br#"{"name": null}"#)
            .unwrap_err();
        assert_eq!(envelope.status_code, 400);

        let envelope = merge_input::<WidgetInput>(current, b"{oops").unwrap_err();
        assert_eq!(envelope.status_code, 400);
    }
}
