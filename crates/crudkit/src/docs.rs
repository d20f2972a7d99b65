//! Minimal Swagger document describing a resource's enabled routes.

use crudkit_core::{route_path, Action, ActionSet};
use serde_json::{json, Map, Value};

fn summary(action: Action, name: &str) -> String {
    match action {
        Action::List => format!("List {name}"),
        Action::Get => format!("Get one of {name} by id"),
        Action::Create => format!("Create one of {name}"),
        Action::Update => format!("Replace one of {name}"),
        Action::Patch => format!("Merge-patch one of {name}"),
        Action::Delete => format!("Delete one of {name}"),
    }
}

fn responses(action: Action) -> Value {
    let mut responses = Map::new();
    let ok = if action == Action::Create { "201" } else { "200" };
    responses.insert(ok.into(), json!({ "description": "Success envelope" }));
    if action.parses_input() || action == Action::Patch || action == Action::List {
        responses.insert("400".into(), json!({ "description": "Invalid request" }));
    }
    responses.insert("401".into(), json!({ "description": "Not authorised" }));
    if action.path_suffix().contains("{id}") {
        responses.insert("404".into(), json!({ "description": "Entity not found" }));
    }
    Value::Object(responses)
}

/// Describes the enabled actions of a resource. Disabled actions are left out.
pub fn describe(name: &str, version: &str, enabled: &ActionSet) -> Value {
    let mut paths = Map::new();
    for action in enabled.iter() {
        let path = route_path(version, name, action);
        let method = action.method().as_str().to_ascii_lowercase();

        let mut operation = json!({
            "operationId": format!("{}_{name}", action.name().to_ascii_lowercase()),
            "summary": summary(action, name),
            "produces": ["application/json"],
            "responses": responses(action),
        });
        if action.path_suffix().contains("{id}") {
            operation["parameters"] = json!([
                { "name": "id", "in": "path", "required": true, "type": "string" }
            ]);
        }

        let entry = paths
            .entry(path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(method, operation);
        }
    }

    json!({
        "swagger": "2.0",
        "info": { "title": name, "version": version },
        "basePath": "/",
        "paths": paths,
    })
}
