//! The closed set of actions a resource exposes and their routing table.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods used by resource routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRUD action on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Get,
    Create,
    Update,
    Patch,
    Delete,
}

impl Action {
    /// All actions, in routing table order.
    pub const ALL: [Action; 6] = [
        Action::List,
        Action::Get,
        Action::Create,
        Action::Update,
        Action::Patch,
        Action::Delete,
    ];

    /// The suffix appended to `/{version}/{resource}` for this action.
    pub fn path_suffix(&self) -> &'static str {
        match self {
            Action::List | Action::Create => "",
            Action::Get | Action::Update | Action::Patch | Action::Delete => "/{id}",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Action::List | Action::Get => HttpMethod::Get,
            Action::Create => HttpMethod::Post,
            Action::Update => HttpMethod::Put,
            Action::Patch => HttpMethod::Patch,
            Action::Delete => HttpMethod::Delete,
        }
    }

    /// Whether the request body is parsed into the input schema up front.
    pub fn parses_input(&self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "LIST",
            Action::Get => "GET",
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Patch => "PATCH",
            Action::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the full route path for an action, e.g. `/v1/widgets/{id}`.
pub fn route_path(version: &str, resource_name: &str, action: Action) -> String {
    format!("/{version}/{resource_name}{}", action.path_suffix())
}

/// The subset of actions enabled on a resource. Defaults to all six.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<Action>);

impl Default for ActionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl ActionSet {
    pub fn all() -> Self {
        Self(Action::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn only(actions: impl IntoIterator<Item = Action>) -> Self {
        Self(actions.into_iter().collect())
    }

    pub fn without(mut self, action: Action) -> Self {
        self.0.remove(&action);
        self
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self::only(iter)
    }
}
