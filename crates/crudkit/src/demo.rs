//! The `widgets` resource served by the binary.

use chrono::{DateTime, Utc};
use crudkit_core::authz::{AuthorizationResult, AuthorizerChain, CreateParams};
use crudkit_core::storage::Repository;
use crudkit_core::{Entity, InputModel, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorizers::{MaxPageSize, RequireHeader};
use crate::config::Config;
use crate::resource::ResourceConfig;
use crate::storage::InMemoryRepository;

/// Largest quantity a single create may ask for.
pub const MAX_CREATE_QUANTITY: u32 = 1000;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Fields a client may set on a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInput {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl InputModel for WidgetInput {
    fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::field("name", "must not be empty"));
        }
        if name.chars().count() > 100 {
            return Err(ValidationError::field("name", "must be at most 100 characters"));
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(ValidationError::field("color", "must look like #RRGGBB"));
            }
        }
        Ok(())
    }
}

/// A stored widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity<WidgetInput> for Widget {
    const ENTITY_TYPE: &'static str = "Widget";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn from_input(input: &WidgetInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            color: input.color.clone(),
            quantity: input.quantity,
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: &WidgetInput) {
        self.name = input.name.trim().to_string();
        self.color = input.color.clone();
        self.quantity = input.quantity;
        self.tags = input.tags.clone();
        self.updated_at = Utc::now();
    }
}

/// What clients see of a widget. `created_at` stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOut {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

pub type WidgetRepository = InMemoryRepository<WidgetInput, Widget>;

fn create_quantity(params: &CreateParams<WidgetInput>) -> AuthorizationResult {
    AuthorizationResult::allow_if(
        params.input.quantity <= MAX_CREATE_QUANTITY,
        "quantity exceeds the per-request limit",
    )
}

/// Per-action checks of the widgets resource: page size is capped, creates
/// are limited in quantity and deletes need `x-role: admin`.
pub fn widget_authorizers() -> AuthorizerChain<WidgetInput> {
    AuthorizerChain::new()
        .on_list(MaxPageSize(MAX_PAGE_SIZE))
        .on_create(create_quantity)
        .on_delete(RequireHeader::new("x-role", "admin"))
}

/// The widgets resource over any repository storing widgets.
pub fn widget_resource<R>(repository: R, config: &Config) -> ResourceConfig<R, WidgetOut>
where
    R: Repository<Input = WidgetInput, Entity = Widget> + 'static,
{
    ResourceConfig::new("widgets", repository)
        .version(config.api_version.clone())
        .pagination_item_count(config.pagination_item_count)
        .shared_authorizer(config.transport_authorizer())
        .extra_authorizers(widget_authorizers())
}
