use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or updating an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
        }
    }
}

/// Response for listing items
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    pub count: usize,
}

/// Blank or prefilled form for the create and update routes
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ItemFormResponse {
    /// URL the form is submitted to
    pub action: String,
    pub initial: ItemForm,
}

/// Confirmation payload shown before deleting an item
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ItemDeleteConfirmResponse {
    pub action: String,
    pub item: Item,
}

/// Response returned after deleting an item
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ItemDeleteResponse {
    pub success: bool,
    /// Where to go next, the item list
    pub redirect: String,
}
