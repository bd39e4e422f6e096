use crate::entities::menu_item_entity;
use crate::error::{AppError, AppResult};
use crate::utils::{decimal, validate_non_negative, validate_required};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    pub restaurant_id: i32,
    #[schema(example = "Margherita Pizza")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 12.99)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub price: Decimal,
    #[schema(example = "pizza")]
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

impl CreateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_required("Name", &self.name, 150)?;
        validate_non_negative("Price", self.price)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

impl UpdateMenuItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_required("Name", name, 150)?;
        }
        if let Some(price) = self.price {
            validate_non_negative("Price", price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemQuery {
    pub restaurant_id: Option<i32>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl MenuItemQuery {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(q) = &self.q
            && q.chars().count() > 100
        {
            return Err(AppError::ValidationError(
                "Search query must be at most 100 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<menu_item_entity::Model> for MenuItemResponse {
    fn from(m: menu_item_entity::Model) -> Self {
        Self {
            id: m.id,
            restaurant_id: m.restaurant_id,
            name: m.name,
            description: m.description,
            price: m.price,
            category: m.category,
            image_url: m.image_url,
            is_available: m.is_available,
            is_featured: m.is_featured,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
