use crate::entities::{FavoriteType, favorite_entity};
use crate::models::{MenuItemResponse, RestaurantResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub favorite_type: FavoriteType,
    pub favorite_id: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteListQuery {
    #[serde(rename = "type")]
    pub favorite_type: Option<FavoriteType>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheckQuery {
    #[serde(rename = "type")]
    pub favorite_type: FavoriteType,
    pub favorite_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: i32,
    pub favorite_type: FavoriteType,
    pub favorite_id: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_item: Option<MenuItemResponse>,
}

impl From<favorite_entity::Model> for FavoriteResponse {
    fn from(m: favorite_entity::Model) -> Self {
        Self {
            id: m.id,
            favorite_type: m.favorite_type,
            favorite_id: m.favorite_id,
            created_at: m.created_at,
            restaurant: None,
            menu_item: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct FavoriteStatusResponse {
    pub is_favorite: bool,
}
