use crate::entities::restaurant_entity;
use crate::error::AppResult;
use crate::models::RatingStats;
use crate::utils::{decimal, validate_non_negative, validate_required};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    #[schema(example = "Luigi's Trattoria")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "italian")]
    pub cuisine_type: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = "30-45 min")]
    pub delivery_time: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub delivery_fee: Decimal,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub minimum_order: Decimal,
    pub is_active: Option<bool>,
}

impl CreateRestaurantRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_required("Name", &self.name, 150)?;
        validate_required("Address", &self.address, 500)?;
        validate_non_negative("Delivery fee", self.delivery_fee)?;
        validate_non_negative("Minimum order", self.minimum_order)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub delivery_time: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub delivery_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    pub minimum_order: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl UpdateRestaurantRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_required("Name", name, 150)?;
        }
        if let Some(address) = &self.address {
            validate_required("Address", address, 500)?;
        }
        if let Some(fee) = self.delivery_fee {
            validate_non_negative("Delivery fee", fee)?;
        }
        if let Some(min) = self.minimum_order {
            validate_non_negative("Minimum order", min)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantQuery {
    pub q: Option<String>,
    pub cuisine_type: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub delivery_time: Option<String>,
    pub delivery_fee: Decimal,
    pub minimum_order: Decimal,
    pub is_active: bool,
    pub average_rating: Decimal,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantResponse {
    pub fn with_rating(m: restaurant_entity::Model, average_rating: Decimal, review_count: i64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            cuisine_type: m.cuisine_type,
            address: m.address,
            phone: m.phone,
            image_url: m.image_url,
            delivery_time: m.delivery_time,
            delivery_fee: m.delivery_fee,
            minimum_order: m.minimum_order,
            is_active: m.is_active,
            average_rating,
            review_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<restaurant_entity::Model> for RestaurantResponse {
    fn from(m: restaurant_entity::Model) -> Self {
        Self::with_rating(m, Decimal::ZERO, 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub rating_stats: RatingStats,
}

/// 订单详情中展示的餐厅
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

impl From<restaurant_entity::Model> for RestaurantSummary {
    fn from(m: restaurant_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            phone: m.phone,
            image_url: m.image_url,
        }
    }
}
