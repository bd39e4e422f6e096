use crate::entities::review_entity;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_COMMENT_LEN: usize = 1000;

fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::ValidationError(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_comment(comment: &Option<String>) -> AppResult<()> {
    if let Some(comment) = comment
        && comment.chars().count() > MAX_COMMENT_LEN
    {
        return Err(AppError::ValidationError(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub restaurant_id: i32,
    pub order_id: Option<i32>,
    #[schema(example = 5)]
    pub rating: i32,
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_rating(self.rating)?;
        validate_comment(&self.comment)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl UpdateReviewRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.rating.is_none() && self.comment.is_none() {
            return Err(AppError::ValidationError(
                "No fields to update".to_string(),
            ));
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        validate_comment(&self.comment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub restaurant_id: i32,
    pub order_id: Option<i32>,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<review_entity::Model> for ReviewResponse {
    fn from(m: review_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            restaurant_id: m.restaurant_id,
            order_id: m.order_id,
            rating: m.rating,
            comment: m.comment,
            user_name: None,
            restaurant_name: None,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 餐厅评分统计, 读取时实时聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingStats {
    pub average_rating: Decimal,
    pub review_count: i64,
    pub five_star: i64,
    pub four_star: i64,
    pub three_star: i64,
    pub two_star: i64,
    pub one_star: i64,
}

impl RatingStats {
    pub fn empty() -> Self {
        Self {
            average_rating: Decimal::ZERO,
            review_count: 0,
            five_star: 0,
            four_star: 0,
            three_star: 0,
            two_star: 0,
            one_star: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut req = CreateReviewRequest {
            restaurant_id: 1,
            order_id: None,
            rating: 5,
            comment: Some("Great pizza".into()),
        };
        assert!(req.validate().is_ok());
        req.rating = 0;
        assert!(req.validate().is_err());
        req.rating = 6;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_requires_a_field() {
        assert!(UpdateReviewRequest::default().validate().is_err());
        let req = UpdateReviewRequest {
            rating: Some(3),
            comment: None,
        };
        assert!(req.validate().is_ok());
    }
}
