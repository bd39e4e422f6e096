use crate::entities::{
    UserRole, order_entity as orders, restaurant_entity as restaurants, review_entity as reviews,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateReviewRequest, PaginatedResponse, PaginationParams, RatingStats, ReviewResponse,
    UpdateReviewRequest,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

#[derive(Debug, FromQueryResult)]
struct RatingStatsRow {
    average_rating: Option<Decimal>,
    review_count: i64,
    five_star: i64,
    four_star: i64,
    three_star: i64,
    two_star: i64,
    one_star: i64,
}

#[derive(Debug, FromQueryResult)]
struct RatingSummaryRow {
    restaurant_id: i32,
    average_rating: Option<Decimal>,
    review_count: i64,
}

/// 单个餐厅的评分统计 (条件聚合, 无评论时全部为 0)
pub async fn rating_stats<C: ConnectionTrait>(db: &C, restaurant_id: i32) -> AppResult<RatingStats> {
    let row = reviews::Entity::find()
        .filter(reviews::Column::RestaurantId.eq(restaurant_id))
        .select_only()
        .column_as(Expr::cust("AVG(rating)"), "average_rating")
        .column_as(Expr::cust("COUNT(*)"), "review_count")
        .column_as(Expr::cust("COUNT(CASE WHEN rating = 5 THEN 1 END)"), "five_star")
        .column_as(Expr::cust("COUNT(CASE WHEN rating = 4 THEN 1 END)"), "four_star")
        .column_as(Expr::cust("COUNT(CASE WHEN rating = 3 THEN 1 END)"), "three_star")
        .column_as(Expr::cust("COUNT(CASE WHEN rating = 2 THEN 1 END)"), "two_star")
        .column_as(Expr::cust("COUNT(CASE WHEN rating = 1 THEN 1 END)"), "one_star")
        .into_model::<RatingStatsRow>()
        .one(db)
        .await?;

    Ok(match row {
        Some(r) if r.review_count > 0 => RatingStats {
            average_rating: r.average_rating.unwrap_or_default().round_dp(2),
            review_count: r.review_count,
            five_star: r.five_star,
            four_star: r.four_star,
            three_star: r.three_star,
            two_star: r.two_star,
            one_star: r.one_star,
        },
        _ => RatingStats::empty(),
    })
}

/// 一次分组查询取出多个餐厅的 (平均分, 评论数)
pub async fn rating_summaries<C: ConnectionTrait>(
    db: &C,
    restaurant_ids: &[i32],
) -> AppResult<HashMap<i32, (Decimal, i64)>> {
    if restaurant_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = reviews::Entity::find()
        .filter(reviews::Column::RestaurantId.is_in(restaurant_ids.iter().copied()))
        .select_only()
        .column(reviews::Column::RestaurantId)
        .column_as(Expr::cust("AVG(rating)"), "average_rating")
        .column_as(Expr::cust("COUNT(*)"), "review_count")
        .group_by(reviews::Column::RestaurantId)
        .into_model::<RatingSummaryRow>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            (
                r.restaurant_id,
                (r.average_rating.unwrap_or_default().round_dp(2), r.review_count),
            )
        })
        .collect())
}

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_review(
        &self,
        user_id: i32,
        request: CreateReviewRequest,
    ) -> AppResult<ReviewResponse> {
        request.validate()?;

        restaurants::Entity::find_by_id(request.restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

        // 关联订单必须属于本人且来自同一餐厅
        if let Some(order_id) = request.order_id {
            let order = orders::Entity::find_by_id(order_id)
                .filter(orders::Column::UserId.eq(user_id))
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
            if order.restaurant_id != request.restaurant_id {
                return Err(AppError::ValidationError(
                    "Order does not belong to this restaurant".to_string(),
                ));
            }
        }

        let existing = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::RestaurantId.eq(request.restaurant_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "You have already reviewed this restaurant".to_string(),
            ));
        }

        let review = reviews::ActiveModel {
            user_id: Set(user_id),
            restaurant_id: Set(request.restaurant_id),
            order_id: Set(request.order_id),
            rating: Set(request.rating),
            comment: Set(request.comment),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "You have already reviewed this restaurant")
        })?;

        log::info!(
            "review created: id={} restaurant_id={} rating={}",
            review.id,
            review.restaurant_id,
            review.rating
        );
        Ok(review.into())
    }

    /// 餐厅评论列表 (公开), 附带评论人姓名
    pub async fn list_restaurant_reviews(
        &self,
        restaurant_id: i32,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<ReviewResponse>> {
        let base = reviews::Entity::find().filter(reviews::Column::RestaurantId.eq(restaurant_id));
        let total = base.clone().count(&self.pool).await?;

        let rows = base
            .find_also_related(users::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|(review, user)| {
                let mut resp = ReviewResponse::from(review);
                resp.user_name = user.map(|u| u.name);
                resp
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn restaurant_stats(&self, restaurant_id: i32) -> AppResult<RatingStats> {
        rating_stats(&self.pool, restaurant_id).await
    }

    pub async fn list_my_reviews(
        &self,
        user_id: i32,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<ReviewResponse>> {
        let base = reviews::Entity::find().filter(reviews::Column::UserId.eq(user_id));
        let total = base.clone().count(&self.pool).await?;

        let rows = base
            .find_also_related(restaurants::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|(review, restaurant)| {
                let mut resp = ReviewResponse::from(review);
                resp.restaurant_name = restaurant.map(|r| r.name);
                resp
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn update_review(
        &self,
        user_id: i32,
        review_id: i32,
        request: UpdateReviewRequest,
    ) -> AppResult<ReviewResponse> {
        request.validate()?;

        let review = reviews::Entity::find_by_id(review_id)
            .filter(reviews::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        let mut am = review.into_active_model();
        if let Some(rating) = request.rating {
            am.rating = Set(rating);
        }
        if let Some(comment) = request.comment {
            am.comment = Set(Some(comment));
        }
        Ok(am.update(&self.pool).await?.into())
    }

    /// 删除评论: 作者本人或管理员
    pub async fn delete_review(&self, user_id: i32, role: UserRole, review_id: i32) -> AppResult<()> {
        let review = reviews::Entity::find_by_id(review_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        if review.user_id != user_id {
            if role != UserRole::Admin {
                return Err(AppError::NotFound("Review not found".to_string()));
            }
            log::info!("review {review_id} deleted by admin {user_id}");
        }

        reviews::Entity::delete_by_id(review.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}
