use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "review",
    request_body = CreateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "评论已发布", body = ReviewResponse),
        (status = 400, description = "评分必须为 1~5", body = ApiErrorResponse),
        (status = 409, description = "已评论过该餐厅", body = ApiErrorResponse)
    )
)]
pub async fn create_review(
    review_service: web::Data<ReviewService>,
    user: AuthUser,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    match review_service
        .create_review(user.id, request.into_inner())
        .await
    {
        Ok(review) => Ok(HttpResponse::Created().json(ApiResponse::success(review))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/restaurant/{restaurant_id}",
    tag = "review",
    params(
        ("restaurant_id" = i32, Path, description = "餐厅ID"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("perPage" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "餐厅评论 (分页)")
    )
)]
pub async fn list_restaurant_reviews(
    review_service: web::Data<ReviewService>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match review_service
        .list_restaurant_reviews(path.into_inner(), query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/restaurant/{restaurant_id}/stats",
    tag = "review",
    params(("restaurant_id" = i32, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "评分统计", body = RatingStats)
    )
)]
pub async fn restaurant_rating_stats(
    review_service: web::Data<ReviewService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match review_service.restaurant_stats(path.into_inner()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/my-reviews",
    tag = "review",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("perPage" = Option<u64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的评论 (分页)")
    )
)]
pub async fn list_my_reviews(
    review_service: web::Data<ReviewService>,
    user: AuthUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match review_service
        .list_my_reviews(user.id, query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "review",
    params(("id" = i32, Path, description = "评论ID")),
    request_body = UpdateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论已更新", body = ReviewResponse),
        (status = 404, description = "评论不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_review(
    review_service: web::Data<ReviewService>,
    user: AuthUser,
    path: web::Path<i32>,
    request: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse> {
    match review_service
        .update_review(user.id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(review) => Ok(HttpResponse::Ok().json(ApiResponse::success(review))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "review",
    params(("id" = i32, Path, description = "评论ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论已删除"),
        (status = 404, description = "评论不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match review_service
        .delete_review(user.id, user.role, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Review deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::post().to(create_review))
            .route("/my-reviews", web::get().to(list_my_reviews))
            .route(
                "/restaurant/{restaurant_id}",
                web::get().to(list_restaurant_reviews),
            )
            .route(
                "/restaurant/{restaurant_id}/stats",
                web::get().to(restaurant_rating_stats),
            )
            .route("/{id}", web::put().to(update_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}
