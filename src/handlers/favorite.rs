use crate::entities::FavoriteType;
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::FavoriteService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/favorites",
    tag = "favorite",
    request_body = FavoriteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "已收藏", body = FavoriteResponse),
        (status = 404, description = "收藏目标不存在", body = ApiErrorResponse),
        (status = 409, description = "已收藏过", body = ApiErrorResponse)
    )
)]
pub async fn add_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    request: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service
        .add_favorite(user.id, request.into_inner())
        .await
    {
        Ok(favorite) => Ok(HttpResponse::Created().json(ApiResponse::success(favorite))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorite",
    params(("type" = Option<FavoriteType>, Query, description = "restaurant | menu_item")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "收藏列表", body = [FavoriteResponse])
    )
)]
pub async fn list_favorites(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    query: web::Query<FavoriteListQuery>,
) -> Result<HttpResponse> {
    match favorite_service
        .list_favorites(user.id, query.favorite_type)
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/favorites/check",
    tag = "favorite",
    params(
        ("type" = FavoriteType, Query, description = "restaurant | menu_item"),
        ("favoriteId" = i32, Query, description = "目标ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "是否已收藏", body = FavoriteStatusResponse)
    )
)]
pub async fn check_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    query: web::Query<FavoriteCheckQuery>,
) -> Result<HttpResponse> {
    match favorite_service
        .check_favorite(user.id, query.favorite_type, query.favorite_id)
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/favorites/toggle",
    tag = "favorite",
    request_body = FavoriteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "切换后的收藏状态", body = FavoriteStatusResponse)
    )
)]
pub async fn toggle_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    request: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    match favorite_service
        .toggle_favorite(user.id, request.into_inner())
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/favorites/{id}",
    tag = "favorite",
    params(("id" = i32, Path, description = "收藏ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已取消收藏"),
        (status = 404, description = "收藏不存在", body = ApiErrorResponse)
    )
)]
pub async fn remove_favorite(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match favorite_service
        .remove_favorite(user.id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Removed from favorites"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/favorites/{favorite_type}/{target_id}",
    tag = "favorite",
    params(
        ("favorite_type" = FavoriteType, Path, description = "restaurant | menu_item"),
        ("target_id" = i32, Path, description = "目标ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已取消收藏"),
        (status = 404, description = "收藏不存在", body = ApiErrorResponse)
    )
)]
pub async fn remove_favorite_by_target(
    favorite_service: web::Data<FavoriteService>,
    user: AuthUser,
    path: web::Path<(FavoriteType, i32)>,
) -> Result<HttpResponse> {
    let (favorite_type, target_id) = path.into_inner();
    match favorite_service
        .remove_favorite_by_target(user.id, favorite_type, target_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Removed from favorites"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn favorite_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::post().to(add_favorite))
            .route("", web::get().to(list_favorites))
            .route("/check", web::get().to(check_favorite))
            .route("/toggle", web::put().to(toggle_favorite))
            .route("/{id}", web::delete().to(remove_favorite))
            .route(
                "/{favorite_type}/{target_id}",
                web::delete().to(remove_favorite_by_target),
            ),
    );
}
