use crate::middlewares::AdminUser;
use crate::models::*;
use crate::services::RestaurantService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurant",
    params(
        ("q" = Option<String>, Query, description = "按名称/描述/菜系搜索"),
        ("cuisineType" = Option<String>, Query, description = "菜系"),
        ("isActive" = Option<bool>, Query, description = "默认 true"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("perPage" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "餐厅列表 (分页)")
    )
)]
pub async fn list_restaurants(
    restaurant_service: web::Data<RestaurantService>,
    query: web::Query<RestaurantQuery>,
) -> Result<HttpResponse> {
    match restaurant_service
        .list_restaurants(query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i32, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "餐厅详情", body = RestaurantDetailResponse),
        (status = 404, description = "餐厅不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match restaurant_service.get_restaurant(path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}/categories",
    tag = "restaurant",
    params(("id" = i32, Path, description = "餐厅ID")),
    responses(
        (status = 200, description = "菜单分类", body = [String]),
        (status = 404, description = "餐厅不存在", body = ApiErrorResponse)
    )
)]
pub async fn list_categories(
    restaurant_service: web::Data<RestaurantService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match restaurant_service.list_categories(path.into_inner()).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(ApiResponse::success(categories))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurant",
    request_body = CreateRestaurantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "创建成功", body = RestaurantResponse),
        (status = 403, description = "需要管理员权限", body = ApiErrorResponse)
    )
)]
pub async fn create_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    _admin: AdminUser,
    request: web::Json<CreateRestaurantRequest>,
) -> Result<HttpResponse> {
    match restaurant_service
        .create_restaurant(request.into_inner())
        .await
    {
        Ok(restaurant) => Ok(HttpResponse::Created().json(ApiResponse::success(restaurant))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i32, Path, description = "餐厅ID")),
    request_body = UpdateRestaurantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = RestaurantResponse),
        (status = 404, description = "餐厅不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    _admin: AdminUser,
    path: web::Path<i32>,
    request: web::Json<UpdateRestaurantRequest>,
) -> Result<HttpResponse> {
    match restaurant_service
        .update_restaurant(path.into_inner(), request.into_inner())
        .await
    {
        Ok(restaurant) => Ok(HttpResponse::Ok().json(ApiResponse::success(restaurant))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i32, Path, description = "餐厅ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已下架"),
        (status = 404, description = "餐厅不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match restaurant_service.delete_restaurant(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Restaurant deactivated"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn restaurant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restaurants")
            .route("", web::get().to(list_restaurants))
            .route("", web::post().to(create_restaurant))
            .route("/{id}", web::get().to(get_restaurant))
            .route("/{id}", web::put().to(update_restaurant))
            .route("/{id}", web::delete().to(delete_restaurant))
            .route("/{id}/categories", web::get().to(list_categories)),
    );
}
