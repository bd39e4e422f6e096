use crate::middlewares::AdminUser;
use crate::models::*;
use crate::services::MenuItemService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/menu-items",
    tag = "menu",
    params(
        ("restaurantId" = Option<i32>, Query, description = "餐厅ID"),
        ("category" = Option<String>, Query, description = "分类"),
        ("q" = Option<String>, Query, description = "搜索关键字"),
        ("isAvailable" = Option<bool>, Query, description = "是否可售"),
        ("isFeatured" = Option<bool>, Query, description = "是否推荐"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("perPage" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "菜品列表 (分页)")
    )
)]
pub async fn list_menu_items(
    menu_item_service: web::Data<MenuItemService>,
    query: web::Query<MenuItemQuery>,
) -> Result<HttpResponse> {
    match menu_item_service.list_menu_items(query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}",
    tag = "menu",
    params(("id" = i32, Path, description = "菜品ID")),
    responses(
        (status = 200, description = "菜品详情", body = MenuItemResponse),
        (status = 404, description = "菜品不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_menu_item(
    menu_item_service: web::Data<MenuItemService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match menu_item_service.get_menu_item(path.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/menu-items",
    tag = "menu",
    request_body = CreateMenuItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "创建成功", body = MenuItemResponse),
        (status = 403, description = "需要管理员权限", body = ApiErrorResponse)
    )
)]
pub async fn create_menu_item(
    menu_item_service: web::Data<MenuItemService>,
    _admin: AdminUser,
    request: web::Json<CreateMenuItemRequest>,
) -> Result<HttpResponse> {
    match menu_item_service.create_menu_item(request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/menu-items/{id}",
    tag = "menu",
    params(("id" = i32, Path, description = "菜品ID")),
    request_body = UpdateMenuItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = MenuItemResponse),
        (status = 404, description = "菜品不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_menu_item(
    menu_item_service: web::Data<MenuItemService>,
    _admin: AdminUser,
    path: web::Path<i32>,
    request: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse> {
    match menu_item_service
        .update_menu_item(path.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/menu-items/{id}",
    tag = "menu",
    params(("id" = i32, Path, description = "菜品ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "菜品不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_menu_item(
    menu_item_service: web::Data<MenuItemService>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match menu_item_service.delete_menu_item(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Menu item deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn menu_item_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menu-items")
            .route("", web::get().to(list_menu_items))
            .route("", web::post().to(create_menu_item))
            .route("/{id}", web::get().to(get_menu_item))
            .route("/{id}", web::put().to(update_menu_item))
            .route("/{id}", web::delete().to(delete_menu_item)),
    );
}
