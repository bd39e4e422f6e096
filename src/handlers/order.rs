use crate::entities::OrderStatus;
use crate::middlewares::{AdminUser, AuthUser};
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

fn idempotency_key(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "重复提交时返回同一订单")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "订单已创建", body = OrderDetailResponse),
        (status = 200, description = "幂等重放, 返回已有订单", body = OrderDetailResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 404, description = "餐厅不存在", body = ApiErrorResponse),
        (status = 409, description = "幂等键已过期", body = ApiErrorResponse)
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .create_order(user.id, request.into_inner(), idempotency_key(&req))
        .await
    {
        Ok(result) if result.created => Ok(HttpResponse::Created().json(
            ApiResponse::success_with_message(result.order, "Order created successfully"),
        )),
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result.order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/my-orders",
    tag = "order",
    params(
        ("status" = Option<OrderStatus>, Query, description = "按状态过滤"),
        ("limit" = Option<u64>, Query, description = "每页数量, 默认 20, 最大 100"),
        ("offset" = Option<u64>, Query, description = "偏移量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的订单", body = OrderListResponse),
        (status = 401, description = "未授权", body = ApiErrorResponse)
    )
)]
pub async fn get_my_orders(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    match order_service.get_user_orders(user.id, &query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/my-orders/stats",
    tag = "order",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单统计", body = OrderStatsResponse)
    )
)]
pub async fn get_my_order_stats(
    order_service: web::Data<OrderService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match order_service.get_user_stats(user.id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    tag = "order",
    params(("order_id" = i32, Path, description = "订单ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单详情", body = OrderDetailResponse),
        (status = 404, description = "订单不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match order_service.get_order(user.id, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{order_id}/cancel",
    tag = "order",
    params(("order_id" = i32, Path, description = "订单ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单已取消", body = OrderDetailResponse),
        (status = 400, description = "订单当前状态不可取消", body = ApiErrorResponse),
        (status = 404, description = "订单不存在", body = ApiErrorResponse)
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match order_service.cancel_order(user.id, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            order,
            "Order cancelled",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{order_id}/pay",
    tag = "order",
    params(("order_id" = i32, Path, description = "订单ID")),
    request_body = SettleOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "结算完成", body = OrderDetailResponse),
        (status = 400, description = "订单当前状态不可结算", body = ApiErrorResponse),
        (status = 404, description = "订单不存在", body = ApiErrorResponse)
    )
)]
pub async fn pay_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i32>,
    request: web::Json<SettleOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .settle_order(user.id, path.into_inner(), request.action)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/orders/{order_id}/status",
    tag = "order",
    params(("order_id" = i32, Path, description = "订单ID")),
    request_body = UpdateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "状态已更新", body = OrderDetailResponse),
        (status = 400, description = "非法状态值", body = ApiErrorResponse),
        (status = 403, description = "需要管理员权限", body = ApiErrorResponse),
        (status = 404, description = "订单不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    _admin: AdminUser,
    path: web::Path<i32>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_order_status(path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("status" = Option<OrderStatus>, Query, description = "按状态过滤"),
        ("limit" = Option<u64>, Query, description = "每页数量"),
        ("offset" = Option<u64>, Query, description = "偏移量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部订单", body = OrderListResponse),
        (status = 403, description = "需要管理员权限", body = ApiErrorResponse)
    )
)]
pub async fn list_all_orders(
    order_service: web::Data<OrderService>,
    _admin: AdminUser,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    match order_service.list_all_orders(&query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_all_orders))
            .route("/my-orders", web::get().to(get_my_orders))
            .route("/my-orders/stats", web::get().to(get_my_order_stats))
            .route("/{order_id}", web::get().to(get_order))
            .route("/{order_id}/cancel", web::post().to(cancel_order))
            .route("/{order_id}/pay", web::post().to(pay_order))
            .route("/{order_id}/status", web::patch().to(update_order_status)),
    );
}
