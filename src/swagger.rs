use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{FavoriteType, OrderStatus, PaymentStatus, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::user::change_password,
        handlers::restaurant::list_restaurants,
        handlers::restaurant::get_restaurant,
        handlers::restaurant::list_categories,
        handlers::restaurant::create_restaurant,
        handlers::restaurant::update_restaurant,
        handlers::restaurant::delete_restaurant,
        handlers::menu_item::list_menu_items,
        handlers::menu_item::get_menu_item,
        handlers::menu_item::create_menu_item,
        handlers::menu_item::update_menu_item,
        handlers::menu_item::delete_menu_item,
        handlers::order::create_order,
        handlers::order::get_my_orders,
        handlers::order::get_my_order_stats,
        handlers::order::get_order,
        handlers::order::cancel_order,
        handlers::order::pay_order,
        handlers::order::update_order_status,
        handlers::order::list_all_orders,
        handlers::favorite::add_favorite,
        handlers::favorite::list_favorites,
        handlers::favorite::check_favorite,
        handlers::favorite::toggle_favorite,
        handlers::favorite::remove_favorite,
        handlers::favorite::remove_favorite_by_target,
        handlers::review::create_review,
        handlers::review::list_restaurant_reviews,
        handlers::review::restaurant_rating_stats,
        handlers::review::list_my_reviews,
        handlers::review::update_review,
        handlers::review::delete_review,
    ),
    components(
        schemas(
            ApiError,
            ApiErrorResponse,
            OffsetPagination,
            UserRole,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UserResponse,
            CustomerSummary,
            AuthResponse,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantResponse,
            RestaurantDetailResponse,
            RestaurantSummary,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemResponse,
            OrderStatus,
            PaymentStatus,
            CreateOrderItemRequest,
            CreateOrderRequest,
            OrderResponse,
            OrderItemResponse,
            OrderDetailResponse,
            OrderSummaryResponse,
            OrderListResponse,
            SettleAction,
            SettleOrderRequest,
            UpdateOrderStatusRequest,
            OrderStatsResponse,
            FavoriteType,
            FavoriteRequest,
            FavoriteResponse,
            FavoriteStatusResponse,
            CreateReviewRequest,
            UpdateReviewRequest,
            ReviewResponse,
            RatingStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile API"),
        (name = "restaurant", description = "Restaurant API"),
        (name = "menu", description = "Menu item API"),
        (name = "order", description = "Order API"),
        (name = "favorite", description = "Favorite API"),
        (name = "review", description = "Review API"),
    ),
    info(
        title = "Food Order Backend API",
        version = "1.0.0",
        description = "Food ordering REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_order_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/orders/{order_id}/cancel"));
        assert!(doc.paths.paths.contains_key("/reviews/restaurant/{restaurant_id}/stats"));
    }
}
