mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use common::*;
use food_order_backend::entities::UserRole;
use food_order_backend::error::json_error_handler;
use food_order_backend::handlers;
use food_order_backend::middlewares::AuthMiddleware;
use food_order_backend::services::*;
use food_order_backend::utils::JwtService;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

const SECRET: &str = "test-secret";

fn jwt() -> JwtService {
    JwtService::new(SECRET, 3600, 86_400)
}

macro_rules! init_app {
    ($db:expr) => {{
        let db: DatabaseConnection = $db.clone();
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt()))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(db.clone()))
                .app_data(web::Data::new(AuthService::new(db.clone(), jwt())))
                .app_data(web::Data::new(UserService::new(db.clone())))
                .app_data(web::Data::new(RestaurantService::new(db.clone())))
                .app_data(web::Data::new(MenuItemService::new(db.clone())))
                .app_data(web::Data::new(OrderService::new(db.clone(), order_config())))
                .app_data(web::Data::new(FavoriteService::new(db.clone())))
                .app_data(web::Data::new(ReviewService::new(db.clone())))
                .configure(handlers::health_config)
                .service(web::scope("/api").configure(handlers::api_config)),
        )
        .await
    }};
}

fn bearer(user_id: i32, role: UserRole) -> (&'static str, String) {
    let token = jwt().generate_access_token(user_id, role).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let db = setup_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Jane Doe",
            "email": "Jane@Example.com",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "jane@example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Jane Again",
            "email": "jane@example.com",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "jane@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "jane@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Jane Doe");
}

#[actix_web::test]
async fn test_protected_route_requires_token() {
    let db = setup_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/api/orders/my-orders")
        .to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(resp) => resp.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/orders/my-orders")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(resp) => resp.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_public_catalog_ignores_bad_token() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri(&format!("/api/restaurants/{}", fixture.restaurant.id))
        .insert_header(("Authorization", "Bearer expired"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Luigi's");
    assert_eq!(body["data"]["rating_stats"]["review_count"], 0);
}

#[actix_web::test]
async fn test_admin_routes_reject_customers() {
    let db = setup_db().await;
    let customer = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let app = init_app!(db);

    let payload = json!({
        "name": "Sushi Bar",
        "address": "2 Harbour Road",
        "cuisineType": "Japanese",
        "deliveryFee": "2.50",
        "minimumOrder": 10
    });

    let req = test::TestRequest::post()
        .uri("/api/restaurants")
        .insert_header(bearer(customer.id, UserRole::Customer))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/restaurants")
        .insert_header(bearer(admin.id, UserRole::Admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Sushi Bar");
}

#[actix_web::test]
async fn test_order_flow_over_http() {
    let db = setup_db().await;
    let user = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let fixture = seed_fixture(&db).await;
    let app = init_app!(db);

    let payload = json!({
        "restaurantId": fixture.restaurant.id,
        "deliveryAddress": "221B Baker Street",
        "subtotalAmount": "35.00",
        "taxAmount": 2.45,
        "deliveryFee": 0,
        "totalAmount": 37.45,
        "items": [
            { "menuItemId": fixture.pizza.id, "quantity": 2, "price": 12.99 },
            { "menuItemId": fixture.salad.id, "quantity": 1, "price": "9.02" }
        ]
    });

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(bearer(user.id, UserRole::Customer))
        .insert_header(("Idempotency-Key", "http-1"))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let order_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["order_status"], "preparing");
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(bearer(user.id, UserRole::Customer))
        .insert_header(("Idempotency-Key", "http-1"))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"].as_i64(), Some(order_id));

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{order_id}/pay"))
        .insert_header(bearer(user.id, UserRole::Customer))
        .set_json(json!({ "action": "deliver" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["order_status"], "delivered");
    assert_eq!(body["data"]["payment_status"], "paid");

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{order_id}/cancel"))
        .insert_header(bearer(user.id, UserRole::Customer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
}

#[actix_web::test]
async fn test_empty_order_is_bad_request() {
    let db = setup_db().await;
    let user = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let fixture = seed_fixture(&db).await;
    let app = init_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(bearer(user.id, UserRole::Customer))
        .set_json(json!({
            "restaurantId": fixture.restaurant.id,
            "deliveryAddress": "221B Baker Street",
            "subtotalAmount": 0,
            "taxAmount": 0,
            "deliveryFee": 0,
            "totalAmount": 0,
            "items": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_health_reports_database() {
    let db = setup_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
