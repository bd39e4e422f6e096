#![allow(dead_code)]

use food_order_backend::config::OrderConfig;
use food_order_backend::entities::{
    UserRole, menu_item_entity as menu_items, restaurant_entity as restaurants,
    user_entity as users,
};
use food_order_backend::models::{CreateOrderItemRequest, CreateOrderRequest};
use food_order_backend::utils::hash_password;
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub const TEST_PASSWORD: &str = "password123";

/// 单连接的内存 SQLite, 每个测试独立一份
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn order_config() -> OrderConfig {
    OrderConfig {
        idempotency_window_secs: 3600,
    }
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, role: UserRole) -> users::Model {
    users::ActiveModel {
        name: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(TEST_PASSWORD).unwrap()),
        role: Set(role),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_restaurant(db: &DatabaseConnection, name: &str) -> restaurants::Model {
    restaurants::ActiveModel {
        name: Set(name.to_string()),
        cuisine_type: Set(Some("Italian".to_string())),
        address: Set("1 Market Street".to_string()),
        delivery_fee: Set(Decimal::ZERO),
        minimum_order: Set(Decimal::ZERO),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_menu_item(
    db: &DatabaseConnection,
    restaurant_id: i32,
    name: &str,
    price: Decimal,
) -> menu_items::Model {
    menu_items::ActiveModel {
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        price: Set(price),
        category: Set(Some("Mains".to_string())),
        is_available: Set(true),
        is_featured: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// 餐厅 + 两个菜品: 12.99 和 9.02
pub struct Fixture {
    pub restaurant: restaurants::Model,
    pub pizza: menu_items::Model,
    pub salad: menu_items::Model,
}

pub async fn seed_fixture(db: &DatabaseConnection) -> Fixture {
    let restaurant = seed_restaurant(db, "Luigi's").await;
    let pizza = seed_menu_item(db, restaurant.id, "Margherita", Decimal::new(1299, 2)).await;
    let salad = seed_menu_item(db, restaurant.id, "Caesar Salad", Decimal::new(902, 2)).await;
    Fixture {
        restaurant,
        pizza,
        salad,
    }
}

/// 2 x 12.99 + 1 x 9.02, 税 2.45, 免配送费, 合计 37.45
pub fn sample_order(fixture: &Fixture) -> CreateOrderRequest {
    CreateOrderRequest {
        restaurant_id: fixture.restaurant.id,
        delivery_address: "221B Baker Street".to_string(),
        delivery_phone: None,
        delivery_notes: None,
        payment_method: None,
        subtotal_amount: Decimal::new(3500, 2),
        tax_amount: Decimal::new(245, 2),
        delivery_fee: Decimal::ZERO,
        total_amount: Decimal::new(3745, 2),
        items: vec![
            CreateOrderItemRequest {
                menu_item_id: fixture.pizza.id,
                quantity: 2,
                price: Decimal::new(1299, 2),
                special_instructions: None,
            },
            CreateOrderItemRequest {
                menu_item_id: fixture.salad.id,
                quantity: 1,
                price: Decimal::new(902, 2),
                special_instructions: Some("no croutons".to_string()),
            },
        ],
        idempotency_key: None,
    }
}
