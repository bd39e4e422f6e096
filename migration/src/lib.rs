pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_restaurants;
mod m20250901_000003_create_menu_items;
mod m20250901_000004_create_orders;
mod m20250901_000005_create_favorites_and_reviews;
mod m20250915_000001_add_order_idempotency_key;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_restaurants::Migration),
            Box::new(m20250901_000003_create_menu_items::Migration),
            Box::new(m20250901_000004_create_orders::Migration),
            Box::new(m20250901_000005_create_favorites_and_reviews::Migration),
            Box::new(m20250915_000001_add_order_idempotency_key::Migration),
        ]
    }
}
