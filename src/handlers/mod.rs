pub mod auth;
pub mod favorite;
pub mod health;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

pub use auth::auth_config;
pub use favorite::favorite_config;
pub use health::health_config;
pub use menu_item::menu_item_config;
pub use order::order_config;
pub use restaurant::restaurant_config;
pub use review::review_config;
pub use user::user_config;

use actix_web::web;

/// 挂载在 /api 下的全部业务路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth_config)
        .configure(user_config)
        .configure(restaurant_config)
        .configure(menu_item_config)
        .configure(order_config)
        .configure(favorite_config)
        .configure(review_config);
}
