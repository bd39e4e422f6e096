pub mod auth_service;
pub mod favorite_service;
pub mod menu_item_service;
pub mod order_service;
pub mod restaurant_service;
pub mod review_service;
pub mod user_service;

pub use auth_service::*;
pub use favorite_service::*;
pub use menu_item_service::*;
pub use order_service::*;
pub use restaurant_service::*;
pub use review_service::ReviewService;
pub use user_service::*;
