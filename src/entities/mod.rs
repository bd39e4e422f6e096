pub mod favorites;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod restaurants;
pub mod reviews;
pub mod users;

pub use favorites as favorite_entity;
pub use menu_items as menu_item_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use restaurants as restaurant_entity;
pub use reviews as review_entity;
pub use users as user_entity;

pub use favorites::FavoriteType;
pub use orders::{OrderStatus, PaymentStatus};
pub use users::UserRole;
