pub mod common;
pub mod favorite;
pub mod menu_item;
pub mod order;
pub mod pagination;
pub mod restaurant;
pub mod review;
pub mod user;

pub use common::*;
pub use favorite::*;
pub use menu_item::*;
pub use order::*;
pub use pagination::*;
pub use restaurant::*;
pub use review::*;
pub use user::*;
