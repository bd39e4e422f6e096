//! 客户端购物车
//!
//! 购物车是调用方持有的普通值, 不存在全局状态; 持久化通过 [`CartRepository`]
//! 在明确的加载/保存点完成, 底层存储由 [`CartStore`] 抽象 (JSON 文件或内存)。

mod model;
mod store;

pub use model::{Cart, CartItem, CartTotals};
pub use store::{CART_KEY, CartRepository, CartStore, JsonFileStore, MemoryStore};

use crate::utils::MAX_ITEM_QUANTITY;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Cart already holds items from restaurant {current}; clear it before adding items from restaurant {requested}")]
    DifferentRestaurant { current: i32, requested: i32 },

    #[error("Quantity must be between 1 and {max}", max = MAX_ITEM_QUANTITY)]
    InvalidQuantity,

    #[error("Price must be a non-negative amount with at most 2 decimal places")]
    InvalidPrice,

    #[error("Menu item {0} is not in the cart")]
    ItemNotFound(i32),

    #[error("Cart is empty")]
    Empty,

    #[error("Cart storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CartResult<T> = Result<T, CartError>;
