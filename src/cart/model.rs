use super::{CartError, CartResult};
use crate::models::{CreateOrderItemRequest, CreateOrderRequest};
use crate::utils::{MAX_ITEM_QUANTITY, validate_money};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 数量必须落在服务端接受的 1..=MAX_ITEM_QUANTITY 内
fn checked_quantity(quantity: u32) -> CartResult<i32> {
    i32::try_from(quantity)
        .ok()
        .filter(|q| (1..=MAX_ITEM_QUANTITY).contains(q))
        .ok_or(CartError::InvalidQuantity)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item_id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl CartItem {
    pub fn new(menu_item_id: i32, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            menu_item_id,
            name: name.into(),
            price,
            quantity,
            special_instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// 结算金额, 均保留两位小数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// 购物车只属于一家餐厅, 条目按加入顺序保存
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    restaurant_id: Option<i32>,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restaurant_id(&self) -> Option<i32> {
        self.restaurant_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 加入菜品; 已存在时累加数量, 备注以最新的为准
    pub fn add_item(&mut self, restaurant_id: i32, item: CartItem) -> CartResult<()> {
        checked_quantity(item.quantity)?;
        validate_money("Price", item.price).map_err(|_| CartError::InvalidPrice)?;
        if let Some(current) = self.restaurant_id
            && current != restaurant_id
            && !self.items.is_empty()
        {
            return Err(CartError::DifferentRestaurant {
                current,
                requested: restaurant_id,
            });
        }

        self.restaurant_id = Some(restaurant_id);
        match self
            .items
            .iter_mut()
            .find(|i| i.menu_item_id == item.menu_item_id)
        {
            Some(existing) => {
                let merged = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::InvalidQuantity)?;
                checked_quantity(merged)?;
                existing.quantity = merged;
                existing.price = item.price;
                if item.special_instructions.is_some() {
                    existing.special_instructions = item.special_instructions;
                }
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    /// 修改数量, 0 表示移除
    pub fn update_quantity(&mut self, menu_item_id: i32, quantity: u32) -> CartResult<()> {
        if quantity == 0 {
            return self.remove_item(menu_item_id);
        }
        checked_quantity(quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.menu_item_id == menu_item_id)
            .ok_or(CartError::ItemNotFound(menu_item_id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, menu_item_id: i32) -> CartResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.menu_item_id != menu_item_id);
        if self.items.len() == before {
            return Err(CartError::ItemNotFound(menu_item_id));
        }
        if self.items.is_empty() {
            self.restaurant_id = None;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant_id = None;
    }

    /// 商品总件数
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn subtotal(&self) -> Decimal {
        round_money(
            self.items
                .iter()
                .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.line_total())),
        )
    }

    pub fn totals(&self, tax_rate: Decimal, delivery_fee: Decimal) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = round_money(subtotal.saturating_mul(tax_rate));
        let delivery_fee = round_money(delivery_fee);
        CartTotals {
            subtotal,
            tax,
            delivery_fee,
            total: subtotal.saturating_add(tax).saturating_add(delivery_fee),
        }
    }

    /// 生成下单请求, 金额与服务端校验规则一致
    pub fn to_order_request(
        &self,
        delivery_address: impl Into<String>,
        tax_rate: Decimal,
        delivery_fee: Decimal,
    ) -> CartResult<CreateOrderRequest> {
        let restaurant_id = match (self.restaurant_id, self.items.is_empty()) {
            (Some(id), false) => id,
            _ => return Err(CartError::Empty),
        };
        let totals = self.totals(tax_rate, delivery_fee);

        // 从文件加载的购物车未经 add_item 校验
        let mut items = Vec::with_capacity(self.items.len());
        for item in &self.items {
            items.push(CreateOrderItemRequest {
                menu_item_id: item.menu_item_id,
                quantity: checked_quantity(item.quantity)?,
                price: item.price,
                special_instructions: item.special_instructions.clone(),
            });
        }

        Ok(CreateOrderRequest {
            restaurant_id,
            delivery_address: delivery_address.into(),
            delivery_phone: None,
            delivery_notes: None,
            payment_method: None,
            subtotal_amount: totals.subtotal,
            tax_amount: totals.tax,
            delivery_fee: totals.delivery_fee,
            total_amount: totals.total,
            items,
            idempotency_key: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> CartItem {
        CartItem::new(1, "Margherita", Decimal::new(1299, 2), 2)
    }

    fn salad() -> CartItem {
        CartItem::new(2, "Caesar Salad", Decimal::new(902, 2), 1)
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut cart = Cart::new();
        cart.add_item(3, pizza()).unwrap();
        cart.add_item(3, CartItem::new(1, "Margherita", Decimal::new(1299, 2), 1))
            .unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_rejects_items_from_another_restaurant() {
        let mut cart = Cart::new();
        cart.add_item(3, pizza()).unwrap();
        let err = cart.add_item(4, salad()).unwrap_err();
        assert!(matches!(
            err,
            CartError::DifferentRestaurant {
                current: 3,
                requested: 4
            }
        ));

        cart.clear();
        assert!(cart.add_item(4, salad()).is_ok());
        assert_eq!(cart.restaurant_id(), Some(4));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(3, pizza()).unwrap();
        cart.add_item(3, salad()).unwrap();

        cart.update_quantity(1, 5).unwrap();
        assert_eq!(cart.item_count(), 6);

        cart.update_quantity(1, 0).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert!(matches!(
            cart.update_quantity(1, 2),
            Err(CartError::ItemNotFound(1))
        ));
    }

    #[test]
    fn test_removing_last_item_releases_restaurant() {
        let mut cart = Cart::new();
        cart.add_item(3, salad()).unwrap();
        cart.remove_item(2).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
        assert!(cart.add_item(9, pizza()).is_ok());
    }

    #[test]
    fn test_zero_quantity_add_is_rejected() {
        let mut cart = Cart::new();
        let item = CartItem::new(1, "Margherita", Decimal::new(1299, 2), 0);
        assert!(matches!(
            cart.add_item(3, item),
            Err(CartError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_totals_for_sample_order() {
        let mut cart = Cart::new();
        cart.add_item(3, pizza()).unwrap();
        cart.add_item(3, salad()).unwrap();

        let totals = cart.totals(Decimal::new(7, 2), Decimal::ZERO);
        assert_eq!(totals.subtotal, Decimal::new(3500, 2));
        assert_eq!(totals.tax, Decimal::new(245, 2));
        assert_eq!(totals.total, Decimal::new(3745, 2));
    }

    #[test]
    fn test_order_request_passes_server_validation() {
        let mut cart = Cart::new();
        cart.add_item(3, pizza().with_instructions("extra basil"))
            .unwrap();
        cart.add_item(3, salad()).unwrap();

        let request = cart
            .to_order_request("221B Baker Street", Decimal::new(7, 2), Decimal::new(299, 2))
            .unwrap();
        assert_eq!(request.restaurant_id, 3);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.total_amount, Decimal::new(4044, 2));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::new();
        let too_many = CartItem::new(1, "Margherita", Decimal::new(1299, 2), 1000);
        assert!(matches!(
            cart.add_item(3, too_many),
            Err(CartError::InvalidQuantity)
        ));

        cart.add_item(3, CartItem::new(1, "Margherita", Decimal::new(1299, 2), 999))
            .unwrap();
        assert!(matches!(
            cart.add_item(3, CartItem::new(1, "Margherita", Decimal::new(1299, 2), u32::MAX)),
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(
            cart.add_item(3, pizza()),
            Err(CartError::InvalidQuantity)
        ));
        assert_eq!(cart.item_count(), 999);

        assert!(matches!(
            cart.update_quantity(1, u32::MAX),
            Err(CartError::InvalidQuantity)
        ));
        assert_eq!(cart.item_count(), 999);
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        let mut cart = Cart::new();
        for price in [Decimal::new(1005, 3), Decimal::new(-1, 2), Decimal::MAX] {
            assert!(matches!(
                cart.add_item(3, CartItem::new(1, "Margherita", price, 1)),
                Err(CartError::InvalidPrice)
            ));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_loaded_cart_with_oversized_values_does_not_panic() {
        let json = r#"{
            "restaurant_id": 3,
            "items": [
                {"menu_item_id": 1, "name": "Margherita", "price": "79228162514264337593543950335", "quantity": 4294967295}
            ]
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items()[0].line_total(), Decimal::MAX);
        assert_eq!(cart.totals(Decimal::new(7, 2), Decimal::ZERO).total, Decimal::MAX);
        assert!(matches!(
            cart.to_order_request("221B Baker Street", Decimal::ZERO, Decimal::ZERO),
            Err(CartError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_empty_cart_cannot_checkout() {
        let cart = Cart::new();
        assert!(matches!(
            cart.to_order_request("somewhere", Decimal::ZERO, Decimal::ZERO),
            Err(CartError::Empty)
        ));
    }
}
