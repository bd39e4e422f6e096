use crate::entities::{OrderStatus, PaymentStatus, order_entity, order_item_entity};
use crate::error::{AppError, AppResult};
use crate::models::{CustomerSummary, OffsetPagination, RestaurantSummary};
use crate::utils::{
    MAX_ITEM_QUANTITY, MAX_MONEY, amounts_match, decimal, validate_money, validate_required,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAYMENT_METHOD: &str = "cash";
const MAX_IDEMPOTENCY_KEY_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub menu_item_id: i32,
    #[schema(example = 2)]
    pub quantity: i32,
    /// 客户端展示的单价, 作为明细快照保存
    #[schema(example = 12.99)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub price: Decimal,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub restaurant_id: i32,
    #[schema(example = "221B Baker Street")]
    pub delivery_address: String,
    pub delivery_phone: Option<String>,
    pub delivery_notes: Option<String>,
    #[schema(example = "cash")]
    pub payment_method: Option<String>,
    #[schema(example = 35.00)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub subtotal_amount: Decimal,
    #[schema(example = 2.45)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub tax_amount: Decimal,
    #[schema(example = 0.00)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub delivery_fee: Decimal,
    #[schema(example = 37.45)]
    #[serde(deserialize_with = "decimal::deserialize")]
    pub total_amount: Decimal,
    pub items: Vec<CreateOrderItemRequest>,
    /// 也可以通过 Idempotency-Key 请求头传入, 请求头优先
    pub idempotency_key: Option<String>,
}

impl CreateOrderRequest {
    /// 落库前的全部校验, 任何一项失败都不会触碰数据库
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        validate_required("Delivery address", &self.delivery_address, 500)?;

        let mut items_total = Decimal::ZERO;
        for item in &self.items {
            if item.quantity <= 0 || item.quantity > MAX_ITEM_QUANTITY {
                return Err(AppError::ValidationError(format!(
                    "Quantity for menu item {} must be between 1 and {MAX_ITEM_QUANTITY}",
                    item.menu_item_id
                )));
            }
            validate_money("Item price", item.price)?;
            items_total = item
                .line_total()
                .and_then(|line| items_total.checked_add(line))
                .filter(|total| *total <= MAX_MONEY)
                .ok_or_else(|| {
                    AppError::ValidationError(format!("Item total must not exceed {MAX_MONEY}"))
                })?;
        }

        validate_money("Subtotal", self.subtotal_amount)?;
        validate_money("Tax amount", self.tax_amount)?;
        validate_money("Delivery fee", self.delivery_fee)?;
        validate_money("Total amount", self.total_amount)?;

        if !amounts_match(self.subtotal_amount, items_total) {
            return Err(AppError::ValidationError(format!(
                "Subtotal {} does not match item total {}",
                self.subtotal_amount, items_total
            )));
        }

        let expected_total = self.expected_total();
        if !amounts_match(self.total_amount, expected_total) {
            return Err(AppError::ValidationError(format!(
                "Total {} does not match subtotal + tax + delivery fee ({})",
                self.total_amount, expected_total
            )));
        }

        if let Some(key) = &self.idempotency_key {
            validate_idempotency_key(key)?;
        }
        Ok(())
    }

    /// 各项金额已限制在 MAX_MONEY 以内, 相加不会溢出
    pub fn expected_total(&self) -> Decimal {
        self.subtotal_amount + self.tax_amount + self.delivery_fee
    }
}

impl CreateOrderItemRequest {
    /// 单价 x 数量, 溢出时为 None
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

pub fn validate_idempotency_key(key: &str) -> AppResult<()> {
    let key = key.trim();
    if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(AppError::ValidationError(format!(
            "Idempotency key must be 1 to {MAX_IDEMPOTENCY_KEY_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub order_number: String,
    pub user_id: i32,
    pub restaurant_id: i32,
    pub delivery_address: String,
    pub delivery_phone: Option<String>,
    pub delivery_notes: Option<String>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_number: m.order_number,
            user_id: m.user_id,
            restaurant_id: m.restaurant_id,
            delivery_address: m.delivery_address,
            delivery_phone: m.delivery_phone,
            delivery_notes: m.delivery_notes,
            subtotal: m.subtotal,
            delivery_fee: m.delivery_fee,
            tax_amount: m.tax_amount,
            discount_amount: m.discount_amount,
            total_amount: m.total_amount,
            order_status: m.order_status,
            payment_status: m.payment_status,
            payment_method: m.payment_method,
            created_at: m.created_at,
            updated_at: m.updated_at,
            delivered_at: m.delivered_at,
            cancelled_at: m.cancelled_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub menu_item_id: Option<i32>,
    pub item_name: String,
    pub item_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub special_instructions: Option<String>,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        Self {
            id: m.id,
            menu_item_id: m.menu_item_id,
            item_name: m.item_name,
            item_price: m.item_price,
            quantity: m.quantity,
            subtotal: m.subtotal,
            special_instructions: m.special_instructions,
        }
    }
}

/// 订单详情: 订单 + 明细 + 餐厅 + 下单用户
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub restaurant: Option<RestaurantSummary>,
    pub customer: Option<CustomerSummary>,
}

/// 列表项: 订单 + 餐厅名 + 件数
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummaryResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub restaurant_name: Option<String>,
    pub item_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummaryResponse>,
    pub pagination: OffsetPagination,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettleAction {
    Deliver,
    Cancel,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettleOrderRequest {
    pub action: SettleAction,
}

/// status 以字符串接收, 由服务端解析, 非法值返回 400 而不是反序列化错误
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    #[schema(example = "delivered")]
    pub status: String,
    pub user_id: Option<i32>,
}

impl UpdateOrderStatusRequest {
    pub fn parsed_status(&self) -> AppResult<OrderStatus> {
        self.status
            .trim()
            .parse::<OrderStatus>()
            .map_err(AppError::ValidationError)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OrderStatsResponse {
    pub total_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub active_orders: i64,
    pub total_spent: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(menu_item_id: i32, quantity: i32, price: Decimal) -> CreateOrderItemRequest {
        CreateOrderItemRequest {
            menu_item_id,
            quantity,
            price,
            special_instructions: None,
        }
    }

    fn sample_request() -> CreateOrderRequest {
        CreateOrderRequest {
            restaurant_id: 3,
            delivery_address: "221B Baker Street".into(),
            delivery_phone: None,
            delivery_notes: None,
            payment_method: None,
            subtotal_amount: Decimal::new(3500, 2),
            tax_amount: Decimal::new(245, 2),
            delivery_fee: Decimal::ZERO,
            total_amount: Decimal::new(3745, 2),
            items: vec![
                item(1, 2, Decimal::new(1299, 2)),
                item(2, 1, Decimal::new(902, 2)),
            ],
            idempotency_key: None,
        }
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_empty_items_rejected_first() {
        let mut req = sample_request();
        req.items.clear();
        req.total_amount = Decimal::new(-1, 0);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("at least one item"));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut req = sample_request();
        req.items[1].quantity = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_subtotal_mismatch_rejected() {
        let mut req = sample_request();
        req.subtotal_amount = Decimal::new(3600, 2);
        req.total_amount = Decimal::new(3845, 2);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Subtotal"));
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let mut req = sample_request();
        req.total_amount = Decimal::new(3800, 2);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Total"));
    }

    #[test]
    fn test_rounding_within_a_cent_is_accepted() {
        let mut req = sample_request();
        req.total_amount = Decimal::new(3746, 2);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_discount_field_is_not_accepted_into_total() {
        let json = r#"{
            "restaurantId": 3,
            "deliveryAddress": "221B Baker Street",
            "subtotalAmount": 35.00,
            "taxAmount": 2.45,
            "deliveryFee": 0,
            "discountAmount": 5.00,
            "totalAmount": 32.45,
            "items": [
                {"menuItemId": 1, "quantity": 2, "price": 12.99},
                {"menuItemId": 2, "quantity": 1, "price": 9.02}
            ]
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Total"));
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        let mut req = sample_request();
        req.items = vec![item(1, 10, Decimal::new(1005, 3))];
        req.subtotal_amount = Decimal::new(1005, 2);
        req.tax_amount = Decimal::ZERO;
        req.total_amount = Decimal::new(1005, 2);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("decimal places"));
    }

    #[test]
    fn test_huge_price_is_a_validation_error() {
        let mut req = sample_request();
        req.items = vec![item(1, 2, Decimal::MAX)];
        assert!(matches!(req.validate(), Err(AppError::ValidationError(_))));

        let json = r#"{
            "restaurantId": 3,
            "deliveryAddress": "221B Baker Street",
            "subtotalAmount": 0,
            "taxAmount": 0,
            "deliveryFee": 0,
            "totalAmount": 0,
            "items": [{"menuItemId": 1, "quantity": 2, "price": "79228162514264337593543950335"}]
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(req.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_item_total_above_column_limit_rejected() {
        let mut req = sample_request();
        req.items = vec![item(1, MAX_ITEM_QUANTITY, MAX_MONEY)];
        assert!(matches!(req.validate(), Err(AppError::ValidationError(_))));

        req.items = vec![item(1, MAX_ITEM_QUANTITY + 1, Decimal::ONE)];
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and"));
    }

    #[test]
    fn test_deserialize_camel_case_with_string_amounts() {
        let json = r#"{
            "restaurantId": 3,
            "deliveryAddress": "221B Baker Street",
            "subtotalAmount": "35.00",
            "taxAmount": 2.45,
            "deliveryFee": 0,
            "totalAmount": "37.45",
            "items": [
                {"menuItemId": 1, "quantity": 2, "price": 12.99},
                {"menuItemId": 2, "quantity": 1, "price": "9.02"}
            ]
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.items[0].price, Decimal::new(1299, 2));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_parse_force_status() {
        let req = UpdateOrderStatusRequest {
            status: "cancelled".into(),
            user_id: None,
        };
        assert_eq!(req.parsed_status().unwrap(), OrderStatus::Cancelled);

        let req = UpdateOrderStatusRequest {
            status: "shipped".into(),
            user_id: None,
        };
        assert!(req.parsed_status().is_err());
    }
}
