use crate::config::OrderConfig;
use crate::entities::{
    OrderStatus, PaymentStatus, menu_item_entity as menu_items, order_entity as orders,
    order_item_entity as order_items, restaurant_entity as restaurants, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, DEFAULT_PAYMENT_METHOD, OffsetPagination, OrderDetailResponse,
    OrderItemResponse, OrderListQuery, OrderListResponse, OrderResponse, OrderStatsResponse,
    OrderSummaryResponse, SettleAction, UpdateOrderStatusRequest, validate_idempotency_key,
};
use crate::utils::generate_order_number;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Debug, FromQueryResult)]
struct OrderStatsRow {
    total_orders: i64,
    completed_orders: i64,
    cancelled_orders: i64,
    active_orders: i64,
    total_spent: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct ItemCountRow {
    order_id: i32,
    item_count: i64,
}

/// create_order 的结果: 新建或幂等重放
#[derive(Debug)]
pub struct CreatedOrder {
    pub order: OrderDetailResponse,
    pub created: bool,
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    config: OrderConfig,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, config: OrderConfig) -> Self {
        Self { pool, config }
    }

    /// 创建订单
    ///
    /// 1. 校验请求 (失败时不触碰数据库)
    /// 2. 幂等键命中且在窗口内时直接返回已有订单
    /// 3. 校验餐厅与菜品归属
    /// 4. 单个事务内写入 orders + order_items, 任一步失败整体回滚
    pub async fn create_order(
        &self,
        user_id: i32,
        request: CreateOrderRequest,
        idempotency_header: Option<String>,
    ) -> AppResult<CreatedOrder> {
        request.validate()?;

        let idempotency_key = match idempotency_header.or_else(|| request.idempotency_key.clone()) {
            Some(key) => {
                validate_idempotency_key(&key)?;
                Some(key.trim().to_string())
            }
            None => None,
        };

        if let Some(key) = &idempotency_key
            && let Some(existing) = self.find_by_idempotency_key(user_id, key).await?
        {
            return Ok(CreatedOrder {
                order: existing,
                created: false,
            });
        }

        let restaurant = restaurants::Entity::find_by_id(request.restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;
        if !restaurant.is_active {
            return Err(AppError::BusinessRule(
                "Restaurant is not accepting orders".to_string(),
            ));
        }

        let menu_item_ids: Vec<i32> = request.items.iter().map(|i| i.menu_item_id).collect();
        let menu: HashMap<i32, menu_items::Model> = menu_items::Entity::find()
            .filter(menu_items::Column::Id.is_in(menu_item_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        for item in &request.items {
            match menu.get(&item.menu_item_id) {
                Some(m) if m.restaurant_id == restaurant.id => {
                    if !m.is_available {
                        return Err(AppError::BusinessRule(format!(
                            "Menu item '{}' is currently unavailable",
                            m.name
                        )));
                    }
                }
                _ => {
                    return Err(AppError::ValidationError(format!(
                        "Menu item {} does not belong to this restaurant",
                        item.menu_item_id
                    )));
                }
            }
        }

        self.persist_order(user_id, &request, idempotency_key, &restaurant, &menu)
            .await
    }

    /// 单个事务内写入 orders + order_items; 幂等键唯一索引冲突时回滚并返回已有订单
    async fn persist_order(
        &self,
        user_id: i32,
        request: &CreateOrderRequest,
        idempotency_key: Option<String>,
        restaurant: &restaurants::Model,
        menu: &HashMap<i32, menu_items::Model>,
    ) -> AppResult<CreatedOrder> {
        // insert_many 不经过 before_save, created_at 显式写入
        let now = Utc::now();
        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let subtotal = item.line_total().ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Line total for menu item {} is out of range",
                    item.menu_item_id
                ))
            })?;
            let name = menu
                .get(&item.menu_item_id)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            lines.push(order_items::ActiveModel {
                menu_item_id: Set(Some(item.menu_item_id)),
                item_name: Set(name),
                item_price: Set(item.price),
                quantity: Set(item.quantity),
                subtotal: Set(subtotal),
                special_instructions: Set(item.special_instructions.clone()),
                created_at: Set(now),
                ..Default::default()
            });
        }

        let payment_method = request
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_METHOD)
            .to_string();

        let txn = self.pool.begin().await?;

        let inserted = orders::ActiveModel {
            order_number: Set(generate_order_number()),
            user_id: Set(user_id),
            restaurant_id: Set(restaurant.id),
            delivery_address: Set(request.delivery_address.trim().to_string()),
            delivery_phone: Set(request.delivery_phone.clone()),
            delivery_notes: Set(request.delivery_notes.clone()),
            subtotal: Set(request.subtotal_amount),
            delivery_fee: Set(request.delivery_fee),
            tax_amount: Set(request.tax_amount),
            discount_amount: Set(Decimal::ZERO),
            total_amount: Set(request.total_amount),
            order_status: Set(OrderStatus::Preparing),
            payment_status: Set(PaymentStatus::Pending),
            payment_method: Set(payment_method),
            idempotency_key: Set(idempotency_key.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let order = match inserted {
            Ok(order) => order,
            Err(err) => {
                // 并发重试抢先写入了同一幂等键: 回滚后返回那一笔
                if let (Some(key), Some(SqlErr::UniqueConstraintViolation(_))) =
                    (&idempotency_key, err.sql_err())
                {
                    txn.rollback().await?;
                    if let Some(existing) = self.find_by_idempotency_key(user_id, key).await? {
                        return Ok(CreatedOrder {
                            order: existing,
                            created: false,
                        });
                    }
                }
                return Err(err.into());
            }
        };

        for line in &mut lines {
            line.order_id = Set(order.id);
        }
        order_items::Entity::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;

        log::info!(
            "order created: id={} number={} user_id={} restaurant_id={} total={}",
            order.id,
            order.order_number,
            user_id,
            order.restaurant_id,
            order.total_amount
        );

        Ok(CreatedOrder {
            order: self.load_detail(order).await?,
            created: true,
        })
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> AppResult<Option<OrderDetailResponse>> {
        let existing = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::IdempotencyKey.eq(key))
            .one(&self.pool)
            .await?;

        let Some(order) = existing else {
            return Ok(None);
        };

        let window_start = Utc::now() - Duration::seconds(self.config.idempotency_window_secs);
        if order.created_at < window_start {
            log::warn!("expired idempotency key reused: user_id={user_id} order_id={}", order.id);
            return Err(AppError::Conflict(
                "Idempotency key has already been used".to_string(),
            ));
        }

        log::info!("idempotent replay: user_id={user_id} order_id={}", order.id);
        Ok(Some(self.load_detail(order).await?))
    }

    /// 订单详情: 订单 + 明细 + 餐厅 + 下单用户
    async fn load_detail(&self, order: orders::Model) -> AppResult<OrderDetailResponse> {
        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .order_by_asc(order_items::Column::Id)
            .all(&self.pool)
            .await?;
        let restaurant = restaurants::Entity::find_by_id(order.restaurant_id)
            .one(&self.pool)
            .await?;
        let customer = users::Entity::find_by_id(order.user_id)
            .one(&self.pool)
            .await?;

        Ok(OrderDetailResponse {
            order: OrderResponse::from(order),
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            restaurant: restaurant.map(Into::into),
            customer: customer.map(Into::into),
        })
    }

    /// 获取订单详情, 只能查看自己的订单
    pub async fn get_order(&self, user_id: i32, order_id: i32) -> AppResult<OrderDetailResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        self.load_detail(order).await
    }

    pub async fn get_user_orders(
        &self,
        user_id: i32,
        query: &OrderListQuery,
    ) -> AppResult<OrderListResponse> {
        self.list_orders(Some(user_id), query).await
    }

    /// 管理员查看全部订单
    pub async fn list_all_orders(&self, query: &OrderListQuery) -> AppResult<OrderListResponse> {
        self.list_orders(None, query).await
    }

    async fn list_orders(
        &self,
        user_id: Option<i32>,
        query: &OrderListQuery,
    ) -> AppResult<OrderListResponse> {
        let (limit, offset) = OffsetPagination::normalize(query.limit, query.offset);

        let mut select = orders::Entity::find();
        if let Some(user_id) = user_id {
            select = select.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(orders::Column::OrderStatus.eq(status));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .find_also_related(restaurants::Entity)
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.pool)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|(o, _)| o.id).collect();
        let counts: HashMap<i32, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            order_items::Entity::find()
                .filter(order_items::Column::OrderId.is_in(ids))
                .select_only()
                .column(order_items::Column::OrderId)
                .column_as(Expr::cust("COUNT(*)"), "item_count")
                .group_by(order_items::Column::OrderId)
                .into_model::<ItemCountRow>()
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|r| (r.order_id, r.item_count))
                .collect()
        };

        let orders = rows
            .into_iter()
            .map(|(order, restaurant)| OrderSummaryResponse {
                item_count: counts.get(&order.id).copied().unwrap_or(0),
                restaurant_name: restaurant.map(|r| r.name),
                order: order.into(),
            })
            .collect();

        Ok(OrderListResponse {
            orders,
            pagination: OffsetPagination::new(total, limit, offset),
        })
    }

    /// 用户取消订单: 仅 preparing 状态可取消
    pub async fn cancel_order(&self, user_id: i32, order_id: i32) -> AppResult<OrderDetailResponse> {
        let now = Utc::now();
        let result = orders::Entity::update_many()
            .set(orders::ActiveModel {
                order_status: Set(OrderStatus::Cancelled),
                cancelled_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(orders::Column::Id.eq(order_id))
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::OrderStatus.eq(OrderStatus::Preparing))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(self
                .explain_rejected_transition(user_id, order_id, "Order cannot be cancelled")
                .await);
        }

        log::info!("order cancelled: id={order_id} user_id={user_id}");
        self.get_order(user_id, order_id).await
    }

    /// 结算 (pay): deliver -> delivered + paid, cancel -> cancelled + failed
    pub async fn settle_order(
        &self,
        user_id: i32,
        order_id: i32,
        action: SettleAction,
    ) -> AppResult<OrderDetailResponse> {
        let now = Utc::now();
        let update = match action {
            SettleAction::Deliver => orders::ActiveModel {
                order_status: Set(OrderStatus::Delivered),
                payment_status: Set(PaymentStatus::Paid),
                delivered_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            },
            SettleAction::Cancel => orders::ActiveModel {
                order_status: Set(OrderStatus::Cancelled),
                payment_status: Set(PaymentStatus::Failed),
                cancelled_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            },
        };

        let result = orders::Entity::update_many()
            .set(update)
            .filter(orders::Column::Id.eq(order_id))
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::OrderStatus.eq(OrderStatus::Preparing))
            .filter(orders::Column::PaymentStatus.eq(PaymentStatus::Pending))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(self
                .explain_rejected_transition(user_id, order_id, "Order cannot be settled")
                .await);
        }

        log::info!("order settled: id={order_id} user_id={user_id} action={action:?}");
        self.get_order(user_id, order_id).await
    }

    /// 条件更新没有命中时重新读取, 区分 "不存在/不属于本人" 与 "状态不允许"
    async fn explain_rejected_transition(
        &self,
        user_id: i32,
        order_id: i32,
        message: &str,
    ) -> AppError {
        let found = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await;

        match found {
            Ok(Some(order)) => {
                log::warn!(
                    "rejected transition: order_id={order_id} status={} payment={}",
                    order.order_status,
                    order.payment_status
                );
                AppError::BusinessRule(message.to_string())
            }
            Ok(None) => AppError::NotFound("Order not found".to_string()),
            Err(e) => e.into(),
        }
    }

    /// 管理员强制修改状态; 指定 userId 时只作用于该用户的订单
    pub async fn update_order_status(
        &self,
        order_id: i32,
        request: UpdateOrderStatusRequest,
    ) -> AppResult<OrderDetailResponse> {
        let status = request.parsed_status()?;

        let mut select = orders::Entity::find_by_id(order_id);
        if let Some(user_id) = request.user_id {
            select = select.filter(orders::Column::UserId.eq(user_id));
        }
        let order = select
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let now = Utc::now();
        let mut update = orders::ActiveModel {
            order_status: Set(status),
            updated_at: Set(now),
            ..Default::default()
        };
        match status {
            OrderStatus::Delivered => update.delivered_at = Set(Some(now)),
            OrderStatus::Cancelled => update.cancelled_at = Set(Some(now)),
            OrderStatus::Preparing => {}
        }

        orders::Entity::update_many()
            .set(update)
            .filter(orders::Column::Id.eq(order.id))
            .exec(&self.pool)
            .await?;

        log::info!(
            "order status forced: id={} {} -> {}",
            order.id,
            order.order_status,
            status
        );

        let updated = orders::Entity::find_by_id(order.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        self.load_detail(updated).await
    }

    /// 用户订单统计 (条件聚合)
    pub async fn get_user_stats(&self, user_id: i32) -> AppResult<OrderStatsResponse> {
        let row = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .select_only()
            .column_as(Expr::cust("COUNT(*)"), "total_orders")
            .column_as(
                Expr::cust("COUNT(CASE WHEN order_status = 'delivered' THEN 1 END)"),
                "completed_orders",
            )
            .column_as(
                Expr::cust("COUNT(CASE WHEN order_status = 'cancelled' THEN 1 END)"),
                "cancelled_orders",
            )
            .column_as(
                Expr::cust("COUNT(CASE WHEN order_status = 'preparing' THEN 1 END)"),
                "active_orders",
            )
            .column_as(
                Expr::cust("SUM(CASE WHEN order_status = 'delivered' THEN total_amount END)"),
                "total_spent",
            )
            .into_model::<OrderStatsRow>()
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::DatabaseError(DbErr::RecordNotFound("order stats".into())))?;

        Ok(OrderStatsResponse {
            total_orders: row.total_orders,
            completed_orders: row.completed_orders,
            cancelled_orders: row.cancelled_orders,
            active_orders: row.active_orders,
            total_spent: row.total_spent.unwrap_or_default().round_dp(2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::models::CreateOrderItemRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn setup() -> (OrderService, restaurants::Model, HashMap<i32, menu_items::Model>, i32) {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let user = users::ActiveModel {
            name: Set("Alice".to_string()),
            email: Set("alice@example.com".to_string()),
            password_hash: Set("x".to_string()),
            role: Set(UserRole::Customer),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let restaurant = restaurants::ActiveModel {
            name: Set("Luigi's".to_string()),
            address: Set("1 Market Street".to_string()),
            delivery_fee: Set(Decimal::ZERO),
            minimum_order: Set(Decimal::ZERO),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let pizza = menu_items::ActiveModel {
            restaurant_id: Set(restaurant.id),
            name: Set("Margherita".to_string()),
            price: Set(Decimal::new(1299, 2)),
            is_available: Set(true),
            is_featured: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let menu = HashMap::from([(pizza.id, pizza)]);
        let service = OrderService::new(db, OrderConfig::default());
        (service, restaurant, menu, user.id)
    }

    fn request(restaurant_id: i32, menu_item_id: i32) -> CreateOrderRequest {
        CreateOrderRequest {
            restaurant_id,
            delivery_address: "221B Baker Street".to_string(),
            delivery_phone: None,
            delivery_notes: None,
            payment_method: None,
            subtotal_amount: Decimal::new(2598, 2),
            tax_amount: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total_amount: Decimal::new(2598, 2),
            items: vec![CreateOrderItemRequest {
                menu_item_id,
                quantity: 2,
                price: Decimal::new(1299, 2),
                special_instructions: None,
            }],
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_key_returns_committed_order() {
        let (service, restaurant, menu, user_id) = setup().await;
        let menu_item_id = *menu.keys().next().unwrap();
        let req = request(restaurant.id, menu_item_id);

        // 另一个请求已经用同一幂等键提交
        let winner = service
            .persist_order(user_id, &req, Some("dup".to_string()), &restaurant, &menu)
            .await
            .unwrap();
        assert!(winner.created);

        // 本请求错过了事务前的查重, 直接撞上唯一索引
        let loser = service
            .persist_order(user_id, &req, Some("dup".to_string()), &restaurant, &menu)
            .await
            .unwrap();
        assert!(!loser.created);
        assert_eq!(loser.order.order.id, winner.order.order.id);

        assert_eq!(orders::Entity::find().count(&service.pool).await.unwrap(), 1);
        assert_eq!(
            order_items::Entity::find().count(&service.pool).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_persisted_line_subtotals_sum_to_order_total() {
        let (service, restaurant, menu, user_id) = setup().await;
        let menu_item_id = *menu.keys().next().unwrap();
        let mut req = request(restaurant.id, menu_item_id);
        req.tax_amount = Decimal::new(182, 2);
        req.delivery_fee = Decimal::new(299, 2);
        req.total_amount = Decimal::new(3079, 2);

        let created = service
            .persist_order(user_id, &req, None, &restaurant, &menu)
            .await
            .unwrap();
        let order = created.order.order;
        let lines: Decimal = created.order.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(lines.round_dp(2), order.subtotal.round_dp(2));
        assert_eq!(
            (lines + order.tax_amount + order.delivery_fee).round_dp(2),
            order.total_amount.round_dp(2)
        );
        assert_eq!(order.discount_amount, Decimal::ZERO);
    }
}
