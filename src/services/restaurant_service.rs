use crate::entities::{menu_item_entity as menu_items, restaurant_entity as restaurants};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRestaurantRequest, PaginatedResponse, PaginationParams, RestaurantDetailResponse,
    RestaurantQuery, RestaurantResponse, UpdateRestaurantRequest,
};
use crate::services::review_service::{rating_stats, rating_summaries};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct RestaurantService {
    pool: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find_restaurant(&self, id: i32) -> AppResult<restaurants::Model> {
        restaurants::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))
    }

    /// 餐厅列表, 默认只返回营业中的餐厅; 评分通过一次分组查询补齐
    pub async fn list_restaurants(
        &self,
        query: RestaurantQuery,
    ) -> AppResult<PaginatedResponse<RestaurantResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = restaurants::Entity::find()
            .filter(restaurants::Column::IsActive.eq(query.is_active.unwrap_or(true)));

        if let Some(cuisine) = query.cuisine_type.as_deref().map(str::trim)
            && !cuisine.is_empty()
        {
            select = select.filter(restaurants::Column::CuisineType.eq(cuisine));
        }
        if let Some(q) = query.q.as_deref().map(str::trim)
            && !q.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(restaurants::Column::Name.contains(q))
                    .add(restaurants::Column::Description.contains(q))
                    .add(restaurants::Column::CuisineType.contains(q)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let models = select
            .order_by_asc(restaurants::Column::Name)
            .order_by_asc(restaurants::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let ratings = rating_summaries(&self.pool, &ids).await?;

        let items = models
            .into_iter()
            .map(|m| match ratings.get(&m.id) {
                Some((avg, count)) => RestaurantResponse::with_rating(m, *avg, *count),
                None => RestaurantResponse::from(m),
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 餐厅详情 (含评分统计), 已下架的餐厅视为不存在
    pub async fn get_restaurant(&self, id: i32) -> AppResult<RestaurantDetailResponse> {
        let restaurant = self.find_restaurant(id).await?;
        if !restaurant.is_active {
            return Err(AppError::NotFound("Restaurant not found".to_string()));
        }

        let stats = rating_stats(&self.pool, id).await?;
        Ok(RestaurantDetailResponse {
            restaurant: RestaurantResponse::with_rating(
                restaurant,
                stats.average_rating,
                stats.review_count,
            ),
            rating_stats: stats,
        })
    }

    /// 餐厅菜单分类 (去重, 按字母序)
    pub async fn list_categories(&self, id: i32) -> AppResult<Vec<String>> {
        self.find_restaurant(id).await?;

        let categories: Vec<Option<String>> = menu_items::Entity::find()
            .select_only()
            .column(menu_items::Column::Category)
            .filter(menu_items::Column::RestaurantId.eq(id))
            .filter(menu_items::Column::Category.is_not_null())
            .distinct()
            .order_by_asc(menu_items::Column::Category)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(categories.into_iter().flatten().collect())
    }

    pub async fn create_restaurant(
        &self,
        request: CreateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        request.validate()?;

        let restaurant = restaurants::ActiveModel {
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            cuisine_type: Set(request.cuisine_type),
            address: Set(request.address.trim().to_string()),
            phone: Set(request.phone),
            image_url: Set(request.image_url),
            delivery_time: Set(request.delivery_time),
            delivery_fee: Set(request.delivery_fee),
            minimum_order: Set(request.minimum_order),
            is_active: Set(request.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("restaurant created: id={} name={}", restaurant.id, restaurant.name);
        Ok(restaurant.into())
    }

    pub async fn update_restaurant(
        &self,
        id: i32,
        request: UpdateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        request.validate()?;
        let restaurant = self.find_restaurant(id).await?;

        let mut am = restaurant.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            am.description = Set(Some(description));
        }
        if let Some(cuisine_type) = request.cuisine_type {
            am.cuisine_type = Set(Some(cuisine_type));
        }
        if let Some(address) = request.address {
            am.address = Set(address.trim().to_string());
        }
        if let Some(phone) = request.phone {
            am.phone = Set(Some(phone));
        }
        if let Some(image_url) = request.image_url {
            am.image_url = Set(Some(image_url));
        }
        if let Some(delivery_time) = request.delivery_time {
            am.delivery_time = Set(Some(delivery_time));
        }
        if let Some(fee) = request.delivery_fee {
            am.delivery_fee = Set(fee);
        }
        if let Some(min) = request.minimum_order {
            am.minimum_order = Set(min);
        }
        if let Some(active) = request.is_active {
            am.is_active = Set(active);
        }

        let updated = am.update(&self.pool).await?;
        let ratings = rating_summaries(&self.pool, &[updated.id]).await?;
        Ok(match ratings.get(&updated.id) {
            Some((avg, count)) => RestaurantResponse::with_rating(updated, *avg, *count),
            None => RestaurantResponse::from(updated),
        })
    }

    /// 软删除: 订单引用餐厅, 只做下架
    pub async fn delete_restaurant(&self, id: i32) -> AppResult<()> {
        let restaurant = self.find_restaurant(id).await?;
        if !restaurant.is_active {
            return Ok(());
        }

        let mut am = restaurant.into_active_model();
        am.is_active = Set(false);
        am.update(&self.pool).await?;

        log::info!("restaurant deactivated: id={id}");
        Ok(())
    }
}
