use crate::entities::{menu_item_entity as menu_items, restaurant_entity as restaurants};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMenuItemRequest, MenuItemQuery, MenuItemResponse, PaginatedResponse, PaginationParams,
    UpdateMenuItemRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct MenuItemService {
    pool: DatabaseConnection,
}

impl MenuItemService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find_item(&self, id: i32) -> AppResult<menu_items::Model> {
        menu_items::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
    }

    pub async fn list_menu_items(
        &self,
        query: MenuItemQuery,
    ) -> AppResult<PaginatedResponse<MenuItemResponse>> {
        query.validate()?;
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = menu_items::Entity::find();
        if let Some(restaurant_id) = query.restaurant_id {
            select = select.filter(menu_items::Column::RestaurantId.eq(restaurant_id));
        }
        if let Some(category) = query.category.as_deref().map(str::trim)
            && !category.is_empty()
        {
            select = select.filter(menu_items::Column::Category.eq(category));
        }
        if let Some(available) = query.is_available {
            select = select.filter(menu_items::Column::IsAvailable.eq(available));
        }
        if let Some(featured) = query.is_featured {
            select = select.filter(menu_items::Column::IsFeatured.eq(featured));
        }
        if let Some(q) = query.q.as_deref().map(str::trim)
            && !q.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(menu_items::Column::Name.contains(q))
                    .add(menu_items::Column::Description.contains(q)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let items = select
            .order_by_desc(menu_items::Column::IsFeatured)
            .order_by_asc(menu_items::Column::Category)
            .order_by_asc(menu_items::Column::Name)
            .order_by_asc(menu_items::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_menu_item(&self, id: i32) -> AppResult<MenuItemResponse> {
        Ok(self.find_item(id).await?.into())
    }

    pub async fn create_menu_item(
        &self,
        request: CreateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        request.validate()?;

        restaurants::Entity::find_by_id(request.restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

        let item = menu_items::ActiveModel {
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price: Set(request.price),
            category: Set(request.category),
            image_url: Set(request.image_url),
            is_available: Set(request.is_available.unwrap_or(true)),
            is_featured: Set(request.is_featured.unwrap_or(false)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "menu item created: id={} restaurant_id={}",
            item.id,
            item.restaurant_id
        );
        Ok(item.into())
    }

    pub async fn update_menu_item(
        &self,
        id: i32,
        request: UpdateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        request.validate()?;
        let item = self.find_item(id).await?;

        let mut am = item.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            am.description = Set(Some(description));
        }
        if let Some(price) = request.price {
            am.price = Set(price);
        }
        if let Some(category) = request.category {
            am.category = Set(Some(category));
        }
        if let Some(image_url) = request.image_url {
            am.image_url = Set(Some(image_url));
        }
        if let Some(available) = request.is_available {
            am.is_available = Set(available);
        }
        if let Some(featured) = request.is_featured {
            am.is_featured = Set(featured);
        }

        Ok(am.update(&self.pool).await?.into())
    }

    /// 物理删除; 历史订单明细的 menu_item_id 由外键置空
    pub async fn delete_menu_item(&self, id: i32) -> AppResult<()> {
        let result = menu_items::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Menu item not found".to_string()));
        }
        log::info!("menu item deleted: id={id}");
        Ok(())
    }
}
