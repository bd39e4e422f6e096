use crate::entities::{
    FavoriteType, favorite_entity as favorites, menu_item_entity as menu_items,
    restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::models::{FavoriteRequest, FavoriteResponse, FavoriteStatusResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct FavoriteService {
    pool: DatabaseConnection,
}

impl FavoriteService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 收藏目标必须存在
    async fn ensure_target_exists(&self, favorite_type: FavoriteType, id: i32) -> AppResult<()> {
        let exists = match favorite_type {
            FavoriteType::Restaurant => restaurants::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .is_some(),
            FavoriteType::MenuItem => menu_items::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .is_some(),
        };
        if !exists {
            return Err(AppError::NotFound(match favorite_type {
                FavoriteType::Restaurant => "Restaurant not found".to_string(),
                FavoriteType::MenuItem => "Menu item not found".to_string(),
            }));
        }
        Ok(())
    }

    async fn find_favorite(
        &self,
        user_id: i32,
        favorite_type: FavoriteType,
        favorite_id: i32,
    ) -> AppResult<Option<favorites::Model>> {
        Ok(favorites::Entity::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::FavoriteType.eq(favorite_type))
            .filter(favorites::Column::FavoriteId.eq(favorite_id))
            .one(&self.pool)
            .await?)
    }

    pub async fn add_favorite(
        &self,
        user_id: i32,
        request: FavoriteRequest,
    ) -> AppResult<FavoriteResponse> {
        self.ensure_target_exists(request.favorite_type, request.favorite_id)
            .await?;

        if self
            .find_favorite(user_id, request.favorite_type, request.favorite_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already in favorites".to_string()));
        }

        let favorite = favorites::ActiveModel {
            user_id: Set(user_id),
            favorite_type: Set(request.favorite_type),
            favorite_id: Set(request.favorite_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Already in favorites"))?;

        Ok(favorite.into())
    }

    /// 收藏列表, 附带目标餐厅/菜品信息; 目标已被删除的条目照常返回
    pub async fn list_favorites(
        &self,
        user_id: i32,
        favorite_type: Option<FavoriteType>,
    ) -> AppResult<Vec<FavoriteResponse>> {
        let mut select = favorites::Entity::find().filter(favorites::Column::UserId.eq(user_id));
        if let Some(t) = favorite_type {
            select = select.filter(favorites::Column::FavoriteType.eq(t));
        }
        let rows = select
            .order_by_desc(favorites::Column::CreatedAt)
            .order_by_desc(favorites::Column::Id)
            .all(&self.pool)
            .await?;

        let restaurant_ids: Vec<i32> = rows
            .iter()
            .filter(|f| f.favorite_type == FavoriteType::Restaurant)
            .map(|f| f.favorite_id)
            .collect();
        let menu_item_ids: Vec<i32> = rows
            .iter()
            .filter(|f| f.favorite_type == FavoriteType::MenuItem)
            .map(|f| f.favorite_id)
            .collect();

        let mut restaurant_map: HashMap<i32, restaurants::Model> = HashMap::new();
        if !restaurant_ids.is_empty() {
            restaurant_map = restaurants::Entity::find()
                .filter(restaurants::Column::Id.is_in(restaurant_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect();
        }
        let mut menu_item_map: HashMap<i32, menu_items::Model> = HashMap::new();
        if !menu_item_ids.is_empty() {
            menu_item_map = menu_items::Entity::find()
                .filter(menu_items::Column::Id.is_in(menu_item_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect();
        }

        Ok(rows
            .into_iter()
            .map(|f| {
                let mut resp = FavoriteResponse::from(f);
                match resp.favorite_type {
                    FavoriteType::Restaurant => {
                        resp.restaurant = restaurant_map.remove(&resp.favorite_id).map(Into::into);
                    }
                    FavoriteType::MenuItem => {
                        resp.menu_item = menu_item_map.remove(&resp.favorite_id).map(Into::into);
                    }
                }
                resp
            })
            .collect())
    }

    pub async fn check_favorite(
        &self,
        user_id: i32,
        favorite_type: FavoriteType,
        favorite_id: i32,
    ) -> AppResult<FavoriteStatusResponse> {
        let is_favorite = self
            .find_favorite(user_id, favorite_type, favorite_id)
            .await?
            .is_some();
        Ok(FavoriteStatusResponse { is_favorite })
    }

    /// 切换收藏状态, 返回切换后的状态
    pub async fn toggle_favorite(
        &self,
        user_id: i32,
        request: FavoriteRequest,
    ) -> AppResult<FavoriteStatusResponse> {
        match self
            .find_favorite(user_id, request.favorite_type, request.favorite_id)
            .await?
        {
            Some(existing) => {
                favorites::Entity::delete_by_id(existing.id)
                    .exec(&self.pool)
                    .await?;
                Ok(FavoriteStatusResponse { is_favorite: false })
            }
            None => {
                self.add_favorite(user_id, request).await?;
                Ok(FavoriteStatusResponse { is_favorite: true })
            }
        }
    }

    pub async fn remove_favorite(&self, user_id: i32, favorite_id: i32) -> AppResult<()> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::Id.eq(favorite_id))
            .filter(favorites::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Favorite not found".to_string()));
        }
        Ok(())
    }

    pub async fn remove_favorite_by_target(
        &self,
        user_id: i32,
        favorite_type: FavoriteType,
        target_id: i32,
    ) -> AppResult<()> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::FavoriteType.eq(favorite_type))
            .filter(favorites::Column::FavoriteId.eq(target_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Favorite not found".to_string()));
        }
        Ok(())
    }
}
