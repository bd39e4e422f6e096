use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::{ChangePasswordRequest, UpdateProfileRequest, UserResponse};
use crate::utils::{hash_password, validate_password, verify_password};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find_user(&self, user_id: i32) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<UserResponse> {
        Ok(self.find_user(user_id).await?.into())
    }

    /// 更新用户资料, 只修改传入的字段
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        request.validate()?;
        let user = self.find_user(user_id).await?;

        let mut am = user.into_active_model();
        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(phone) = request.phone {
            am.phone = Set(Some(phone));
        }
        if let Some(address) = request.address {
            am.address = Set(Some(address));
        }
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn change_password(
        &self,
        user_id: i32,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        validate_password(&request.new_password)?;
        let user = self.find_user(user_id).await?;

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut am = user.into_active_model();
        am.password_hash = Set(hash_password(&request.new_password)?);
        am.update(&self.pool).await?;

        log::info!("password changed: user_id={user_id}");
        Ok(())
    }
}
