use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户资料成功", body = UserResponse),
        (status = 401, description = "未授权", body = ApiErrorResponse),
        (status = 404, description = "用户不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match user_service.get_profile(user.id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(profile))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "user",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新用户资料成功", body = UserResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse)
    )
)]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    user: AuthUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    match user_service
        .update_profile(user.id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            profile,
            "Profile updated",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/users/password",
    tag = "user",
    request_body = ChangePasswordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "密码已修改"),
        (status = 401, description = "当前密码错误", body = ApiErrorResponse)
    )
)]
pub async fn change_password(
    user_service: web::Data<UserService>,
    user: AuthUser,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    match user_service
        .change_password(user.id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/password", web::put().to(change_password)),
    );
}
