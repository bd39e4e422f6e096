use crate::database::DbPool;
use crate::models::ApiResponse;
use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "服务与数据库正常"),
        (status = 503, description = "数据库不可用")
    )
)]
pub async fn health(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match pool.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(json!({
            "status": "ok",
            "database": "up",
        })))),
        Err(e) => {
            log::error!("health check failed: {e}");
            Ok(HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "message": "Database unavailable",
                "error": {"code": "DATABASE_ERROR", "message": "Database unavailable"},
            })))
        }
    }
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
