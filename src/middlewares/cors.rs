use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        // 移动端与本地调试均可访问
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allow_any_header()
        .expose_headers(vec!["Idempotency-Key"])
        .max_age(3600)
}
