use crate::entities::UserRole;
use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 通过认证的当前用户, 由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .copied()
                .ok_or_else(|| AppError::AuthError("Missing access token".to_string()).into()),
        )
    }
}

/// 仅管理员可用的接口使用此提取器
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().copied();
        ready(match user {
            Some(user) if user.is_admin() => Ok(AdminUser(user)),
            Some(_) => Err(AppError::Forbidden.into()),
            None => Err(AppError::AuthError("Missing access token".to_string()).into()),
        })
    }
}

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    // 仅 GET 请求公开的前缀 (浏览餐厅/菜单/评论)
    read_only_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/health",
                "/swagger-ui",
                "/api-docs/openapi.json",
                "/api/auth/register",
                "/api/auth/login",
                "/api/auth/refresh",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
            read_only_prefixes: vec![
                "/api/restaurants",
                "/api/menu-items",
                "/api/reviews/restaurant/",
            ],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }
        if self.prefix_paths.iter().any(|&prefix| path.starts_with(prefix)) {
            return true;
        }
        *method == Method::GET
            && self
                .read_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let is_public = self.public_paths.is_public(req.method(), req.path());

        let verified = bearer_token(&req).map(|token| self.jwt_service.verify_access_token(token));

        match verified {
            Some(Ok(claims)) => match claims.user_id() {
                Ok(id) => {
                    req.extensions_mut().insert(AuthUser {
                        id,
                        role: claims.role,
                    });
                    Box::pin(self.service.call(req))
                }
                Err(e) if !is_public => Box::pin(async move { Err(e.into()) }),
                Err(_) => Box::pin(self.service.call(req)),
            },
            // 公开路径上携带的无效令牌直接忽略
            _ if is_public => Box::pin(self.service.call(req)),
            Some(Err(_)) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::POST, "/api/auth/login"));
        assert!(paths.is_public(&Method::GET, "/api/restaurants/3"));
        assert!(paths.is_public(&Method::GET, "/api/reviews/restaurant/3/stats"));
        assert!(paths.is_public(&Method::GET, "/health"));

        assert!(!paths.is_public(&Method::POST, "/api/restaurants"));
        assert!(!paths.is_public(&Method::GET, "/api/orders/my-orders"));
        assert!(!paths.is_public(&Method::GET, "/api/reviews/my-reviews"));
        assert!(!paths.is_public(&Method::GET, "/api/auth/me"));
    }
}
