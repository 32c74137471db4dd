//! HTTP middleware for blog-service.
//!
//! `BearerAuth` validates JWTs minted by the external identity provider
//! and stashes the acting identity in request extensions. Authentication
//! is optional at the middleware layer; routes that require an identity
//! use the `AuthedUser` extractor, which bounces anonymous requests to
//! the login flow with a 302 instead of a 401.

pub mod permissions;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::metrics::HTTP_REQUESTS_TOTAL;

/// Claims carried by identity-provider tokens.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    #[allow(dead_code)]
    exp: usize,
}

/// The acting identity extracted from a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub username: String,
}

/// Optional acting identity for routes that render differently for
/// authenticated viewers but stay public.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthedUser>);

/// Actix middleware that validates a Bearer token when one is present.
pub struct BearerAuth {
    key: Arc<DecodingKey>,
}

impl BearerAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
            key: self.key.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    key: Arc<DecodingKey>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let key = self.key.clone();

        Box::pin(async move {
            if let Some(user) = authenticate(&req, &key) {
                req.extensions_mut().insert(user);
            }
            service.call(req).await
        })
    }
}

fn authenticate(req: &ServiceRequest, key: &DecodingKey) -> Option<AuthedUser> {
    let auth_header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;

    let claims = match decode::<Claims>(token, key, &Validation::new(Algorithm::HS256)) {
        Ok(data) => data.claims,
        Err(err) => {
            tracing::debug!("rejected bearer token: {}", err);
            return None;
        }
    };

    let id = Uuid::parse_str(&claims.sub).ok()?;
    Some(AuthedUser {
        id,
        username: claims.username,
    })
}

/// Build the login redirect target for an anonymous request.
fn login_redirect(req: &HttpRequest) -> AppError {
    let login_url = req
        .app_data::<web::Data<Config>>()
        .map(|cfg| cfg.auth.login_url.clone())
        .unwrap_or_else(|| "/auth/login".to_string());

    AppError::LoginRequired(format!("{}?next={}", login_url, req.path()))
}

impl FromRequest for AuthedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthedUser>().cloned();
        ready(match user {
            Some(user) => Ok(user),
            None => Err(login_redirect(req).into()),
        })
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeUser(req.extensions().get::<AuthedUser>().cloned())))
    }
}

// =====================================================================
// Request metrics
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let start = std::time::Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            let status = match &res {
                Ok(resp) => resp.status().as_u16().to_string(),
                Err(err) => err.as_response_error().status_code().as_u16().to_string(),
            };
            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &status])
                .inc();
            tracing::debug!(%method, %path, %status, %elapsed, "request completed");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App, HttpResponse};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    async fn needs_auth(user: AuthedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "username": user.username }))
    }

    async fn public(viewer: MaybeUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "authenticated": viewer.0.is_some(),
        }))
    }

    fn test_config() -> Config {
        std::env::remove_var("APP_ENV");
        let mut config = Config::from_env().unwrap();
        config.auth.jwt_secret = SECRET.to_string();
        config.auth.login_url = "/auth/login".to_string();
        config
    }

    fn mint_token(sub: &str, username: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let claims = serde_json::json!({
            "sub": sub,
            "username": username,
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn anonymous_request_to_protected_route_redirects_to_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .wrap(BearerAuth::new(SECRET))
                .route("/follow", web::get().to(needs_auth)),
        )
        .await;

        let req = test::TestRequest::get().uri("/follow").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(location, "/auth/login?next=/follow");
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .wrap(BearerAuth::new(SECRET))
                .route("/follow", web::get().to(needs_auth)),
        )
        .await;

        let token = mint_token(&Uuid::new_v4().to_string(), "leo");
        let req = test::TestRequest::get()
            .uri("/follow")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn garbage_token_is_treated_as_anonymous_on_public_routes() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .wrap(BearerAuth::new(SECRET))
                .route("/leo", web::get().to(public)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/leo")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["authenticated"], false);
    }
}
