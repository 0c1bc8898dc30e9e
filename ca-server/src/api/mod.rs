//! HTTP API
//!
//! Reads are public. Every mutating route, and the finance routes that are
//! not part of the transparency pages, sit behind [`require_auth`].
//!
//! [`require_auth`]: crate::auth::require_auth

pub mod banners;
pub mod finance;
pub mod health;
pub mod members;
pub mod notices;
pub mod products;
pub mod projects;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderValue, Method, header};
use serde::Serialize;
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Inline base64 images make bodies large; the per-image limits in
/// [`crate::media`] are enforced after parsing
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// `{ "message": "..." }`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `{ "id": ..., "message": "..." }` returned by finance creates
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
    pub message: &'static str,
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the application with every route, middleware and the state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(banners::router(&state))
        .merge(products::router(&state))
        .merge(members::router(&state))
        .merge(projects::router(&state))
        .merge(notices::router(&state))
        .merge(finance::router(&state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(XRequestId))
        .layer(cors_layer(&state.allowed_origins))
        .with_state(state)
}

/// CORS from the configured allow-list; `*` allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_token;
    use crate::config::Config;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    /// Router over a lazy pool: nothing connects until a handler queries
    fn app() -> Router {
        let config = Config {
            database_url: "postgres://ca:ca@127.0.0.1:1/ca".to_string(),
            http_port: 0,
            environment: "development".to_string(),
            jwt_secret: SECRET.to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            db_max_connections: 1,
            log_dir: None,
        };
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .unwrap();
        create_router(AppState::with_pool(pool, &config))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bearer() -> String {
        format!("Bearer {}", create_token(7, SECRET).unwrap())
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "ca-server");
    }

    #[tokio::test]
    async fn mutating_routes_require_a_token() {
        for (method, uri) in [
            ("POST", "/banners"),
            ("POST", "/banners/reordenar"),
            ("POST", "/produtos/1/reordenar-imagens"),
            ("POST", "/membros/reordenar"),
            ("POST", "/projetos/reordenar"),
            ("PUT", "/financeiro/metas/1/concluir"),
            ("GET", "/financeiro/metas/progresso/ca"),
            ("GET", "/financeiro/ca"),
        ] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            let json = body_json(response).await;
            assert_eq!(json["code"], 1001, "{method} {uri}");
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn bad_token_is_rejected() {
        let response = app()
            .oneshot(
                Request::post("/banners/reordenar")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"bannerIds":[1]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], 1004);
    }

    #[tokio::test]
    async fn reorder_body_must_hold_an_array() {
        let response = app()
            .oneshot(
                Request::post("/banners/reordenar")
                    .header(header::AUTHORIZATION, bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"bannerIds":"1,2"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error() {
        let response = app()
            .oneshot(
                Request::post("/membros/reordenar")
                    .header(header::AUTHORIZATION, bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 6);
    }

    #[tokio::test]
    async fn unknown_fund_is_rejected_before_the_database() {
        let response = app()
            .oneshot(
                Request::get("/financeiro/metas/progresso/cofre")
                    .header(header::AUTHORIZATION, bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 5005);
    }

    #[tokio::test]
    async fn invalid_month_is_rejected_before_the_database() {
        let response = app()
            .oneshot(
                Request::get("/financeiro/ca/relatorio/13/2024")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], 8);
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/banners")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }
}
