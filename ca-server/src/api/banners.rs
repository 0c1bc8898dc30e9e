//! Banner routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /banners | GET | no |
//! | /banners/ativos | GET | no |
//! | /banners/{id} | GET | no |
//! | /banners | POST | yes |
//! | /banners/{id} | PUT, DELETE | yes |
//! | /banners/reordenar | POST | yes |

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{Banner, BannerCreate, BannerReorder, BannerUpdate};

use super::{ApiResult, Success};
use crate::auth::require_auth;
use crate::db::banners;
use crate::extract::{ApiJson, ApiPath};
use crate::media::{self, MAX_BANNER_IMAGE_BYTES};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/banners", get(list))
        .route("/banners/ativos", get(list_active))
        .route("/banners/{id}", get(get_by_id));

    let protected = Router::new()
        .route("/banners", post(create))
        .route("/banners/{id}", axum::routing::put(update).delete(remove))
        .route("/banners/reordenar", post(reorder))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Banner>> {
    let banners = banners::list(&state.pool, false).await?;
    Ok(Json(banners.into_iter().map(Banner::with_image_url).collect()))
}

pub async fn list_active(State(state): State<AppState>) -> ApiResult<Vec<Banner>> {
    let banners = banners::list(&state.pool, true).await?;
    Ok(Json(banners.into_iter().map(Banner::with_image_url).collect()))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Banner> {
    let banner = banners::find(&state.pool, id).await?;
    Ok(Json(banner.with_image_url()))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BannerCreate>,
) -> Result<(StatusCode, Json<Banner>), AppError> {
    validate_required_text(&payload.title, "titulo", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.link, "link", MAX_URL_LEN)?;
    validate_optional_text(&payload.kind, "tipo", MAX_SHORT_TEXT_LEN)?;
    let image = media::parse_optional_image(payload.image.as_deref(), MAX_BANNER_IMAGE_BYTES)?
        .flatten();

    let banner = banners::create(&state.pool, &payload, image).await?;
    Ok((StatusCode::CREATED, Json(banner.with_image_url())))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BannerUpdate>,
) -> ApiResult<Banner> {
    if let Some(ref title) = payload.title {
        validate_required_text(title, "titulo", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.link, "link", MAX_URL_LEN)?;
    validate_optional_text(&payload.kind, "tipo", MAX_SHORT_TEXT_LEN)?;
    let image = media::parse_optional_image(payload.image.as_deref(), MAX_BANNER_IMAGE_BYTES)?;

    let banner = banners::update(&state.pool, id, &payload, image).await?;
    Ok(Json(banner.with_image_url()))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    banners::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BannerReorder>,
) -> ApiResult<Success> {
    banners::reorder(&state.pool, &payload.banner_ids).await?;
    Ok(Success::ok())
}
