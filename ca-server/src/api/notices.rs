//! Announcement (avisos) routes

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{Notice, NoticeCreate, NoticeUpdate};

use super::ApiResult;
use crate::auth::require_auth;
use crate::db::notices;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/avisos", get(list))
        .route("/avisos/ativos", get(list_active))
        .route("/avisos/{id}", get(get_by_id));

    let protected = Router::new()
        .route("/avisos", post(create))
        .route("/avisos/{id}", put(update).delete(remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Notice>> {
    Ok(Json(notices::list(&state.pool).await?))
}

/// Notices whose window contains today's local date
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Vec<Notice>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(notices::list_active(&state.pool, today).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Notice> {
    Ok(Json(notices::find(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NoticeCreate>,
) -> Result<(StatusCode, Json<Notice>), AppError> {
    validate_required_text(&payload.title, "titulo", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.link, "link", MAX_URL_LEN)?;
    notices::validate_window(payload.start_date, payload.end_date)?;

    let notice = notices::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NoticeUpdate>,
) -> ApiResult<Notice> {
    if let Some(ref title) = payload.title {
        validate_required_text(title, "titulo", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.link, "link", MAX_URL_LEN)?;

    Ok(Json(notices::update(&state.pool, id, &payload).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    notices::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
