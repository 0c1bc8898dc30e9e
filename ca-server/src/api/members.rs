//! Board member routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /membros?gestao=&status= | GET | no |
//! | /membros/{id} | GET | no |
//! | /membros-gestoes | GET | no |
//! | /membros | POST | yes |
//! | /membros/{id} | PUT, DELETE | yes |
//! | /membros/reordenar | POST | yes |

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Member, MemberCreate, MemberQuery, MemberReorder, MemberStatus, MemberUpdate,
};

use super::{ApiResult, Message};
use crate::auth::require_auth;
use crate::db::members::{self, NewMember};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::media::{self, MAX_MEMBER_PHOTO_BYTES};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, require_text, validate_optional_text,
    validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/membros", get(list))
        .route("/membros/{id}", get(get_by_id))
        .route("/membros-gestoes", get(cohorts));

    let protected = Router::new()
        .route("/membros", post(create))
        .route("/membros/{id}", put(update).delete(remove))
        .route("/membros/reordenar", post(reorder))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MemberQuery>,
) -> ApiResult<Vec<Member>> {
    let rows = members::list(&state.pool, &query).await?;
    Ok(Json(rows.into_iter().map(Member::with_photo_url).collect()))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Member> {
    Ok(Json(members::find(&state.pool, id).await?.with_photo_url()))
}

/// Distinct board terms, newest first
pub async fn cohorts(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(members::cohorts(&state.pool).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MemberCreate>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let name = require_text(&payload.name, "nome", MAX_NAME_LEN)?;
    let role = require_text(&payload.role, "cargo", MAX_SHORT_TEXT_LEN)?;
    let area = require_text(&payload.area, "area", MAX_SHORT_TEXT_LEN)?;
    let description = require_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    let cohort = require_text(&payload.cohort, "gestao", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.contact, "contato", MAX_SHORT_TEXT_LEN)?;
    let photo = match payload.photo.as_deref() {
        Some(raw) if !raw.trim().is_empty() => media::parse_image(raw, MAX_MEMBER_PHOTO_BYTES)?,
        _ => {
            return Err(
                AppError::with_message(ErrorCode::RequiredField, "foto is required")
                    .with_detail("field", "foto"),
            );
        }
    };

    let member = members::create(
        &state.pool,
        NewMember {
            name: name.trim().to_string(),
            role: role.trim().to_string(),
            area: area.trim().to_string(),
            description: description.to_string(),
            contact: payload.contact.clone(),
            cohort: cohort.trim().to_string(),
            status: payload.status.unwrap_or(MemberStatus::Current),
            active: payload.active.unwrap_or(true),
            photo,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(member.with_photo_url())))
}

/// Partial update. A photo can be replaced but not removed.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MemberUpdate>,
) -> ApiResult<Member> {
    for (value, field, max) in [
        (&payload.name, "nome", MAX_NAME_LEN),
        (&payload.role, "cargo", MAX_SHORT_TEXT_LEN),
        (&payload.area, "area", MAX_SHORT_TEXT_LEN),
        (&payload.description, "descricao", MAX_NOTE_LEN),
        (&payload.cohort, "gestao", MAX_SHORT_TEXT_LEN),
    ] {
        if let Some(v) = value {
            validate_required_text(v, field, max)?;
        }
    }
    validate_optional_text(&payload.contact, "contato", MAX_SHORT_TEXT_LEN)?;
    let photo = media::parse_optional_image(payload.photo.as_deref(), MAX_MEMBER_PHOTO_BYTES)?
        .flatten();

    let member = members::update(&state.pool, id, &payload, photo).await?;
    Ok(Json(member.with_photo_url()))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    members::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MemberReorder>,
) -> ApiResult<Message> {
    members::reorder(&state.pool, &payload.member_ids).await?;
    Ok(Json(Message {
        message: "Membros reordenados com sucesso",
    }))
}
