//! Campaign project routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /projetos?gestao=&status= | GET | no |
//! | /projetos/{id} | GET | no |
//! | /projetos-gestoes | GET | no |
//! | /projetos | POST | yes |
//! | /projetos/{id} | PUT, DELETE | yes |
//! | /projetos/reordenar | POST | yes |

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{
    Project, ProjectCreate, ProjectQuery, ProjectReorder, ProjectStatus, ProjectUpdate,
};

use super::{ApiResult, Message};
use crate::auth::require_auth;
use crate::db::projects::{self, NewProject};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, require_text, validate_progress,
    validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/projetos", get(list))
        .route("/projetos/{id}", get(get_by_id))
        .route("/projetos-gestoes", get(cohorts));

    let protected = Router::new()
        .route("/projetos", post(create))
        .route("/projetos/{id}", put(update).delete(remove))
        .route("/projetos/reordenar", post(reorder))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProjectQuery>,
) -> ApiResult<Vec<Project>> {
    Ok(Json(projects::list(&state.pool, &query).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Project> {
    Ok(Json(projects::find(&state.pool, id).await?))
}

pub async fn cohorts(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(projects::cohorts(&state.pool).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProjectCreate>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let title = require_text(&payload.title, "titulo", MAX_NAME_LEN)?;
    let description = require_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    let cohort = require_text(&payload.cohort, "gestao", MAX_SHORT_TEXT_LEN)?;
    let progress = payload.progress.unwrap_or(0);
    validate_progress(progress)?;

    let project = projects::create(
        &state.pool,
        NewProject {
            title: title.trim().to_string(),
            description: description.to_string(),
            status: payload.status.unwrap_or(ProjectStatus::Planned),
            progress,
            cohort: cohort.trim().to_string(),
            active: payload.active.unwrap_or(true),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProjectUpdate>,
) -> ApiResult<Project> {
    for (value, field, max) in [
        (&payload.title, "titulo", MAX_NAME_LEN),
        (&payload.description, "descricao", MAX_NOTE_LEN),
        (&payload.cohort, "gestao", MAX_SHORT_TEXT_LEN),
    ] {
        if let Some(v) = value {
            validate_required_text(v, field, max)?;
        }
    }
    if let Some(progress) = payload.progress {
        validate_progress(progress)?;
    }

    Ok(Json(projects::update(&state.pool, id, &payload).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    projects::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProjectReorder>,
) -> ApiResult<Message> {
    projects::reorder(&state.pool, &payload.project_ids).await?;
    Ok(Json(Message {
        message: "Projetos reordenados com sucesso",
    }))
}
