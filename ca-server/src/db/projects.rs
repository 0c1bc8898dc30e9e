//! Campaign project repository
//!
//! Projects are ordered within their board term, like members.

use shared::error::ErrorCode;
use shared::models::{Project, ProjectQuery, ProjectStatus, ProjectUpdate};
use sqlx::PgPool;

use super::{lock_keys, not_found};
use crate::error::ServiceResult;
use crate::ordering::{self, OrderedCollection, ReorderPlan, Scope};

pub struct Projects;

impl OrderedCollection for Projects {
    const TABLE: &'static str = "projects";
    const SCOPE_EXPR: &'static str = "cohort";
    const LOCK_KEY: i64 = lock_keys::PROJECTS;
    const LABEL: &'static str = "projects";
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: i32,
    pub cohort: String,
    pub active: bool,
}

/// Same listing rules as members
pub async fn list(pool: &PgPool, query: &ProjectQuery) -> ServiceResult<Vec<Project>> {
    let rows = match (&query.gestao, query.status) {
        (Some(cohort), status) => {
            sqlx::query_as::<_, Project>(
                r#"
                SELECT id, title, description, status, progress, cohort, position,
                       active, created_at, updated_at
                FROM projects
                WHERE cohort = $1 AND ($2::project_status IS NULL OR status = $2)
                ORDER BY position, id
                "#,
            )
            .bind(cohort)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        (None, Some(status)) => {
            sqlx::query_as::<_, Project>(
                r#"
                SELECT id, title, description, status, progress, cohort, position,
                       active, created_at, updated_at
                FROM projects
                WHERE status = $1
                ORDER BY cohort DESC, position, id
                "#,
            )
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        (None, None) => {
            sqlx::query_as::<_, Project>(
                r#"
                SELECT id, title, description, status, progress, cohort, position,
                       active, created_at, updated_at
                FROM projects
                WHERE active
                ORDER BY cohort DESC, position, id
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Project> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, title, description, status, progress, cohort, position,
               active, created_at, updated_at
        FROM projects WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::ProjectNotFound, id))
}

pub async fn cohorts(pool: &PgPool) -> ServiceResult<Vec<String>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT cohort FROM projects ORDER BY cohort DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: NewProject) -> ServiceResult<Project> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    let position = ordering::store::append_position::<Projects>(
        &mut tx,
        &Scope::Cohort(data.cohort.clone()),
    )
    .await?;

    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (
            id, title, description, status, progress, cohort, position,
            active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, title, description, status, progress, cohort, position,
                  active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.status)
    .bind(data.progress)
    .bind(&data.cohort)
    .bind(position)
    .bind(data.active)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(project_id = id, cohort = %data.cohort, position, "Project created");
    Ok(project)
}

/// Partial update. Moving a project to another term appends it there.
pub async fn update(pool: &PgPool, id: i64, data: &ProjectUpdate) -> ServiceResult<Project> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    // same lock order as reorders: advisory lock, then row locks
    ordering::store::lock::<Projects>(&mut tx).await?;

    let current: Option<String> =
        sqlx::query_scalar("SELECT cohort FROM projects WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| not_found(ErrorCode::ProjectNotFound, id))?;

    let new_position = match data.cohort.as_deref().map(str::trim) {
        Some(cohort) if cohort != current => Some(
            ordering::store::append_position::<Projects>(
                &mut tx,
                &Scope::Cohort(cohort.to_string()),
            )
            .await?,
        ),
        _ => None,
    };

    let project = sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            status = COALESCE($3, status),
            progress = COALESCE($4, progress),
            cohort = COALESCE($5, cohort),
            active = COALESCE($6, active),
            position = COALESCE($7, position),
            updated_at = $8
        WHERE id = $9
        RETURNING id, title, description, status, progress, cohort, position,
                  active, created_at, updated_at
        "#,
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.status)
    .bind(data.progress)
    .bind(data.cohort.as_deref().map(str::trim))
    .bind(data.active)
    .bind(new_position)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(project)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::ProjectNotFound, id));
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(())
}

pub async fn reorder(pool: &PgPool, ids: &[i64]) -> ServiceResult<ReorderPlan<String>> {
    ordering::store::reorder::<Projects>(pool, None, ids).await
}
