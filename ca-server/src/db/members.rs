//! Board member repository
//!
//! Members are ordered within their board term ("gestao"). The `status` and
//! `active` flags only filter listings and never affect positions.

use shared::error::ErrorCode;
use shared::models::{Member, MemberQuery, MemberStatus, MemberUpdate};
use sqlx::PgPool;

use super::{lock_keys, not_found};
use crate::error::ServiceResult;
use crate::media::ImagePayload;
use crate::ordering::{self, OrderedCollection, ReorderPlan, Scope};

pub struct Members;

impl OrderedCollection for Members {
    const TABLE: &'static str = "members";
    const SCOPE_EXPR: &'static str = "cohort";
    const LOCK_KEY: i64 = lock_keys::MEMBERS;
    const LABEL: &'static str = "members";
}

/// Validated fields of a new member
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub role: String,
    pub area: String,
    pub description: String,
    pub contact: Option<String>,
    pub cohort: String,
    pub status: MemberStatus,
    pub active: bool,
    pub photo: ImagePayload,
}

/// Listing rules:
/// - `gestao` given: that term in board order, optionally narrowed by `status`
/// - only `status`: every term, newest term first
/// - neither: active members, newest term first
pub async fn list(pool: &PgPool, query: &MemberQuery) -> ServiceResult<Vec<Member>> {
    let rows = match (&query.gestao, query.status) {
        (Some(cohort), status) => {
            sqlx::query_as::<_, Member>(
                r#"
                SELECT id, name, role, area, description, contact, cohort, status,
                       position, active, photo_base64, photo_mime, created_at, updated_at
                FROM members
                WHERE cohort = $1 AND ($2::member_status IS NULL OR status = $2)
                ORDER BY position, id
                "#,
            )
            .bind(cohort)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        (None, Some(status)) => {
            sqlx::query_as::<_, Member>(
                r#"
                SELECT id, name, role, area, description, contact, cohort, status,
                       position, active, photo_base64, photo_mime, created_at, updated_at
                FROM members
                WHERE status = $1
                ORDER BY cohort DESC, position, id
                "#,
            )
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        (None, None) => {
            sqlx::query_as::<_, Member>(
                r#"
                SELECT id, name, role, area, description, contact, cohort, status,
                       position, active, photo_base64, photo_mime, created_at, updated_at
                FROM members
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

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Member> {
    sqlx::query_as::<_, Member>(
        r#"
        SELECT id, name, role, area, description, contact, cohort, status,
               position, active, photo_base64, photo_mime, created_at, updated_at
        FROM members WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::MemberNotFound, id))
}

/// Distinct board terms, newest first
pub async fn cohorts(pool: &PgPool) -> ServiceResult<Vec<String>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT cohort FROM members ORDER BY cohort DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Insert at the end of its term
pub async fn create(pool: &PgPool, data: NewMember) -> ServiceResult<Member> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    let position = ordering::store::append_position::<Members>(
        &mut tx,
        &Scope::Cohort(data.cohort.clone()),
    )
    .await?;

    let member = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (
            id, name, role, area, description, contact, cohort, status,
            position, active, photo_base64, photo_mime, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        RETURNING id, name, role, area, description, contact, cohort, status,
                  position, active, photo_base64, photo_mime, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.role)
    .bind(&data.area)
    .bind(&data.description)
    .bind(&data.contact)
    .bind(&data.cohort)
    .bind(data.status)
    .bind(position)
    .bind(data.active)
    .bind(&data.photo.base64)
    .bind(&data.photo.mime)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(member_id = id, cohort = %data.cohort, position, "Member created");
    Ok(member)
}

/// Partial update. Moving a member to another term appends it there.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &MemberUpdate,
    photo: Option<ImagePayload>,
) -> ServiceResult<Member> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    // same lock order as reorders: advisory lock, then row locks
    ordering::store::lock::<Members>(&mut tx).await?;

    let current: Option<String> =
        sqlx::query_scalar("SELECT cohort FROM members WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| not_found(ErrorCode::MemberNotFound, id))?;

    let new_position = match data.cohort.as_deref().map(str::trim) {
        Some(cohort) if cohort != current => Some(
            ordering::store::append_position::<Members>(
                &mut tx,
                &Scope::Cohort(cohort.to_string()),
            )
            .await?,
        ),
        _ => None,
    };

    let (photo_base64, photo_mime) = match photo {
        Some(p) => (Some(p.base64), Some(p.mime)),
        None => (None, None),
    };

    let member = sqlx::query_as::<_, Member>(
        r#"
        UPDATE members SET
            name = COALESCE($1, name),
            role = COALESCE($2, role),
            area = COALESCE($3, area),
            description = COALESCE($4, description),
            contact = COALESCE($5, contact),
            cohort = COALESCE($6, cohort),
            status = COALESCE($7, status),
            active = COALESCE($8, active),
            position = COALESCE($9, position),
            photo_base64 = COALESCE($10, photo_base64),
            photo_mime = COALESCE($11, photo_mime),
            updated_at = $12
        WHERE id = $13
        RETURNING id, name, role, area, description, contact, cohort, status,
                  position, active, photo_base64, photo_mime, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.role.as_deref().map(str::trim))
    .bind(data.area.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.contact)
    .bind(data.cohort.as_deref().map(str::trim))
    .bind(data.status)
    .bind(data.active)
    .bind(new_position)
    .bind(photo_base64)
    .bind(photo_mime)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(member)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::MemberNotFound, id));
    }
    tracing::info!(member_id = id, "Member deleted");
    Ok(())
}

/// The term is resolved from the ids; all of them must share it
pub async fn reorder(pool: &PgPool, ids: &[i64]) -> ServiceResult<ReorderPlan<String>> {
    ordering::store::reorder::<Members>(pool, None, ids).await
}
