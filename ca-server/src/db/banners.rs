//! Banner repository

use shared::error::ErrorCode;
use shared::models::{Banner, BannerCreate, BannerUpdate};
use sqlx::PgPool;

use super::{lock_keys, not_found};
use crate::error::ServiceResult;
use crate::media::ImagePayload;
use crate::ordering::{self, OrderedCollection, ReorderPlan, Scope};

/// Banners share one global order
pub struct Banners;

impl OrderedCollection for Banners {
    const TABLE: &'static str = "banners";
    const SCOPE_EXPR: &'static str = "''::text";
    const LOCK_KEY: i64 = lock_keys::BANNERS;
    const LABEL: &'static str = "banners";
}

pub async fn list(pool: &PgPool, active_only: bool) -> ServiceResult<Vec<Banner>> {
    let rows = sqlx::query_as::<_, Banner>(
        r#"
        SELECT id, title, description, link, kind, position, active,
               image_base64, image_mime, created_at, updated_at
        FROM banners
        WHERE ($1 = FALSE OR active)
        ORDER BY position, id
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Banner> {
    sqlx::query_as::<_, Banner>(
        r#"
        SELECT id, title, description, link, kind, position, active,
               image_base64, image_mime, created_at, updated_at
        FROM banners WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::BannerNotFound, id))
}

/// Insert at the end of the global order
pub async fn create(
    pool: &PgPool,
    data: &BannerCreate,
    image: Option<ImagePayload>,
) -> ServiceResult<Banner> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let (image_base64, image_mime) = match image {
        Some(p) => (Some(p.base64), Some(p.mime)),
        None => (None, None),
    };

    let mut tx = pool.begin().await?;
    let position = ordering::store::append_position::<Banners>(&mut tx, &Scope::Global).await?;

    let banner = sqlx::query_as::<_, Banner>(
        r#"
        INSERT INTO banners (
            id, title, description, link, kind, position, active,
            image_base64, image_mime, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING id, title, description, link, kind, position, active,
                  image_base64, image_mime, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(&data.link)
    .bind(data.kind.as_deref().unwrap_or("principal"))
    .bind(position)
    .bind(data.active.unwrap_or(true))
    .bind(image_base64)
    .bind(image_mime)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(banner_id = id, position, "Banner created");
    Ok(banner)
}

/// Partial update; `image` is `None` to keep, `Some(None)` to clear.
/// Position is only changed through [`reorder`].
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &BannerUpdate,
    image: Option<Option<ImagePayload>>,
) -> ServiceResult<Banner> {
    let now = shared::util::now_millis();
    let replace_image = image.is_some();
    let (image_base64, image_mime) = match image.flatten() {
        Some(p) => (Some(p.base64), Some(p.mime)),
        None => (None, None),
    };

    sqlx::query_as::<_, Banner>(
        r#"
        UPDATE banners SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            link = COALESCE($3, link),
            kind = COALESCE($4, kind),
            active = COALESCE($5, active),
            image_base64 = CASE WHEN $6 THEN $7 ELSE image_base64 END,
            image_mime = CASE WHEN $6 THEN $8 ELSE image_mime END,
            updated_at = $9
        WHERE id = $10
        RETURNING id, title, description, link, kind, position, active,
                  image_base64, image_mime, created_at, updated_at
        "#,
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.link)
    .bind(&data.kind)
    .bind(data.active)
    .bind(replace_image)
    .bind(image_base64)
    .bind(image_mime)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::BannerNotFound, id))
}

/// Delete without renumbering; the gap closes on the next reorder
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM banners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::BannerNotFound, id));
    }
    tracing::info!(banner_id = id, "Banner deleted");
    Ok(())
}

pub async fn reorder(pool: &PgPool, ids: &[i64]) -> ServiceResult<ReorderPlan<String>> {
    ordering::store::reorder::<Banners>(pool, Some(&Scope::Global), ids).await
}
