//! Notice repository

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{Notice, NoticeCreate, NoticeUpdate};
use sqlx::PgPool;

use super::not_found;
use crate::error::ServiceResult;

/// An end date, when present, may not precede the start date
pub fn validate_window(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), AppError> {
    if let Some(end) = end
        && end < start
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "data_fim must not be before data_inicio",
        )
        .with_detail("field", "data_fim"));
    }
    Ok(())
}

/// Newest start date first
pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Notice>> {
    let rows = sqlx::query_as::<_, Notice>(
        r#"
        SELECT id, title, description, link, start_date, end_date, created_at, updated_at
        FROM notices
        ORDER BY start_date DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Notices whose window contains `today`
pub async fn list_active(pool: &PgPool, today: NaiveDate) -> ServiceResult<Vec<Notice>> {
    let rows = sqlx::query_as::<_, Notice>(
        r#"
        SELECT id, title, description, link, start_date, end_date, created_at, updated_at
        FROM notices
        WHERE start_date <= $1 AND (end_date IS NULL OR end_date >= $1)
        ORDER BY start_date DESC, id DESC
        "#,
    )
    .bind(today)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Notice> {
    sqlx::query_as::<_, Notice>(
        r#"
        SELECT id, title, description, link, start_date, end_date, created_at, updated_at
        FROM notices WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::NoticeNotFound, id))
}

pub async fn create(pool: &PgPool, data: &NoticeCreate) -> ServiceResult<Notice> {
    validate_window(data.start_date, data.end_date)?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let notice = sqlx::query_as::<_, Notice>(
        r#"
        INSERT INTO notices (id, title, description, link, start_date, end_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, title, description, link, start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(&data.link)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(notice)
}

/// Partial update, the merged window is validated before writing
pub async fn update(pool: &PgPool, id: i64, data: &NoticeUpdate) -> ServiceResult<Notice> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let window: Option<(NaiveDate, Option<NaiveDate>)> = sqlx::query_as(
        "SELECT start_date, end_date FROM notices WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let (start, end) = window.ok_or_else(|| not_found(ErrorCode::NoticeNotFound, id))?;
    validate_window(
        data.start_date.unwrap_or(start),
        data.end_date.or(end),
    )?;

    let notice = sqlx::query_as::<_, Notice>(
        r#"
        UPDATE notices SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            link = COALESCE($3, link),
            start_date = COALESCE($4, start_date),
            end_date = COALESCE($5, end_date),
            updated_at = $6
        WHERE id = $7
        RETURNING id, title, description, link, start_date, end_date, created_at, updated_at
        "#,
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(&data.link)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(notice)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM notices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::NoticeNotFound, id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn window_rules() {
        assert!(validate_window(d("2024-05-01"), None).is_ok());
        assert!(validate_window(d("2024-05-01"), Some(d("2024-05-01"))).is_ok());
        let err = validate_window(d("2024-05-02"), Some(d("2024-05-01"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
