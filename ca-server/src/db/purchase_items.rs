//! Purchase wish-list repository

use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{FundType, Priority, PurchaseItem, PurchaseItemUpdate};
use sqlx::PgPool;

use super::not_found;
use crate::error::ServiceResult;

#[derive(Debug, Clone)]
pub struct NewPurchaseItem {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_value: Decimal,
    pub fund: FundType,
}

/// Highest priority first, then oldest
pub async fn list(pool: &PgPool, fund: Option<FundType>) -> ServiceResult<Vec<PurchaseItem>> {
    let rows = sqlx::query_as::<_, PurchaseItem>(
        r#"
        SELECT id, name, description, priority, estimated_value, fund, created_at, updated_at
        FROM purchase_items
        WHERE $1::fund_type IS NULL OR fund = $1
        ORDER BY priority DESC, created_at, id
        "#,
    )
    .bind(fund)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &NewPurchaseItem) -> ServiceResult<PurchaseItem> {
    let id = shared::util::snowflake_id();
    let item = sqlx::query_as::<_, PurchaseItem>(
        r#"
        INSERT INTO purchase_items (
            id, name, description, priority, estimated_value, fund, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, name, description, priority, estimated_value, fund, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.priority)
    .bind(data.estimated_value)
    .bind(data.fund)
    .bind(shared::util::now_millis())
    .fetch_one(pool)
    .await?;

    tracing::info!(item_id = id, fund = %data.fund, "Purchase item created");
    Ok(item)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &PurchaseItemUpdate,
) -> ServiceResult<PurchaseItem> {
    sqlx::query_as::<_, PurchaseItem>(
        r#"
        UPDATE purchase_items SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            priority = COALESCE($3, priority),
            estimated_value = COALESCE($4, estimated_value),
            fund = COALESCE($5, fund),
            updated_at = $6
        WHERE id = $7
        RETURNING id, name, description, priority, estimated_value, fund, created_at, updated_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.priority)
    .bind(data.estimated_value)
    .bind(data.fund)
    .bind(shared::util::now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::PurchaseItemNotFound, id))
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM purchase_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::PurchaseItemNotFound, id));
    }
    Ok(())
}
