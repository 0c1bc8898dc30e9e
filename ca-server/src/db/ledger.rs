//! Ledger repository
//!
//! Both funds share one table partitioned by `fund`. Writes take the fund's
//! advisory lock so they serialize with goal recalculation of that fund.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{EntryKind, FundType, LedgerEntry, LedgerEntryUpdate, LedgerSummary};
use sqlx::{PgConnection, PgPool};

use super::{lock_fund, not_found};
use crate::error::ServiceResult;

/// Validated fields of a new entry
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub description: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub date: NaiveDate,
}

/// All entries of a fund, newest first
pub async fn list(pool: &PgPool, fund: FundType) -> ServiceResult<Vec<LedgerEntry>> {
    let rows = sqlx::query_as::<_, LedgerEntry>(
        r#"
        SELECT id, fund, description, amount, kind, date, created_by, created_at, updated_at
        FROM ledger_entries
        WHERE fund = $1
        ORDER BY date DESC, id DESC
        "#,
    )
    .bind(fund)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Entries of one calendar month, oldest first
pub async fn list_month(
    pool: &PgPool,
    fund: FundType,
    month: u32,
    year: i32,
) -> ServiceResult<Vec<LedgerEntry>> {
    let (start, end) = month_range(month, year)?;
    let rows = sqlx::query_as::<_, LedgerEntry>(
        r#"
        SELECT id, fund, description, amount, kind, date, created_by, created_at, updated_at
        FROM ledger_entries
        WHERE fund = $1 AND date >= $2 AND date < $3
        ORDER BY date, id
        "#,
    )
    .bind(fund)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `[first day of month, first day of next month)`
pub fn month_range(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "mes must be between 1 and 12")
            .with_detail("mes", month)
            .with_detail("ano", year)
    })?;
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| {
        AppError::with_message(ErrorCode::ValueOutOfRange, "ano is out of range")
            .with_detail("ano", year)
    })?;
    Ok((start, end))
}

/// Credits, debits and balance over every entry of the fund
pub async fn summary(conn: &mut PgConnection, fund: FundType) -> ServiceResult<LedgerSummary> {
    let (total_credits, total_debits): (Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(amount) FILTER (WHERE kind = 'entrada'), 0),
            COALESCE(SUM(amount) FILTER (WHERE kind = 'saida'), 0)
        FROM ledger_entries
        WHERE fund = $1
        "#,
    )
    .bind(fund)
    .fetch_one(&mut *conn)
    .await?;

    Ok(LedgerSummary {
        balance: total_credits - total_debits,
        total_credits,
        total_debits,
    })
}

pub async fn create(
    pool: &PgPool,
    fund: FundType,
    data: &NewEntry,
    created_by: i64,
) -> ServiceResult<LedgerEntry> {
    let id = shared::util::snowflake_id();
    let mut tx = pool.begin().await?;
    lock_fund(&mut tx, fund).await?;

    let entry = sqlx::query_as::<_, LedgerEntry>(
        r#"
        INSERT INTO ledger_entries (id, fund, description, amount, kind, date, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, fund, description, amount, kind, date, created_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(fund)
    .bind(&data.description)
    .bind(data.amount)
    .bind(data.kind)
    .bind(data.date)
    .bind(created_by)
    .bind(shared::util::now_millis())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(
        entry_id = id,
        fund = %fund,
        amount = %data.amount,
        kind = ?data.kind,
        "Ledger entry recorded"
    );
    Ok(entry)
}

/// Partial update within the fund; the balance is always derived, so no
/// reconciliation is needed
pub async fn update(
    pool: &PgPool,
    fund: FundType,
    id: i64,
    data: &LedgerEntryUpdate,
) -> ServiceResult<LedgerEntry> {
    let mut tx = pool.begin().await?;
    lock_fund(&mut tx, fund).await?;

    let entry = sqlx::query_as::<_, LedgerEntry>(
        r#"
        UPDATE ledger_entries SET
            description = COALESCE($1, description),
            amount = COALESCE($2, amount),
            kind = COALESCE($3, kind),
            date = COALESCE($4, date),
            updated_at = $5
        WHERE id = $6 AND fund = $7
        RETURNING id, fund, description, amount, kind, date, created_by, created_at, updated_at
        "#,
    )
    .bind(data.description.as_deref().map(str::trim))
    .bind(data.amount)
    .bind(data.kind)
    .bind(data.date)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(fund)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| not_found(ErrorCode::LedgerEntryNotFound, id))?;

    tx.commit().await?;
    Ok(entry)
}

pub async fn delete(pool: &PgPool, fund: FundType, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    lock_fund(&mut tx, fund).await?;

    let rows = sqlx::query("DELETE FROM ledger_entries WHERE id = $1 AND fund = $2")
        .bind(id)
        .bind(fund)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::LedgerEntryNotFound, id));
    }

    tx.commit().await?;
    tracing::info!(entry_id = id, fund = %fund, "Ledger entry deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_bounds() {
        let (start, end) = month_range(3, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        let (start, end) = month_range(12, 2023).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn month_range_rejects_invalid_month() {
        let err = month_range(13, 2024).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(month_range(0, 2024).is_err());
    }
}
