//! PostgreSQL repositories
//!
//! One module per table family. Functions take the pool (or a connection
//! inside a caller's transaction) and return [`ServiceResult`], so a missing
//! row surfaces as the resource's NotFound code and store failures as a
//! logged 500.
//!
//! [`ServiceResult`]: crate::error::ServiceResult

pub mod banners;
pub mod goals;
pub mod ledger;
pub mod members;
pub mod notices;
pub mod products;
pub mod projects;
pub mod purchase_items;

use shared::error::{AppError, ErrorCode};
use shared::models::FundType;
use sqlx::PgConnection;

use crate::error::{ServiceError, ServiceResult};

/// Advisory lock keys, one per ordered collection or fund
pub(crate) mod lock_keys {
    pub const BANNERS: i64 = 0x4341_0001;
    pub const PRODUCT_IMAGES: i64 = 0x4341_0002;
    pub const MEMBERS: i64 = 0x4341_0003;
    pub const PROJECTS: i64 = 0x4341_0004;
    pub const FUND_CA: i64 = 0x4341_0101;
    pub const FUND_DESCANSO: i64 = 0x4341_0102;
}

/// Map "no row" to the resource's NotFound error
pub(crate) fn not_found(code: ErrorCode, id: i64) -> ServiceError {
    ServiceError::App(AppError::new(code).with_detail("id", id))
}

/// Take the fund's advisory lock until the surrounding transaction ends.
///
/// Ledger writes and goal recalculation of one fund never interleave.
pub(crate) async fn lock_fund(conn: &mut PgConnection, fund: FundType) -> ServiceResult<()> {
    let key = match fund {
        FundType::Org => lock_keys::FUND_CA,
        FundType::Lounge => lock_keys::FUND_DESCANSO,
    };
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(key)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
