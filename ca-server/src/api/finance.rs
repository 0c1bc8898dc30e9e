//! Finance routes (financeiro)
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /financeiro/transparencia | GET | no |
//! | /financeiro/transparencia/completa | GET | no |
//! | /financeiro/{fundo}/relatorio/{mes}/{ano} | GET | no |
//! | /financeiro/{fundo} | GET, POST | yes |
//! | /financeiro/{fundo}/{id} | PUT, DELETE | yes |
//! | /financeiro/{fundo}/relatorio | GET | yes |
//! | /financeiro/metas | GET, POST | yes |
//! | /financeiro/metas/{id} | PUT, DELETE | yes |
//! | /financeiro/metas/{id}/concluir | PUT | yes |
//! | /financeiro/metas/progresso/{tipo} | GET | yes |
//! | /financeiro/itens-compra | GET, POST | yes |
//! | /financeiro/itens-compra/{id} | PUT, DELETE | yes |
//!
//! `{fundo}` and `{tipo}` are `ca` or `descanso`.

use axum::extract::{Extension, State};
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    FundType, FundingGoal, FundingGoalCreate, FundingGoalUpdate, GoalProgress, LedgerEntry,
    LedgerEntryCreate, LedgerEntryUpdate, LedgerReport, MonthlyReport, PurchaseItem,
    PurchaseItemCreate, PurchaseItemUpdate, Transparency, TransparencyFull,
};
use sqlx::PgPool;

use super::{ApiResult, Created};
use crate::auth::{Principal, require_auth};
use crate::db::goals::{self, NewGoal};
use crate::db::ledger::{self, NewEntry};
use crate::db::purchase_items::{self, NewPurchaseItem};
use crate::extract::{ApiJson, ApiPath};
use crate::finance::summarize_entries;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, require, require_text, validate_amount, validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/financeiro/transparencia", get(transparency))
        .route("/financeiro/transparencia/completa", get(transparency_full))
        .route("/financeiro/{fundo}/relatorio/{mes}/{ano}", get(monthly_report));

    let protected = Router::new()
        .route("/financeiro/{fundo}", get(list_entries).post(create_entry))
        .route("/financeiro/{fundo}/{id}", put(update_entry).delete(delete_entry))
        .route("/financeiro/{fundo}/relatorio", get(report))
        .route("/financeiro/metas", get(list_goals).post(create_goal))
        .route("/financeiro/metas/{id}", put(update_goal).delete(delete_goal))
        .route("/financeiro/metas/{id}/concluir", put(complete_goal))
        .route("/financeiro/metas/progresso/{tipo}", get(goal_progress))
        .route("/financeiro/itens-compra", get(list_items).post(create_item))
        .route("/financeiro/itens-compra/{id}", put(update_item).delete(delete_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

/// `{ "message": ..., "id": ... }` returned by deletes
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub id: i64,
}

/// Fund path segment
pub fn parse_fund(raw: &str) -> Result<FundType, AppError> {
    FundType::ALL
        .into_iter()
        .find(|f| f.as_str() == raw)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFund,
                format!("Unknown fund {raw}, expected ca or descanso"),
            )
            .with_detail("fundo", raw)
        })
}

async fn fund_report(pool: &PgPool, fund: FundType) -> Result<LedgerReport, AppError> {
    let entries = ledger::list(pool, fund).await?;
    let summary = summarize_entries(&entries);
    Ok(LedgerReport { entries, summary })
}

// ── Public ──────────────────────────────────────────────────────────

pub async fn transparency(State(state): State<AppState>) -> ApiResult<Transparency> {
    Ok(Json(Transparency {
        ca: fund_report(&state.pool, FundType::Org).await?,
        descanso: fund_report(&state.pool, FundType::Lounge).await?,
    }))
}

pub async fn transparency_full(State(state): State<AppState>) -> ApiResult<TransparencyFull> {
    Ok(Json(TransparencyFull {
        ca: fund_report(&state.pool, FundType::Org).await?,
        descanso: fund_report(&state.pool, FundType::Lounge).await?,
        metas: goals::list(&state.pool, None).await?,
        purchase_items: purchase_items::list(&state.pool, None).await?,
    }))
}

pub async fn monthly_report(
    State(state): State<AppState>,
    ApiPath((fund, month, year)): ApiPath<(String, u32, i32)>,
) -> ApiResult<MonthlyReport> {
    let fund = parse_fund(&fund)?;
    ledger::month_range(month, year)?;

    let entries = ledger::list_month(&state.pool, fund, month, year).await?;
    let summary = summarize_entries(&entries);
    Ok(Json(MonthlyReport {
        fund,
        month,
        year,
        entries,
        summary,
    }))
}

// ── Ledger ──────────────────────────────────────────────────────────

pub async fn list_entries(
    State(state): State<AppState>,
    ApiPath(fund): ApiPath<String>,
) -> ApiResult<Vec<LedgerEntry>> {
    let fund = parse_fund(&fund)?;
    Ok(Json(ledger::list(&state.pool, fund).await?))
}

pub async fn report(
    State(state): State<AppState>,
    ApiPath(fund): ApiPath<String>,
) -> ApiResult<LedgerReport> {
    let fund = parse_fund(&fund)?;
    Ok(Json(fund_report(&state.pool, fund).await?))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(fund): ApiPath<String>,
    ApiJson(payload): ApiJson<LedgerEntryCreate>,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let fund = parse_fund(&fund)?;
    let entry = validate_entry(&payload)?;

    let created = ledger::create(&state.pool, fund, &entry, principal.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            id: created.id,
            message: "Transação adicionada com sucesso",
        }),
    ))
}

pub async fn update_entry(
    State(state): State<AppState>,
    ApiPath((fund, id)): ApiPath<(String, i64)>,
    ApiJson(payload): ApiJson<LedgerEntryUpdate>,
) -> ApiResult<LedgerEntry> {
    let fund = parse_fund(&fund)?;
    if let Some(ref description) = payload.description {
        validate_required_text(description, "descricao", MAX_NOTE_LEN)?;
    }
    if let Some(amount) = payload.amount {
        validate_amount(amount, "valor")?;
    }
    Ok(Json(ledger::update(&state.pool, fund, id, &payload).await?))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    ApiPath((fund, id)): ApiPath<(String, i64)>,
) -> ApiResult<Deleted> {
    let fund = parse_fund(&fund)?;
    ledger::delete(&state.pool, fund, id).await?;
    Ok(Json(Deleted {
        message: "Transação excluída com sucesso",
        id,
    }))
}

fn validate_entry(payload: &LedgerEntryCreate) -> Result<NewEntry, AppError> {
    let description = require_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    let amount = require(payload.amount, "valor")?;
    validate_amount(amount, "valor")?;
    Ok(NewEntry {
        description: description.trim().to_string(),
        amount,
        kind: require(payload.kind, "tipo")?,
        date: require(payload.date, "data")?,
    })
}

// ── Goals ───────────────────────────────────────────────────────────

pub async fn list_goals(State(state): State<AppState>) -> ApiResult<Vec<FundingGoal>> {
    Ok(Json(goals::list(&state.pool, None).await?))
}

pub async fn create_goal(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FundingGoalCreate>,
) -> Result<(StatusCode, Json<FundingGoal>), AppError> {
    let goal = validate_goal(&payload)?;
    let created = goals::create(&state.pool, &goal).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<FundingGoalUpdate>,
) -> ApiResult<FundingGoal> {
    if let Some(ref description) = payload.description {
        validate_required_text(description, "descricao", MAX_NOTE_LEN)?;
    }
    if let Some(target) = payload.target_amount {
        validate_amount(target, "valorNecessario")?;
    }
    Ok(Json(goals::update(&state.pool, id, &payload).await?))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Deleted> {
    goals::delete(&state.pool, id).await?;
    Ok(Json(Deleted {
        message: "Meta excluída com sucesso",
        id,
    }))
}

/// Marks the goal reached; the allocator leaves it alone afterwards
pub async fn complete_goal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<FundingGoal> {
    Ok(Json(goals::complete(&state.pool, id).await?))
}

/// Recompute the fund's open goals from its balance
pub async fn goal_progress(
    State(state): State<AppState>,
    ApiPath(fund): ApiPath<String>,
) -> ApiResult<GoalProgress> {
    let fund = parse_fund(&fund)?;
    Ok(Json(goals::recalculate_progress(&state.pool, fund).await?))
}

fn validate_goal(payload: &FundingGoalCreate) -> Result<NewGoal, AppError> {
    let description = require_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    let target_amount = require(payload.target_amount, "valorNecessario")?;
    validate_amount(target_amount, "valorNecessario")?;

    let raised_amount = payload.raised_amount.unwrap_or_default();
    if raised_amount.is_sign_negative() || raised_amount > target_amount {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "valorArrecadado must be between zero and valorNecessario",
        )
        .with_detail("field", "valorArrecadado"));
    }

    Ok(NewGoal {
        description: description.trim().to_string(),
        target_amount,
        raised_amount,
        deadline: require(payload.deadline, "dataLimite")?,
        fund: require(payload.fund, "tipo")?,
    })
}

// ── Purchase items ──────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> ApiResult<Vec<PurchaseItem>> {
    Ok(Json(purchase_items::list(&state.pool, None).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PurchaseItemCreate>,
) -> Result<(StatusCode, Json<PurchaseItem>), AppError> {
    let item = validate_item(&payload)?;
    let created = purchase_items::create(&state.pool, &item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<PurchaseItemUpdate>,
) -> ApiResult<PurchaseItem> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "nome", MAX_NAME_LEN)?;
    }
    if let Some(ref description) = payload.description {
        validate_required_text(description, "descricao", MAX_NOTE_LEN)?;
    }
    if let Some(value) = payload.estimated_value {
        validate_amount(value, "valorEstimado")?;
    }
    Ok(Json(purchase_items::update(&state.pool, id, &payload).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Deleted> {
    purchase_items::delete(&state.pool, id).await?;
    Ok(Json(Deleted {
        message: "Item excluído com sucesso",
        id,
    }))
}

fn validate_item(payload: &PurchaseItemCreate) -> Result<NewPurchaseItem, AppError> {
    let name = require_text(&payload.name, "nome", MAX_NAME_LEN)?;
    let description = require_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    let estimated_value = require(payload.estimated_value, "valorEstimado")?;
    validate_amount(estimated_value, "valorEstimado")?;

    Ok(NewPurchaseItem {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        priority: require(payload.priority, "prioridade")?,
        estimated_value,
        fund: require(payload.fund, "tipo")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::models::{EntryKind, Priority};

    #[test]
    fn fund_segments() {
        assert_eq!(parse_fund("ca").unwrap(), FundType::Org);
        assert_eq!(parse_fund("descanso").unwrap(), FundType::Lounge);
        assert_eq!(parse_fund("CA").unwrap_err().code, ErrorCode::InvalidFund);
    }

    #[test]
    fn entry_needs_every_field() {
        let mut payload = LedgerEntryCreate {
            description: Some("Venda de canecas".to_string()),
            amount: Some(Decimal::new(1505, 1)),
            kind: Some(EntryKind::Credit),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        let entry = validate_entry(&payload).unwrap();
        assert_eq!(entry.amount, Decimal::new(1505, 1));

        payload.date = None;
        assert_eq!(
            validate_entry(&payload).unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn entry_amount_must_be_positive() {
        let payload = LedgerEntryCreate {
            description: Some("Estorno".to_string()),
            amount: Some(Decimal::ZERO),
            kind: Some(EntryKind::Debit),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            validate_entry(&payload).unwrap_err().code,
            ErrorCode::InvalidAmount
        );
    }

    #[test]
    fn goal_raised_cannot_exceed_target() {
        let mut payload = FundingGoalCreate {
            description: Some("Micro-ondas".to_string()),
            target_amount: Some(Decimal::from(600)),
            raised_amount: Some(Decimal::from(700)),
            deadline: NaiveDate::from_ymd_opt(2024, 6, 10),
            fund: Some(FundType::Lounge),
        };
        assert_eq!(validate_goal(&payload).unwrap_err().code, ErrorCode::InvalidAmount);

        payload.raised_amount = None;
        let goal = validate_goal(&payload).unwrap();
        assert_eq!(goal.raised_amount, Decimal::ZERO);
        assert_eq!(goal.fund, FundType::Lounge);
    }

    #[test]
    fn item_requires_priority() {
        let mut payload = PurchaseItemCreate {
            name: Some("Sofá".to_string()),
            description: Some("Para a sala de descanso".to_string()),
            priority: None,
            estimated_value: Some(Decimal::from(1200)),
            fund: Some(FundType::Lounge),
        };
        assert!(validate_item(&payload).is_err());

        payload.priority = Some(Priority::Alta);
        assert_eq!(validate_item(&payload).unwrap().priority, Priority::Alta);
    }
}
