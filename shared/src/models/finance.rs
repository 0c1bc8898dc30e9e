//! Finance Models (financeiro)
//!
//! Two independent funds, each with its own ledger, goals and purchase list.
//! Money is `Decimal` and travels as a JSON number.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which cash fund a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "fund_type"))]
pub enum FundType {
    /// Organization cash
    #[serde(rename = "ca")]
    #[cfg_attr(feature = "db", sqlx(rename = "ca"))]
    Org,
    /// Student lounge cash
    #[serde(rename = "descanso")]
    #[cfg_attr(feature = "db", sqlx(rename = "descanso"))]
    Lounge,
}

impl FundType {
    pub const ALL: [FundType; 2] = [FundType::Org, FundType::Lounge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Org => "ca",
            Self::Lounge => "descanso",
        }
    }
}

impl std::fmt::Display for FundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "entry_kind"))]
pub enum EntryKind {
    #[serde(rename = "entrada")]
    #[cfg_attr(feature = "db", sqlx(rename = "entrada"))]
    Credit,
    #[serde(rename = "saida")]
    #[cfg_attr(feature = "db", sqlx(rename = "saida"))]
    Debit,
}

/// Ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    #[serde(rename = "fundo")]
    pub fund: FundType,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Always positive, direction comes from `kind`
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "tipo")]
    pub kind: EntryKind,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "usuario_id")]
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Record transaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryCreate {
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor", default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(rename = "tipo")]
    pub kind: Option<EntryKind>,
    #[serde(rename = "data")]
    pub date: Option<NaiveDate>,
}

/// Update transaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryUpdate {
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor", default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(rename = "tipo")]
    pub kind: Option<EntryKind>,
    #[serde(rename = "data")]
    pub date: Option<NaiveDate>,
}

/// Derived totals of a set of ledger entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    #[serde(rename = "saldoTotal", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(rename = "totalEntradas", with = "rust_decimal::serde::float")]
    pub total_credits: Decimal,
    #[serde(rename = "totalSaidas", with = "rust_decimal::serde::float")]
    pub total_debits: Decimal,
}

/// Entries of one fund with their summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    #[serde(rename = "transacoes")]
    pub entries: Vec<LedgerEntry>,
    #[serde(rename = "resumo")]
    pub summary: LedgerSummary,
}

/// Report restricted to one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(rename = "fundo")]
    pub fund: FundType,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "transacoes")]
    pub entries: Vec<LedgerEntry>,
    #[serde(rename = "resumo")]
    pub summary: LedgerSummary,
}

/// Public view of both funds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transparency {
    pub ca: LedgerReport,
    pub descanso: LedgerReport,
}

/// Public view of both funds plus goals and the purchase list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyFull {
    pub ca: LedgerReport,
    pub descanso: LedgerReport,
    pub metas: Vec<FundingGoal>,
    #[serde(rename = "itensCompra")]
    pub purchase_items: Vec<PurchaseItem>,
}

/// Funding goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FundingGoal {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valorNecessario", with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(rename = "valorArrecadado", with = "rust_decimal::serde::float")]
    pub raised_amount: Decimal,
    #[serde(rename = "dataLimite")]
    pub deadline: NaiveDate,
    #[serde(rename = "tipo")]
    pub fund: FundType,
    /// Set only by an explicit completion; completed goals are left
    /// alone by the allocator
    #[serde(rename = "concluida")]
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create goal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingGoalCreate {
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(
        rename = "valorNecessario",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub target_amount: Option<Decimal>,
    #[serde(
        rename = "valorArrecadado",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub raised_amount: Option<Decimal>,
    #[serde(rename = "dataLimite")]
    pub deadline: Option<NaiveDate>,
    #[serde(rename = "tipo")]
    pub fund: Option<FundType>,
}

/// Update goal payload (`valorArrecadado` is not editable here)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingGoalUpdate {
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(
        rename = "valorNecessario",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub target_amount: Option<Decimal>,
    #[serde(rename = "dataLimite")]
    pub deadline: Option<NaiveDate>,
    #[serde(rename = "tipo")]
    pub fund: Option<FundType>,
}

/// Result of a goal progress recalculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    #[serde(rename = "saldoAtual", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(rename = "metasAtualizadas")]
    pub goals: Vec<FundingGoal>,
}

/// Purchase priority; declaration order is ascending urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "purchase_priority", rename_all = "lowercase")
)]
pub enum Priority {
    Baixa,
    Media,
    Alta,
}

/// Item on a fund's wish list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseItem {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "valorEstimado", with = "rust_decimal::serde::float")]
    pub estimated_value: Decimal,
    #[serde(rename = "tipo")]
    pub fund: FundType,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create purchase item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItemCreate {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "prioridade")]
    pub priority: Option<Priority>,
    #[serde(
        rename = "valorEstimado",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub estimated_value: Option<Decimal>,
    #[serde(rename = "tipo")]
    pub fund: Option<FundType>,
}

/// Update purchase item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItemUpdate {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "prioridade")]
    pub priority: Option<Priority>,
    #[serde(
        rename = "valorEstimado",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub estimated_value: Option<Decimal>,
    #[serde(rename = "tipo")]
    pub fund: Option<FundType>,
}
