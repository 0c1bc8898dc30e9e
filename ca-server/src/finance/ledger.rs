//! Ledger arithmetic

use rust_decimal::Decimal;
use shared::models::{EntryKind, LedgerEntry, LedgerSummary};

/// Credits minus debits over every entry given.
///
/// Amounts are positive, `kind` carries the sign.
pub fn summarize<'a, I>(entries: I) -> LedgerSummary
where
    I: IntoIterator<Item = (&'a Decimal, EntryKind)>,
{
    let mut summary = LedgerSummary::default();
    for (amount, kind) in entries {
        match kind {
            EntryKind::Credit => summary.total_credits += *amount,
            EntryKind::Debit => summary.total_debits += *amount,
        }
    }
    summary.balance = summary.total_credits - summary.total_debits;
    summary
}

/// Summary of loaded entries
pub fn summarize_entries(entries: &[LedgerEntry]) -> LedgerSummary {
    summarize(entries.iter().map(|e| (&e.amount, e.kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::FundType;

    fn entry(id: i64, amount: i64, kind: EntryKind) -> LedgerEntry {
        LedgerEntry {
            id,
            fund: FundType::Org,
            description: format!("entry {id}"),
            amount: Decimal::from(amount),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_by: Some(1),
            created_at: 0,
            updated_at: None,
        }
    }

    #[test]
    fn credit_then_debit_then_delete() {
        let mut entries = vec![entry(1, 100, EntryKind::Credit), entry(2, 40, EntryKind::Debit)];
        let summary = summarize_entries(&entries);
        assert_eq!(summary.balance, Decimal::from(60));
        assert_eq!(summary.total_credits, Decimal::from(100));
        assert_eq!(summary.total_debits, Decimal::from(40));

        entries.retain(|e| e.id != 2);
        assert_eq!(summarize_entries(&entries).balance, Decimal::from(100));
    }

    #[test]
    fn empty_ledger_is_zero() {
        let summary = summarize_entries(&[]);
        assert_eq!(summary, LedgerSummary::default());
    }

    #[test]
    fn balance_can_go_negative() {
        let entries = vec![entry(1, 10, EntryKind::Credit), entry(2, 25, EntryKind::Debit)];
        assert_eq!(summarize_entries(&entries).balance, Decimal::from(-15));
    }

    #[test]
    fn cents_are_exact() {
        let a = Decimal::new(10, 2); // 0.10
        let b = Decimal::new(20, 2); // 0.20
        let summary = summarize([(&a, EntryKind::Credit), (&b, EntryKind::Credit)]);
        assert_eq!(summary.balance, Decimal::new(30, 2));
    }
}
