//! Ordered collections
//!
//! Every reorderable table shares the same shape: an `id`, an integer
//! `position` and a scope key under which positions are numbered
//! independently (a product for its images, a board term for members and
//! projects, a single implicit scope for banners).
//!
//! The planner in this module is pure: it takes the rows currently stored
//! and the order requested by a client and either produces the full
//! position assignment or rejects the request. [`store`] runs the plan
//! against PostgreSQL inside one transaction.

pub mod store;

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// A table whose rows carry a scoped `position` column.
///
/// Column names are compile-time constants and are spliced into SQL, never
/// user input.
pub trait OrderedCollection {
    /// Table name
    const TABLE: &'static str;
    /// SQL expression yielding the scope key as `text`
    const SCOPE_EXPR: &'static str;
    /// Advisory lock key serializing appends and reorders of this table
    const LOCK_KEY: i64;
    /// Used in log lines
    const LABEL: &'static str;
}

/// Scope under which positions are numbered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// One implicit scope for the whole table
    Global,
    /// Images of one product
    Product(i64),
    /// Rows of one board term ("gestao")
    Cohort(String),
}

impl Scope {
    /// Text key as produced by [`OrderedCollection::SCOPE_EXPR`]
    pub fn key(&self) -> String {
        match self {
            Scope::Global => String::new(),
            Scope::Product(id) => id.to_string(),
            Scope::Cohort(label) => label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("ordering list is empty")]
    Empty,
    #[error("id {0} appears more than once")]
    Duplicate(i64),
    #[error("id {0} does not exist in this collection")]
    Unknown(i64),
    #[error("ordering list spans more than one group")]
    MixedScope,
    #[error("ordering list is missing {} item(s)", .missing.len())]
    Incomplete { missing: Vec<i64> },
}

impl From<OrderingError> for AppError {
    fn from(err: OrderingError) -> Self {
        let message = err.to_string();
        match err {
            OrderingError::Empty => AppError::new(ErrorCode::OrderingEmpty),
            OrderingError::Duplicate(id) => {
                AppError::with_message(ErrorCode::OrderingDuplicateId, message)
                    .with_detail("id", id)
            }
            OrderingError::Unknown(id) => {
                AppError::with_message(ErrorCode::OrderingUnknownId, message).with_detail("id", id)
            }
            OrderingError::MixedScope => AppError::new(ErrorCode::OrderingMixedScope),
            OrderingError::Incomplete { missing } => {
                AppError::with_message(ErrorCode::OrderingIncomplete, message)
                    .with_detail("missing", missing)
            }
        }
    }
}

/// Validated position assignment for one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan<K> {
    /// Scope all ids belong to
    pub scope: K,
    pub ids: Vec<i64>,
    pub positions: Vec<i32>,
}

impl<K> ReorderPlan<K> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Check `ordered` against the stored `(id, scope)` rows and assign
/// `position = index` to each id.
///
/// The request must name every row of exactly one scope, once. Rows of other
/// scopes in `rows` are only used to tell "wrong group" from "unknown id".
pub fn plan_reorder<K>(rows: &[(i64, K)], ordered: &[i64]) -> Result<ReorderPlan<K>, OrderingError>
where
    K: Clone + PartialEq,
{
    let Some(first) = ordered.first() else {
        return Err(OrderingError::Empty);
    };

    let scope_of = |id: i64| rows.iter().find(|(row_id, _)| *row_id == id).map(|(_, k)| k);
    let scope = scope_of(*first).ok_or(OrderingError::Unknown(*first))?.clone();

    let mut seen = HashSet::with_capacity(ordered.len());
    for &id in ordered {
        if !seen.insert(id) {
            return Err(OrderingError::Duplicate(id));
        }
        match scope_of(id) {
            None => return Err(OrderingError::Unknown(id)),
            Some(k) if *k != scope => return Err(OrderingError::MixedScope),
            Some(_) => {}
        }
    }

    let missing: Vec<i64> = rows
        .iter()
        .filter(|(id, k)| *k == scope && !seen.contains(id))
        .map(|(id, _)| *id)
        .collect();
    if !missing.is_empty() {
        return Err(OrderingError::Incomplete { missing });
    }

    Ok(ReorderPlan {
        scope,
        ids: ordered.to_vec(),
        positions: (0..ordered.len() as i32).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(ids: &[i64]) -> Vec<(i64, ())> {
        ids.iter().map(|id| (*id, ())).collect()
    }

    #[test]
    fn permutation_assigns_index_positions() {
        let rows = global(&[10, 20, 30, 40]);
        let plan = plan_reorder(&rows, &[30, 10, 40, 20]).unwrap();
        assert_eq!(plan.ids, vec![30, 10, 40, 20]);
        assert_eq!(plan.positions, vec![0, 1, 2, 3]);
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn positions_cover_zero_to_n() {
        let rows = global(&[5, 6, 7, 8, 9]);
        let plan = plan_reorder(&rows, &[9, 8, 7, 6, 5]).unwrap();
        let mut covered = plan.positions.clone();
        covered.sort();
        assert_eq!(covered, (0..5).collect::<Vec<i32>>());
    }

    #[test]
    fn rejects_empty() {
        let rows = global(&[1]);
        assert_eq!(plan_reorder(&rows, &[]), Err(OrderingError::Empty));
    }

    #[test]
    fn rejects_unknown_id() {
        let rows = global(&[1, 2]);
        assert_eq!(plan_reorder(&rows, &[99]), Err(OrderingError::Unknown(99)));
        assert_eq!(plan_reorder(&rows, &[1, 2, 99]), Err(OrderingError::Unknown(99)));
    }

    #[test]
    fn rejects_duplicate_id() {
        let rows = global(&[1, 2]);
        assert_eq!(plan_reorder(&rows, &[1, 1, 2]), Err(OrderingError::Duplicate(1)));
    }

    #[test]
    fn rejects_partial_list() {
        let rows = global(&[1, 2, 3]);
        assert_eq!(
            plan_reorder(&rows, &[3, 1]),
            Err(OrderingError::Incomplete { missing: vec![2] })
        );
    }

    #[test]
    fn scope_is_resolved_from_ids() {
        let rows = vec![
            (1, "2023/2024".to_string()),
            (2, "2024/2025".to_string()),
            (3, "2024/2025".to_string()),
        ];
        let plan = plan_reorder(&rows, &[3, 2]).unwrap();
        assert_eq!(plan.scope, "2024/2025");
        assert_eq!(plan.ids, vec![3, 2]);

        // other cohorts do not count towards completeness
        let plan = plan_reorder(&rows, &[1]).unwrap();
        assert_eq!(plan.scope, "2023/2024");
    }

    #[test]
    fn rejects_mixed_scopes() {
        let rows = vec![(1, 100_i64), (2, 200_i64)];
        assert_eq!(plan_reorder(&rows, &[1, 2]), Err(OrderingError::MixedScope));
    }

    #[test]
    fn tolerates_gapped_positions() {
        // stored positions are irrelevant to the plan, only membership counts
        let rows = global(&[4, 7]);
        let plan = plan_reorder(&rows, &[7, 4]).unwrap();
        assert_eq!(plan.positions, vec![0, 1]);
    }

    #[test]
    fn errors_map_to_codes() {
        let err: AppError = OrderingError::Unknown(5).into();
        assert_eq!(err.code, ErrorCode::OrderingUnknownId);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err: AppError = OrderingError::Incomplete { missing: vec![1, 2] }.into();
        assert_eq!(err.code, ErrorCode::OrderingIncomplete);
        assert_eq!(err.message, "ordering list is missing 2 item(s)");
    }

    #[test]
    fn scope_keys() {
        assert_eq!(Scope::Global.key(), "");
        assert_eq!(Scope::Product(42).key(), "42");
        assert_eq!(Scope::Cohort("2024/2025".into()).key(), "2024/2025");
    }
}
