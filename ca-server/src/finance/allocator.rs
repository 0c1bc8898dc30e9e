//! Deadline-ordered waterfall allocation of a fund balance across its goals

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::FundingGoal;

/// Allocator input for one incomplete goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalSlot {
    pub id: i64,
    pub target: Decimal,
    pub deadline: NaiveDate,
}

impl GoalSlot {
    pub fn from_goal(goal: &FundingGoal) -> Self {
        Self {
            id: goal.id,
            target: goal.target_amount,
            deadline: goal.deadline,
        }
    }
}

/// Goals that take part in a recalculation.
///
/// Explicitly completed goals keep whatever they were given and are skipped.
pub fn open_slots(goals: &[FundingGoal]) -> Vec<GoalSlot> {
    goals
        .iter()
        .filter(|g| !g.completed)
        .map(GoalSlot::from_goal)
        .collect()
}

/// Allocator output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// `(goal id, raised amount)` in allocation order
    pub raised: Vec<(i64, Decimal)>,
    /// Total handed out, never more than a positive balance
    pub consumed: Decimal,
}

/// Hand `balance` to goals earliest deadline first (ties by id), each goal
/// taking up to its target.
///
/// Every goal gets a value, later ones get zero once the balance runs out.
/// Prior progress is ignored: the result depends only on the inputs.
pub fn allocate(balance: Decimal, goals: &[GoalSlot]) -> Allocation {
    let mut ordered: Vec<&GoalSlot> = goals.iter().collect();
    ordered.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));

    let mut remaining = balance;
    let mut raised = Vec::with_capacity(ordered.len());
    for goal in ordered {
        let amount = goal.target.min(remaining.max(Decimal::ZERO));
        remaining -= amount;
        raised.push((goal.id, amount));
    }

    let consumed = raised.iter().map(|(_, amount)| *amount).sum();
    Allocation { raised, consumed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;
    use shared::models::FundType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn slot(id: i64, target: i64, day: u32) -> GoalSlot {
        GoalSlot {
            id,
            target: Decimal::from(target),
            deadline: date(day),
        }
    }

    fn amounts(allocation: &Allocation) -> Vec<(i64, i64)> {
        allocation
            .raised
            .iter()
            .map(|(id, amount)| (*id, amount.to_i64().unwrap()))
            .collect()
    }

    #[test]
    fn waterfall_fills_earliest_first() {
        let goals = vec![slot(1, 600, 10), slot(2, 500, 20), slot(3, 300, 30)];
        let allocation = allocate(Decimal::from(1000), &goals);
        assert_eq!(amounts(&allocation), vec![(1, 600), (2, 400), (3, 0)]);
        assert_eq!(allocation.consumed, Decimal::from(1000));
    }

    #[test]
    fn balance_drop_regresses_later_goals() {
        let goals = vec![slot(1, 600, 10), slot(2, 500, 20), slot(3, 300, 30)];
        let allocation = allocate(Decimal::from(300), &goals);
        assert_eq!(amounts(&allocation), vec![(1, 300), (2, 0), (3, 0)]);
        assert_eq!(allocation.consumed, Decimal::from(300));
    }

    #[test]
    fn idempotent() {
        let goals = vec![slot(1, 600, 10), slot(2, 500, 20)];
        let first = allocate(Decimal::from(700), &goals);
        let second = allocate(Decimal::from(700), &goals);
        assert_eq!(first, second);
    }

    #[test]
    fn input_order_does_not_matter() {
        let goals = vec![slot(3, 300, 30), slot(1, 600, 10), slot(2, 500, 20)];
        let allocation = allocate(Decimal::from(1000), &goals);
        assert_eq!(amounts(&allocation), vec![(1, 600), (2, 400), (3, 0)]);
    }

    #[test]
    fn same_deadline_breaks_ties_by_id() {
        let goals = vec![slot(9, 100, 10), slot(4, 100, 10)];
        let allocation = allocate(Decimal::from(150), &goals);
        assert_eq!(amounts(&allocation), vec![(4, 100), (9, 50)]);
    }

    #[test]
    fn non_positive_balance_gives_zero() {
        let goals = vec![slot(1, 600, 10), slot(2, 500, 20)];
        let allocation = allocate(Decimal::from(-50), &goals);
        assert_eq!(amounts(&allocation), vec![(1, 0), (2, 0)]);
        assert_eq!(allocation.consumed, Decimal::ZERO);
    }

    #[test]
    fn surplus_is_left_over() {
        let goals = vec![slot(1, 100, 10)];
        let allocation = allocate(Decimal::from(1000), &goals);
        assert_eq!(amounts(&allocation), vec![(1, 100)]);
        assert_eq!(allocation.consumed, Decimal::from(100));
    }

    fn goal(id: i64, target: i64, day: u32, completed: bool) -> FundingGoal {
        FundingGoal {
            id,
            description: format!("goal {id}"),
            target_amount: Decimal::from(target),
            raised_amount: if completed {
                Decimal::from(target)
            } else {
                Decimal::ZERO
            },
            deadline: date(day),
            fund: FundType::Org,
            completed,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn completed_goals_are_left_alone() {
        // G2 was marked complete, the balance is now zero
        let goals = vec![
            goal(1, 600, 10, false),
            goal(2, 500, 20, true),
            goal(3, 300, 30, false),
        ];
        let slots = open_slots(&goals);
        assert_eq!(slots.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);

        let allocation = allocate(Decimal::ZERO, &slots);
        assert_eq!(amounts(&allocation), vec![(1, 0), (3, 0)]);
        assert!(allocation.raised.iter().all(|(id, _)| *id != 2));
    }

    #[test]
    fn fully_funded_goal_still_competes() {
        // reaching the target by allocation is not completion
        let goals = vec![goal(1, 600, 10, false)];
        let mut funded = goals.clone();
        funded[0].raised_amount = Decimal::from(600);
        let allocation = allocate(Decimal::from(300), &open_slots(&funded));
        assert_eq!(amounts(&allocation), vec![(1, 300)]);
    }

    #[test]
    fn no_goals() {
        let allocation = allocate(Decimal::from(10), &[]);
        assert!(allocation.raised.is_empty());
        assert_eq!(allocation.consumed, Decimal::ZERO);
    }
}
