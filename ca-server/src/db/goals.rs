//! Funding goal repository and the transactional progress recalculation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{FundType, FundingGoal, FundingGoalUpdate, GoalProgress};
use sqlx::PgPool;

use super::{ledger, lock_fund, not_found};
use crate::error::ServiceResult;
use crate::finance::{allocate, open_slots};

/// Validated fields of a new goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub description: String,
    pub target_amount: Decimal,
    pub raised_amount: Decimal,
    pub deadline: NaiveDate,
    pub fund: FundType,
}

/// Goals by deadline, optionally of one fund
pub async fn list(pool: &PgPool, fund: Option<FundType>) -> ServiceResult<Vec<FundingGoal>> {
    let rows = sqlx::query_as::<_, FundingGoal>(
        r#"
        SELECT id, description, target_amount, raised_amount, deadline, fund, completed,
               created_at, updated_at
        FROM funding_goals
        WHERE $1::fund_type IS NULL OR fund = $1
        ORDER BY deadline, id
        "#,
    )
    .bind(fund)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<FundingGoal> {
    sqlx::query_as::<_, FundingGoal>(
        r#"
        SELECT id, description, target_amount, raised_amount, deadline, fund, completed,
               created_at, updated_at
        FROM funding_goals WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::GoalNotFound, id))
}

/// A goal created already funded (`raised >= target`) starts completed
pub async fn create(pool: &PgPool, data: &NewGoal) -> ServiceResult<FundingGoal> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let goal = sqlx::query_as::<_, FundingGoal>(
        r#"
        INSERT INTO funding_goals (
            id, description, target_amount, raised_amount, deadline, fund, completed,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $4 >= $3, $7, $7)
        RETURNING id, description, target_amount, raised_amount, deadline, fund, completed,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&data.description)
    .bind(data.target_amount)
    .bind(data.raised_amount)
    .bind(data.deadline)
    .bind(data.fund)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::info!(goal_id = id, fund = %data.fund, target = %data.target_amount, "Goal created");
    Ok(goal)
}

/// Partial update. Lowering the target clamps the raised amount to it; a
/// completed goal stays fully funded at its new target.
pub async fn update(pool: &PgPool, id: i64, data: &FundingGoalUpdate) -> ServiceResult<FundingGoal> {
    sqlx::query_as::<_, FundingGoal>(
        r#"
        UPDATE funding_goals SET
            description = COALESCE($1, description),
            target_amount = COALESCE($2, target_amount),
            raised_amount = CASE
                WHEN completed THEN COALESCE($2, target_amount)
                ELSE LEAST(raised_amount, COALESCE($2, target_amount))
            END,
            deadline = COALESCE($3, deadline),
            fund = COALESCE($4, fund),
            updated_at = $5
        WHERE id = $6
        RETURNING id, description, target_amount, raised_amount, deadline, fund, completed,
                  created_at, updated_at
        "#,
    )
    .bind(data.description.as_deref().map(str::trim))
    .bind(data.target_amount)
    .bind(data.deadline)
    .bind(data.fund)
    .bind(shared::util::now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::GoalNotFound, id))
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM funding_goals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::GoalNotFound, id));
    }
    tracing::info!(goal_id = id, "Goal deleted");
    Ok(())
}

/// Mark a goal as reached: raised = target, and later recalculations skip it
pub async fn complete(pool: &PgPool, id: i64) -> ServiceResult<FundingGoal> {
    let goal = sqlx::query_as::<_, FundingGoal>(
        r#"
        UPDATE funding_goals SET
            raised_amount = target_amount,
            completed = TRUE,
            updated_at = $1
        WHERE id = $2
        RETURNING id, description, target_amount, raised_amount, deadline, fund, completed,
                  created_at, updated_at
        "#,
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::GoalNotFound, id))?;

    tracing::info!(goal_id = id, "Goal completed");
    Ok(goal)
}

/// Recompute `raised_amount` of every open goal of `fund` from the current
/// balance. Retried once when the store aborts the transaction.
pub async fn recalculate_progress(pool: &PgPool, fund: FundType) -> ServiceResult<GoalProgress> {
    match try_recalculate(pool, fund).await {
        Err(e) if e.is_conflict() => {
            tracing::warn!(fund = %fund, "Goal recalculation conflicted, retrying once");
            try_recalculate(pool, fund).await
        }
        other => other,
    }
}

/// Balance read, goal read and goal writes share one serializable
/// transaction under the fund lock
async fn try_recalculate(pool: &PgPool, fund: FundType) -> ServiceResult<GoalProgress> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    lock_fund(&mut tx, fund).await?;

    let balance = ledger::summary(&mut tx, fund).await?.balance;

    let goals = sqlx::query_as::<_, FundingGoal>(
        r#"
        SELECT id, description, target_amount, raised_amount, deadline, fund, completed,
               created_at, updated_at
        FROM funding_goals
        WHERE fund = $1
        ORDER BY deadline, id
        FOR UPDATE
        "#,
    )
    .bind(fund)
    .fetch_all(&mut *tx)
    .await?;

    let allocation = allocate(balance, &open_slots(&goals));
    let (ids, amounts): (Vec<i64>, Vec<Decimal>) = allocation.raised.iter().copied().unzip();

    if !ids.is_empty() {
        sqlx::query(
            r#"
            UPDATE funding_goals SET raised_amount = u.raised, updated_at = $3
            FROM (SELECT * FROM UNNEST($1::bigint[], $2::numeric[])) AS u(id, raised)
            WHERE funding_goals.id = u.id
            "#,
        )
        .bind(&ids)
        .bind(&amounts)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let updated: Vec<FundingGoal> = allocation
        .raised
        .iter()
        .filter_map(|(id, raised)| {
            goals.iter().find(|g| g.id == *id).map(|g| FundingGoal {
                raised_amount: *raised,
                updated_at: now,
                ..g.clone()
            })
        })
        .collect();

    tracing::info!(
        fund = %fund,
        balance = %balance,
        goals = updated.len(),
        consumed = %allocation.consumed,
        "Goal progress recalculated"
    );
    Ok(GoalProgress {
        balance,
        goals: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(description: &str, target: i64, raised: i64, day: u32) -> NewGoal {
        NewGoal {
            description: description.to_string(),
            target_amount: Decimal::from(target),
            raised_amount: Decimal::from(raised),
            deadline: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            fund: FundType::Lounge,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn funded_goal_is_created_completed(pool: PgPool) {
        let funded = create(&pool, &goal("Micro-ondas", 600, 600, 10)).await.unwrap();
        assert!(funded.completed);
        let open = create(&pool, &goal("Sofá", 500, 100, 20)).await.unwrap();
        assert!(!open.completed);

        // empty ledger: open goals drop to zero, the funded one is untouched
        let progress = recalculate_progress(&pool, FundType::Lounge).await.unwrap();
        assert_eq!(progress.balance, Decimal::ZERO);
        assert_eq!(progress.goals.len(), 1);
        assert_eq!(progress.goals[0].id, open.id);
        assert_eq!(progress.goals[0].raised_amount, Decimal::ZERO);

        let funded = find(&pool, funded.id).await.unwrap();
        assert_eq!(funded.raised_amount, Decimal::from(600));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn completed_goal_follows_a_new_target(pool: PgPool) {
        let created = create(&pool, &goal("Micro-ondas", 600, 0, 10)).await.unwrap();
        complete(&pool, created.id).await.unwrap();

        let raise = FundingGoalUpdate {
            target_amount: Some(Decimal::from(800)),
            ..Default::default()
        };
        let updated = update(&pool, created.id, &raise).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.raised_amount, Decimal::from(800));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn lowering_target_clamps_open_goal(pool: PgPool) {
        let created = create(&pool, &goal("Sofá", 500, 300, 20)).await.unwrap();

        let lower = FundingGoalUpdate {
            target_amount: Some(Decimal::from(200)),
            ..Default::default()
        };
        let updated = update(&pool, created.id, &lower).await.unwrap();
        assert!(!updated.completed);
        assert_eq!(updated.raised_amount, Decimal::from(200));
    }
}
