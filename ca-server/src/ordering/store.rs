//! PostgreSQL execution of reorder plans and appends
//!
//! Appends and reorders of one table take the same transaction-scoped
//! advisory lock, so a create can never interleave with a reorder of the
//! same collection. Reorders additionally run SERIALIZABLE and are retried
//! once when the store aborts them.

use shared::error::AppError;
use sqlx::{PgConnection, PgPool};

use super::{OrderedCollection, ReorderPlan, Scope, plan_reorder};
use crate::error::{ServiceError, ServiceResult};

/// Take the collection's advisory lock until the surrounding transaction ends
pub async fn lock<C: OrderedCollection>(conn: &mut PgConnection) -> ServiceResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(C::LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Position for a new row appended to `scope`: the current row count.
///
/// Call inside the transaction that inserts the row.
pub async fn append_position<C: OrderedCollection>(
    conn: &mut PgConnection,
    scope: &Scope,
) -> ServiceResult<i32> {
    lock::<C>(conn).await?;
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        C::TABLE,
        C::SCOPE_EXPR
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(scope.key())
        .fetch_one(&mut *conn)
        .await?;
    Ok(count as i32)
}

/// Rewrite the positions of one scope from a client-supplied order.
///
/// With `scope` set, only rows of that scope are candidates (ids elsewhere
/// are unknown). Without it the scope is resolved from the ids themselves.
pub async fn reorder<C: OrderedCollection>(
    pool: &PgPool,
    scope: Option<&Scope>,
    ids: &[i64],
) -> ServiceResult<ReorderPlan<String>> {
    match try_reorder::<C>(pool, scope, ids).await {
        Err(e) if e.is_conflict() => {
            tracing::warn!(collection = C::LABEL, "Reorder conflicted, retrying once");
            try_reorder::<C>(pool, scope, ids).await
        }
        other => other,
    }
}

async fn try_reorder<C: OrderedCollection>(
    pool: &PgPool,
    scope: Option<&Scope>,
    ids: &[i64],
) -> ServiceResult<ReorderPlan<String>> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;
    lock::<C>(&mut tx).await?;

    let rows: Vec<(i64, String)> = match scope {
        Some(scope) => {
            let sql = format!(
                "SELECT id, {expr} FROM {table} WHERE {expr} = $1",
                expr = C::SCOPE_EXPR,
                table = C::TABLE
            );
            sqlx::query_as(&sql)
                .bind(scope.key())
                .fetch_all(&mut *tx)
                .await?
        }
        None => {
            let sql = format!("SELECT id, {} FROM {}", C::SCOPE_EXPR, C::TABLE);
            sqlx::query_as(&sql).fetch_all(&mut *tx).await?
        }
    };

    let plan = plan_reorder(&rows, ids).map_err(|e| ServiceError::App(AppError::from(e)))?;

    let sql = format!(
        r#"UPDATE {table} SET position = u.position, updated_at = $3
        FROM (SELECT * FROM UNNEST($1::bigint[], $2::integer[])) AS u(id, position)
        WHERE {table}.id = u.id"#,
        table = C::TABLE
    );
    sqlx::query(&sql)
        .bind(&plan.ids)
        .bind(&plan.positions)
        .bind(shared::util::now_millis())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        collection = C::LABEL,
        scope = %plan.scope,
        count = plan.len(),
        "Collection reordered"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::banners::{self, Banners};
    use crate::db::members::{self, NewMember};
    use crate::media::ImagePayload;
    use shared::error::ErrorCode;
    use shared::models::{BannerCreate, MemberStatus, MemberUpdate};

    fn banner(title: &str) -> BannerCreate {
        BannerCreate {
            title: title.to_string(),
            description: None,
            link: None,
            kind: None,
            active: None,
            image: None,
        }
    }

    fn member(name: &str, cohort: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            role: "Diretor".to_string(),
            area: "Eventos".to_string(),
            description: "Organiza a semana acadêmica".to_string(),
            contact: None,
            cohort: cohort.to_string(),
            status: MemberStatus::Current,
            active: true,
            photo: ImagePayload {
                mime: "image/png".to_string(),
                base64: "AAAA".to_string(),
                size: 3,
            },
        }
    }

    async fn banner_positions(pool: &PgPool) -> Vec<(i64, i32)> {
        sqlx::query_as("SELECT id, position FROM banners ORDER BY id")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn appends_take_the_next_position(pool: PgPool) {
        for i in 0..4 {
            let created = banners::create(&pool, &banner(&format!("Banner {i}")), None)
                .await
                .unwrap();
            assert_eq!(created.position, i);
        }

        let mut tx = pool.begin().await.unwrap();
        let next = append_position::<Banners>(&mut tx, &Scope::Global).await.unwrap();
        assert_eq!(next, 4);
        tx.rollback().await.unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn rejected_reorder_leaves_positions_alone(pool: PgPool) {
        let mut ids = Vec::new();
        for i in 0..3 {
            ids.push(banners::create(&pool, &banner(&format!("Banner {i}")), None).await.unwrap().id);
        }
        let before = banner_positions(&pool).await;

        for (request, code) in [
            (vec![ids[2], ids[0]], ErrorCode::OrderingIncomplete),
            (vec![ids[2], ids[2], ids[0], ids[1]], ErrorCode::OrderingDuplicateId),
            (vec![ids[2], ids[0], ids[1], 42], ErrorCode::OrderingUnknownId),
            (vec![], ErrorCode::OrderingEmpty),
        ] {
            let err: AppError = reorder::<Banners>(&pool, Some(&Scope::Global), &request)
                .await
                .unwrap_err()
                .into();
            assert_eq!(err.code, code, "{request:?}");
            assert_eq!(banner_positions(&pool).await, before, "{request:?}");
        }

        reorder::<Banners>(&pool, Some(&Scope::Global), &[ids[2], ids[0], ids[1]])
            .await
            .unwrap();
        let listed: Vec<i64> = banners::list(&pool, false)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(listed, vec![ids[2], ids[0], ids[1]]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cohort_move_appends_at_target_count(pool: PgPool) {
        let moving = members::create(&pool, member("Ana", "2023/2024")).await.unwrap();
        members::create(&pool, member("Bruno", "2024/2025")).await.unwrap();
        members::create(&pool, member("Carla", "2024/2025")).await.unwrap();

        let update = MemberUpdate {
            cohort: Some("2024/2025".to_string()),
            ..Default::default()
        };
        let moved = members::update(&pool, moving.id, &update, None).await.unwrap();
        assert_eq!(moved.cohort, "2024/2025");
        assert_eq!(moved.position, 2);

        // staying in the same term keeps the position
        let update = MemberUpdate {
            cohort: Some("2024/2025".to_string()),
            name: Some("Ana Paula".to_string()),
            ..Default::default()
        };
        let renamed = members::update(&pool, moving.id, &update, None).await.unwrap();
        assert_eq!(renamed.position, 2);
    }
}
