use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use emi_catalog::EmiPlan;
use emi_core::{CoreError, CoreResult, EmiPlanRepository};

pub struct StoreEmiPlanRepository {
    pool: PgPool,
}

impl StoreEmiPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EmiPlanRow {
    id: Uuid,
    product_id: Uuid,
    monthly_amount: f64,
    tenure_months: i32,
    interest_rate: f64,
    cashback: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmiPlanRow> for EmiPlan {
    fn from(row: EmiPlanRow) -> Self {
        EmiPlan {
            id: row.id,
            monthly_amount: row.monthly_amount,
            tenure_months: row.tenure_months,
            interest_rate: row.interest_rate,
            cashback: row.cashback,
            product_id: row.product_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EmiPlanRepository for StoreEmiPlanRepository {
    async fn create_plans(&self, product_id: Uuid, plans: &[EmiPlan]) -> CoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(CoreError::storage)?;

        // Lock the owner so the back-reference list can't be rewritten underneath us
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(CoreError::storage)?;
        if owner.is_none() {
            return Err(CoreError::not_found("Product", product_id));
        }

        for plan in plans {
            sqlx::query(
                r#"
                INSERT INTO emi_plans (id, product_id, monthly_amount, tenure_months, interest_rate, cashback, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(plan.id)
            .bind(product_id)
            .bind(plan.monthly_amount)
            .bind(plan.tenure_months)
            .bind(plan.interest_rate)
            .bind(&plan.cashback)
            .bind(plan.created_at)
            .bind(plan.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::storage)?;
        }

        let ids: Vec<Uuid> = plans.iter().map(|plan| plan.id).collect();
        sqlx::query(
            "UPDATE products SET emi_plan_ids = emi_plan_ids || $2::uuid[], updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::storage)?;

        tx.commit().await.map_err(CoreError::storage)?;
        Ok(())
    }

    async fn list_plans(&self, product_id: Uuid) -> CoreResult<Vec<EmiPlan>> {
        let rows = sqlx::query_as::<_, EmiPlanRow>(
            r#"
            SELECT id, product_id, monthly_amount, tenure_months, interest_rate, cashback, created_at, updated_at
            FROM emi_plans
            WHERE product_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::storage)?;

        Ok(rows.into_iter().map(EmiPlan::from).collect())
    }

    async fn delete_plan(&self, product_id: Uuid, plan_id: Uuid) -> CoreResult<bool> {
        let mut tx = self.pool.begin().await.map_err(CoreError::storage)?;

        let result = sqlx::query("DELETE FROM emi_plans WHERE id = $1 AND product_id = $2")
            .bind(plan_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::storage)?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE products SET emi_plan_ids = array_remove(emi_plan_ids, $1), updated_at = NOW() WHERE id = $2",
        )
        .bind(plan_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::storage)?;

        tx.commit().await.map_err(CoreError::storage)?;
        Ok(true)
    }

    async fn delete_all_plans(&self) -> CoreResult<u64> {
        let mut tx = self.pool.begin().await.map_err(CoreError::storage)?;

        let result = sqlx::query("DELETE FROM emi_plans")
            .execute(&mut *tx)
            .await
            .map_err(CoreError::storage)?;
        sqlx::query("UPDATE products SET emi_plan_ids = '{}' WHERE cardinality(emi_plan_ids) > 0")
            .execute(&mut *tx)
            .await
            .map_err(CoreError::storage)?;

        tx.commit().await.map_err(CoreError::storage)?;
        Ok(result.rows_affected())
    }

    async fn count_plans(&self) -> CoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emi_plans")
            .fetch_one(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(count as u64)
    }
}
