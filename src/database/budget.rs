use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::budget::Budget;
use crate::util::Month;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    user_id: Uuid,
    month: String,
    amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = AppError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        let month = row
            .month
            .parse::<Month>()
            .map_err(|e| AppError::db("Invalid stored budget month", sqlx::Error::Decode(Box::new(e))))?;

        Ok(Budget {
            id: row.id,
            user_id: row.user_id,
            month,
            amount: row.amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait::async_trait]
pub trait BudgetRepository {
    async fn get_budget(&self, month: &Month, user_id: &Uuid) -> Result<Option<Budget>, AppError>;
    /// Creates the month's budget or replaces its amount.
    async fn upsert_budget(&self, month: &Month, amount: Decimal, user_id: &Uuid) -> Result<Budget, AppError>;
}

#[async_trait::async_trait]
impl BudgetRepository for PostgresRepository {
    async fn get_budget(&self, month: &Month, user_id: &Uuid) -> Result<Option<Budget>, AppError> {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            SELECT id, user_id, month, amount, created_at, updated_at
            FROM budget
            WHERE user_id = $1 AND month = $2
            "#,
        )
        .bind(user_id)
        .bind(month.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Budget::try_from).transpose()
    }

    async fn upsert_budget(&self, month: &Month, amount: Decimal, user_id: &Uuid) -> Result<Budget, AppError> {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            INSERT INTO budget (user_id, month, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, month)
            DO UPDATE SET amount = EXCLUDED.amount, updated_at = now()
            RETURNING id, user_id, month, amount, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(month.to_string())
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Budget::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRepository;
    use rust_decimal_macros::dec;

    fn row(month: &str) -> BudgetRow {
        BudgetRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            month: month.to_string(),
            amount: dec!(1000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion_parses_month() {
        let budget = Budget::try_from(row("2024-03")).unwrap();
        assert_eq!(budget.month, Month::new(2024, 3).unwrap());
    }

    #[test]
    fn test_row_conversion_rejects_bad_month() {
        assert!(Budget::try_from(row("March")).is_err());
    }

    #[tokio::test]
    async fn test_mock_upsert_budget_replaces_amount() {
        let repo = MockRepository::default();
        let user_id = Uuid::new_v4();
        let month = Month::new(2024, 3).unwrap();

        let created = repo.upsert_budget(&month, dec!(500), &user_id).await.unwrap();
        let updated = repo.upsert_budget(&month, dec!(750), &user_id).await.unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.amount, dec!(750));
        let fetched = repo.get_budget(&month, &user_id).await.unwrap().unwrap();
        assert_eq!(fetched.amount, dec!(750));
    }

    #[tokio::test]
    async fn test_mock_get_budget_is_scoped() {
        let repo = MockRepository::default();
        let month = Month::new(2024, 3).unwrap();
        repo.upsert_budget(&month, dec!(500), &Uuid::new_v4()).await.unwrap();

        assert!(repo.get_budget(&month, &Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.get_budget(&Month::new(2024, 4).unwrap(), &Uuid::new_v4()).await.unwrap().is_none());
    }
}
