use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::entry::{entry_date_or_today, normalize_note};
use crate::models::income::{Income, IncomeRequest};
use crate::models::pagination::PaginationParams;
use chrono::NaiveDate;
use uuid::Uuid;

const INCOME_SELECT_FIELDS: &str = "id, user_id, amount, source, date, note, created_at";

#[async_trait::async_trait]
pub trait IncomeRepository {
    async fn create_income(&self, request: &IncomeRequest, user_id: &Uuid) -> Result<Income, AppError>;
    /// Newest first.
    async fn list_incomes(&self, params: &PaginationParams, user_id: &Uuid) -> Result<(Vec<Income>, i64), AppError>;
    async fn recent_incomes(&self, limit: i64, user_id: &Uuid) -> Result<Vec<Income>, AppError>;
    /// Oldest first; open bounds are unbounded.
    async fn list_incomes_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>, user_id: &Uuid) -> Result<Vec<Income>, AppError>;
    async fn delete_income(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl IncomeRepository for PostgresRepository {
    async fn create_income(&self, request: &IncomeRequest, user_id: &Uuid) -> Result<Income, AppError> {
        let income = sqlx::query_as::<_, Income>(&format!(
            r#"
            INSERT INTO income (user_id, amount, source, date, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            INCOME_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(request.amount)
        .bind(request.source.trim())
        .bind(entry_date_or_today(request.date))
        .bind(normalize_note(request.note.as_deref()))
        .fetch_one(&self.pool)
        .await?;

        Ok(income)
    }

    async fn list_incomes(&self, params: &PaginationParams, user_id: &Uuid) -> Result<(Vec<Income>, i64), AppError> {
        #[derive(sqlx::FromRow)]
        struct CountRow {
            total: i64,
        }

        let count_row = sqlx::query_as::<_, CountRow>("SELECT COUNT(*) as total FROM income WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let incomes = sqlx::query_as::<_, Income>(&format!(
            r#"
            SELECT {}
            FROM income
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            INCOME_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(params.effective_limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((incomes, count_row.total))
    }

    async fn recent_incomes(&self, limit: i64, user_id: &Uuid) -> Result<Vec<Income>, AppError> {
        let incomes = sqlx::query_as::<_, Income>(&format!(
            r#"
            SELECT {}
            FROM income
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
            INCOME_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(incomes)
    }

    async fn list_incomes_between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>, user_id: &Uuid) -> Result<Vec<Income>, AppError> {
        let incomes = sqlx::query_as::<_, Income>(&format!(
            r#"
            SELECT {}
            FROM income
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date ASC, created_at ASC
            "#,
            INCOME_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(incomes)
    }

    async fn delete_income(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM income WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Income not found".to_string()));
        }

        Ok(())
    }
}
