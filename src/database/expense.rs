use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::entry::{entry_date_or_today, normalize_note};
use crate::models::expense::{Expense, ExpenseCategory, ExpenseRequest};
use crate::models::pagination::PaginationParams;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    category: String,
    date: NaiveDate,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            category: expense_category_from_db(&row.category),
            date: row.date,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Rows written before the category check existed may hold free text; those read as `Others`.
pub fn expense_category_from_db<T: AsRef<str>>(value: T) -> ExpenseCategory {
    value.as_ref().parse().unwrap_or_else(|_| {
        warn!(category = %value.as_ref(), "unknown expense category in database");
        ExpenseCategory::Others
    })
}

const EXPENSE_SELECT_FIELDS: &str = "id, user_id, amount, category, date, note, created_at";

#[async_trait::async_trait]
pub trait ExpenseRepository {
    async fn create_expense(&self, request: &ExpenseRequest, user_id: &Uuid) -> Result<Expense, AppError>;
    /// Newest first.
    async fn list_expenses(&self, params: &PaginationParams, user_id: &Uuid) -> Result<(Vec<Expense>, i64), AppError>;
    async fn recent_expenses(&self, limit: i64, user_id: &Uuid) -> Result<Vec<Expense>, AppError>;
    /// Oldest first; open bounds are unbounded and `None` matches every category.
    async fn list_expenses_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        category: Option<ExpenseCategory>,
        user_id: &Uuid,
    ) -> Result<Vec<Expense>, AppError>;
    async fn delete_expense(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl ExpenseRepository for PostgresRepository {
    async fn create_expense(&self, request: &ExpenseRequest, user_id: &Uuid) -> Result<Expense, AppError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            INSERT INTO expense (user_id, amount, category, date, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EXPENSE_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(request.amount)
        .bind(request.category.as_str())
        .bind(entry_date_or_today(request.date))
        .bind(normalize_note(request.note.as_deref()))
        .fetch_one(&self.pool)
        .await?;

        Ok(Expense::from(row))
    }

    async fn list_expenses(&self, params: &PaginationParams, user_id: &Uuid) -> Result<(Vec<Expense>, i64), AppError> {
        #[derive(sqlx::FromRow)]
        struct CountRow {
            total: i64,
        }

        let count_row = sqlx::query_as::<_, CountRow>("SELECT COUNT(*) as total FROM expense WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {}
            FROM expense
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            EXPENSE_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(params.effective_limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Expense::from).collect(), count_row.total))
    }

    async fn recent_expenses(&self, limit: i64, user_id: &Uuid) -> Result<Vec<Expense>, AppError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {}
            FROM expense
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
            EXPENSE_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn list_expenses_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        category: Option<ExpenseCategory>,
        user_id: &Uuid,
    ) -> Result<Vec<Expense>, AppError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {}
            FROM expense
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::text IS NULL OR category = $4)
            ORDER BY date ASC, created_at ASC
            "#,
            EXPENSE_SELECT_FIELDS
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn delete_expense(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM expense WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense not found".to_string()));
        }

        Ok(())
    }
}
