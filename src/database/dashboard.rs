use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::dashboard::Totals;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait TotalsRepository {
    /// All-time income and expense sums; zero when nothing is recorded.
    async fn get_totals(&self, user_id: &Uuid) -> Result<Totals, AppError>;
}

#[async_trait::async_trait]
impl TotalsRepository for PostgresRepository {
    async fn get_totals(&self, user_id: &Uuid) -> Result<Totals, AppError> {
        let totals = sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM income WHERE user_id = $1) AS income,
                (SELECT COALESCE(SUM(amount), 0) FROM expense WHERE user_id = $1) AS expense
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }
}
