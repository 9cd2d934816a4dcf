use crate::config::DisplayConfig;
use crate::database::budget::BudgetRepository;
use crate::database::dashboard::TotalsRepository;
use crate::database::expense::ExpenseRepository;
use crate::database::income::IncomeRepository;
use crate::error::app_error::AppError;
use crate::models::budget::Budget;
use crate::models::budget_summary::BudgetSummary;
use crate::models::dashboard::{BudgetProgressResponse, DashboardResponse, Totals, TotalsResponse};
use crate::models::expense::{Expense, ExpenseResponse};
use crate::models::income::{Income, IncomeResponse};
use crate::service::budget_summary::{category_breakdown, progress_label, summarize};
use crate::util::Month;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

pub struct DashboardService<'a, R> {
    repository: &'a R,
    display: &'a DisplayConfig,
}

impl<'a, R> DashboardService<'a, R>
where
    R: IncomeRepository + ExpenseRepository + BudgetRepository + TotalsRepository + Sync,
{
    pub fn new(repository: &'a R, display: &'a DisplayConfig) -> Self {
        Self { repository, display }
    }

    pub async fn totals(&self, user_id: &Uuid) -> Result<TotalsResponse, AppError> {
        Ok(TotalsResponse::from(&self.repository.get_totals(user_id).await?))
    }

    /// Spending summary for one month against that month's budget, if any.
    pub async fn month_summary(&self, month: &Month, user_id: &Uuid) -> Result<(BudgetSummary, Option<Budget>), AppError> {
        let (first_day, last_day) = month.range();
        let expenses = self
            .repository
            .list_expenses_between(Some(first_day), Some(last_day), None, user_id)
            .await?;
        let budget = self.repository.get_budget(month, user_id).await?;

        debug!(month = %month, expenses = expenses.len(), budget_set = budget.is_some(), "summarizing month");
        let amount = budget.as_ref().map(|b| b.amount).unwrap_or(Decimal::ZERO);
        Ok((summarize(&expenses, amount), budget))
    }

    pub async fn dashboard_response(&self, month: &Month, user_id: &Uuid) -> Result<DashboardResponse, AppError> {
        let totals = self.repository.get_totals(user_id).await?;
        let recent_incomes = self.repository.recent_incomes(self.display.recent_entries, user_id).await?;
        let recent_expenses = self.repository.recent_expenses(self.display.recent_entries, user_id).await?;
        let (summary, budget) = self.month_summary(month, user_id).await?;

        Ok(dashboard_from_data(
            month,
            &totals,
            &recent_incomes,
            &recent_expenses,
            &summary,
            budget.is_some(),
            &self.display.currency_symbol,
        ))
    }
}

pub fn budget_progress_from_summary(month: &Month, summary: &BudgetSummary, budget_set: bool, currency: &str) -> BudgetProgressResponse {
    BudgetProgressResponse {
        month: month.to_string(),
        budget_set,
        budget_amount: summary.budget_amount,
        total_spent: summary.total_spent,
        percent_used: summary.percent_used,
        is_over: summary.is_over,
        label: progress_label(summary, currency),
    }
}

fn dashboard_from_data(
    month: &Month,
    totals: &Totals,
    recent_incomes: &[Income],
    recent_expenses: &[Expense],
    summary: &BudgetSummary,
    budget_set: bool,
    currency: &str,
) -> DashboardResponse {
    DashboardResponse {
        month: month.to_string(),
        totals: TotalsResponse::from(totals),
        recent_incomes: recent_incomes.iter().map(IncomeResponse::from).collect(),
        recent_expenses: recent_expenses.iter().map(ExpenseResponse::from).collect(),
        budget: budget_progress_from_summary(month, summary, budget_set, currency),
        categories: category_breakdown(summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::ExpenseCategory;
    use crate::test_utils::{MockRepository, sample_expense_for, sample_income};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn january() -> Month {
        Month::new(2024, 1).unwrap()
    }

    fn seeded(user_id: &Uuid) -> MockRepository {
        let repo = MockRepository::default();
        repo.insert_income(sample_income(user_id, dec!(3000)));
        repo.insert_expense(sample_expense_for(user_id, ExpenseCategory::Food, dec!(40)));
        repo.insert_expense(sample_expense_for(user_id, ExpenseCategory::Food, dec!(10)));
        repo.insert_expense(sample_expense_for(user_id, ExpenseCategory::Bills, dec!(30)));

        let mut december = sample_expense_for(user_id, ExpenseCategory::Travel, dec!(500));
        december.date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        repo.insert_expense(december);
        repo
    }

    #[tokio::test]
    async fn test_month_summary_only_counts_the_month() {
        let user_id = Uuid::new_v4();
        let repo = seeded(&user_id);
        let display = DisplayConfig::default();
        let service = DashboardService::new(&repo, &display);
        repo.upsert_budget(&january(), dec!(100), &user_id).await.unwrap();

        let (summary, budget) = service.month_summary(&january(), &user_id).await.unwrap();

        assert!(budget.is_some());
        assert_eq!(summary.total_spent, dec!(80));
        assert_eq!(summary.percent_used, 80);
        assert!(!summary.is_over);
        assert!(!summary.by_category.contains_key(&ExpenseCategory::Travel));
    }

    #[tokio::test]
    async fn test_dashboard_response_without_budget() {
        let user_id = Uuid::new_v4();
        let repo = seeded(&user_id);
        let display = DisplayConfig::default();
        let service = DashboardService::new(&repo, &display);

        let response = service.dashboard_response(&january(), &user_id).await.unwrap();

        assert_eq!(response.month, "2024-01");
        assert_eq!(response.totals.income, dec!(3000));
        assert_eq!(response.totals.expense, dec!(580));
        assert_eq!(response.totals.balance, dec!(2420));
        assert_eq!(response.recent_incomes.len(), 1);
        assert_eq!(response.recent_expenses.len(), 4);
        assert!(!response.budget.budget_set);
        assert_eq!(response.budget.budget_amount, Decimal::ZERO);
        assert_eq!(response.budget.percent_used, 100);
        assert!(response.budget.is_over);
        assert_eq!(response.categories.len(), 2);
        assert_eq!(response.categories[0].category, ExpenseCategory::Food);
    }

    #[tokio::test]
    async fn test_recent_entries_are_capped() {
        let user_id = Uuid::new_v4();
        let repo = MockRepository::default();
        for _ in 0..8 {
            repo.insert_income(sample_income(&user_id, dec!(1)));
        }
        let display = DisplayConfig::default();
        let service = DashboardService::new(&repo, &display);

        let response = service.dashboard_response(&january(), &user_id).await.unwrap();
        assert_eq!(response.recent_incomes.len(), display.recent_entries as usize);
    }

    #[test]
    fn test_budget_progress_label_uses_currency() {
        let summary = summarize(&[], dec!(2000));
        let progress = budget_progress_from_summary(&january(), &summary, true, "$");
        assert_eq!(progress.label, "0% • $0.00 of $2,000.00");
        assert_eq!(progress.month, "2024-01");
    }
}
