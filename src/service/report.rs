use crate::database::expense::ExpenseRepository;
use crate::database::income::IncomeRepository;
use crate::error::app_error::AppError;
use crate::models::dashboard::{Totals, TotalsResponse};
use crate::models::expense::{Expense, ExpenseCategory};
use crate::models::income::Income;
use crate::models::report::{ReportFilter, ReportResponse};
use crate::service::budget_summary::{category_breakdown, summarize};
use crate::util::parse_date;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Builds a filter from raw query values. `category` may be `all` or blank for no filter.
pub fn parse_report_filter(start_date: Option<&str>, end_date: Option<&str>, category: Option<&str>) -> Result<ReportFilter, AppError> {
    let parse_bound = |value: Option<&str>, name: &str| -> Result<_, AppError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => parse_date(v).map(Some).map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", name, e))),
            None => Ok(None),
        }
    };

    let start_date = parse_bound(start_date, "start_date")?;
    let end_date = parse_bound(end_date, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date)
        && start > end
    {
        return Err(AppError::BadRequest("start_date must not be after end_date".to_string()));
    }

    let category = match category.map(str::trim).filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all")) {
        Some(c) => Some(c.parse::<ExpenseCategory>().map_err(AppError::BadRequest)?),
        None => None,
    };

    Ok(ReportFilter {
        start_date,
        end_date,
        category,
    })
}

pub async fn build_report<R>(repository: &R, filter: &ReportFilter, user_id: &Uuid) -> Result<ReportResponse, AppError>
where
    R: IncomeRepository + ExpenseRepository + Sync,
{
    let incomes = repository.list_incomes_between(filter.start_date, filter.end_date, user_id).await?;
    let expenses = repository
        .list_expenses_between(filter.start_date, filter.end_date, filter.category, user_id)
        .await?;

    Ok(report_from_data(filter, &incomes, &expenses))
}

/// Incomes are never narrowed by the category filter.
fn report_from_data(filter: &ReportFilter, incomes: &[Income], expenses: &[Expense]) -> ReportResponse {
    let summary = summarize(expenses, Decimal::ZERO);
    let totals = Totals {
        income: incomes.iter().map(|i| i.amount).sum(),
        expense: summary.total_spent,
    };

    ReportResponse {
        start_date: filter.start_date,
        end_date: filter.end_date,
        category: filter.category,
        totals: TotalsResponse::from(&totals),
        categories: category_breakdown(&summary),
    }
}
