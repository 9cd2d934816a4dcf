use crate::models::budget_summary::CategoryAmount;
use crate::models::dashboard::TotalsResponse;
use crate::models::expense::ExpenseCategory;
use chrono::NaiveDate;
use rocket::serde::Serialize;
use schemars::JsonSchema;

/// Date range and category filter for a report. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ReportResponse {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
    pub totals: TotalsResponse,
    pub categories: Vec<CategoryAmount>,
}
