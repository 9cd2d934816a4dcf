use crate::models::budget_summary::CategoryAmount;
use crate::models::expense::ExpenseResponse;
use crate::models::income::IncomeResponse;
use rocket::serde::Serialize;
use rust_decimal::Decimal;
use schemars::JsonSchema;

/// Sums of a user's recorded entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, sqlx::FromRow)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct TotalsResponse {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl From<&Totals> for TotalsResponse {
    fn from(totals: &Totals) -> Self {
        Self {
            income: totals.income,
            expense: totals.expense,
            balance: totals.balance(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct BudgetProgressResponse {
    pub month: String,
    /// False when no budget exists for the month; clients may hide the bar.
    pub budget_set: bool,
    pub budget_amount: Decimal,
    pub total_spent: Decimal,
    pub percent_used: u8,
    pub is_over: bool,
    pub label: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct DashboardResponse {
    pub month: String,
    pub totals: TotalsResponse,
    pub recent_incomes: Vec<IncomeResponse>,
    pub recent_expenses: Vec<ExpenseResponse>,
    pub budget: BudgetProgressResponse,
    pub categories: Vec<CategoryAmount>,
}
