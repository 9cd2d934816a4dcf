use crate::models::expense::ExpenseCategory;
use rocket::serde::Serialize;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use std::collections::BTreeMap;

/// Spending aggregate for one user and period, computed per request.
#[derive(Serialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct BudgetSummary {
    pub total_spent: Decimal,
    /// Only categories with at least one expense appear here.
    pub by_category: BTreeMap<ExpenseCategory, Decimal>,
    /// The stated budget, zero when none was set.
    pub budget_amount: Decimal,
    /// Always within `0..=100`.
    pub percent_used: u8,
    pub is_over: bool,
}

/// One legend/chart row.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct CategoryAmount {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub color: &'static str,
    pub icon: &'static str,
}
