use crate::models::budget_summary::{BudgetSummary, CategoryAmount};
use crate::models::expense::{Expense, ExpenseCategory};
use crate::util::format_amount;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Aggregates a period's expenses against a stated budget.
///
/// `expenses` are expected to be pre-filtered to one user and one period.
/// A budget of zero or less is treated as a denominator of one, so any
/// positive spending reads as fully used. The returned `budget_amount`
/// echoes the stated amount, never that substitute.
pub fn summarize(expenses: &[Expense], budget_amount: Decimal) -> BudgetSummary {
    let mut by_category: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category).or_insert(Decimal::ZERO) += expense.amount;
    }
    let total_spent: Decimal = by_category.values().copied().sum();

    let denominator = if budget_amount > Decimal::ZERO { budget_amount } else { Decimal::ONE };
    let ratio = total_spent
        .checked_mul(ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(denominator))
        .unwrap_or(Decimal::MAX);

    BudgetSummary {
        total_spent,
        by_category,
        budget_amount: budget_amount.max(Decimal::ZERO),
        percent_used: clamp_percent(ratio),
        is_over: ratio >= ONE_HUNDRED,
    }
}

/// Rounds half-to-even and clamps into `0..=100`.
fn clamp_percent(ratio: Decimal) -> u8 {
    ratio.round().clamp(Decimal::ZERO, ONE_HUNDRED).to_u8().unwrap_or(100)
}

/// Legend and chart rows, one per category present in the summary, in category order.
pub fn category_breakdown(summary: &BudgetSummary) -> Vec<CategoryAmount> {
    summary
        .by_category
        .iter()
        .map(|(category, amount)| CategoryAmount {
            category: *category,
            amount: *amount,
            color: category.color(),
            icon: category.icon(),
        })
        .collect()
}

pub fn progress_label(summary: &BudgetSummary, currency: &str) -> String {
    format!(
        "{}% • {} of {}",
        summary.percent_used,
        format_amount(summary.total_spent, currency),
        format_amount(summary.budget_amount, currency)
    )
}
