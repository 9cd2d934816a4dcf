use crate::models::entry::validate_entry_amount;
use crate::util::{deserialize_amount, deserialize_optional_date};
use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, JsonSchema)]
pub enum ExpenseCategory {
    Food,
    Travel,
    Shopping,
    Bills,
    #[default]
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Food,
        ExpenseCategory::Travel,
        ExpenseCategory::Shopping,
        ExpenseCategory::Bills,
        ExpenseCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Bills => "Bills",
            ExpenseCategory::Others => "Others",
        }
    }

    /// Legend swatch color.
    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "#f472b6",
            ExpenseCategory::Travel => "#60a5fa",
            ExpenseCategory::Shopping => "#a78bfa",
            ExpenseCategory::Bills => "#fbbf24",
            ExpenseCategory::Others => "#9ca3af",
        }
    }

    /// Legend icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "utensils",
            ExpenseCategory::Travel => "plane",
            ExpenseCategory::Shopping => "shopping-bag",
            ExpenseCategory::Bills => "file-invoice",
            ExpenseCategory::Others => "ellipsis",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown expense category: {}", trimmed))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct ExpenseRequest {
    #[serde(deserialize_with = "deserialize_amount")]
    #[validate(custom(function = "validate_entry_amount"))]
    pub amount: Decimal,
    #[serde(default)]
    pub category: ExpenseCategory,
    /// Defaults to today when omitted.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub note: Option<String>,
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            note: expense.note.clone(),
        }
    }
}
