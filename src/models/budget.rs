use crate::models::entry::validate_amount_within_storage;
use crate::util::{Month, deserialize_amount};
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub month: Month,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct BudgetRequest {
    /// `YYYY-MM`; defaults to the current month.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub month: Option<Month>,
    #[serde(deserialize_with = "deserialize_amount")]
    #[validate(custom(function = "validate_budget_amount"))]
    pub amount: Decimal,
}

fn validate_budget_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("budget_must_be_positive"));
    }
    validate_amount_within_storage(amount)
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct BudgetResponse {
    pub id: Uuid,
    pub month: String,
    pub amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<&Budget> for BudgetResponse {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            month: budget.month.to_string(),
            amount: budget.amount,
            updated_at: budget.updated_at,
        }
    }
}
