use crate::models::entry::validate_entry_amount;
use crate::util::{deserialize_amount, deserialize_optional_date};
use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Income {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct IncomeRequest {
    #[serde(deserialize_with = "deserialize_amount")]
    #[validate(custom(function = "validate_entry_amount"))]
    pub amount: Decimal,
    #[validate(length(min = 2, max = 120))]
    pub source: String,
    /// Defaults to today when omitted.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub note: Option<String>,
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct IncomeResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl From<&Income> for IncomeResponse {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id,
            amount: income.amount,
            source: income.source.clone(),
            date: income.date,
            note: income.note.clone(),
        }
    }
}
