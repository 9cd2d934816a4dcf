use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use validator::ValidationError;

/// Which side of the ledger a recorded entry sits on.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Smallest amount accepted for a new income or expense.
pub const MIN_ENTRY_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a `NUMERIC(12, 2)` column holds: 9,999,999,999.99.
pub const MAX_ENTRY_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rejects amounts the amount columns cannot store.
pub fn validate_amount_within_storage(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount > MAX_ENTRY_AMOUNT {
        return Err(ValidationError::new("amount_too_large"));
    }
    Ok(())
}

pub fn validate_entry_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < MIN_ENTRY_AMOUNT {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    validate_amount_within_storage(amount)
}

/// Entries recorded without a date are booked on today's (UTC) date.
pub fn entry_date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

/// Trims a free-text note, dropping it when nothing is left.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn min_entry_amount_is_one_cent() {
        assert_eq!(MIN_ENTRY_AMOUNT, dec!(0.01));
    }

    #[test]
    fn max_entry_amount_fits_numeric_12_2() {
        assert_eq!(MAX_ENTRY_AMOUNT, dec!(9999999999.99));
    }

    #[test]
    fn validate_entry_amount_bounds() {
        assert!(validate_entry_amount(&dec!(0.01)).is_ok());
        assert!(validate_entry_amount(&dec!(250)).is_ok());
        assert!(validate_entry_amount(&dec!(9999999999.99)).is_ok());
        assert!(validate_entry_amount(&dec!(0)).is_err());
        assert!(validate_entry_amount(&dec!(-5)).is_err());
        assert!(validate_entry_amount(&dec!(10000000000)).is_err());
        assert!(validate_entry_amount(&dec!(10000000000000)).is_err());
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let given = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(entry_date_or_today(Some(given)), given);
        assert_eq!(entry_date_or_today(None), Utc::now().date_naive());
    }

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(normalize_note(Some("  lunch ")), Some("lunch".to_string()));
        assert_eq!(normalize_note(Some("   ")), None);
        assert_eq!(normalize_note(None), None);
    }

    #[test]
    fn expense_sorts_before_income() {
        assert!(EntryKind::Expense < EntryKind::Income);
        assert_eq!(EntryKind::Income.as_str(), "income");
    }
}
