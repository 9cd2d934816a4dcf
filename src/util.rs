use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Everything that is not a digit, a sign, a separator or a parenthesis.
static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d\-.,()]+").expect("valid amount pattern"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("no numeric content in '{0}'")]
    NoDigits(String),
    #[error("could not convert '{0}' to an amount")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,
    #[error("unrecognized date format: '{0}'")]
    Unrecognized(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("month must be 'YYYY-MM', got '{0}'")]
pub struct MonthParseError(pub String);

/// Parses a human-entered amount such as `$1,234.56`, `1.234,56` or `(1,000)`.
///
/// Currency symbols and letters are dropped, parentheses negate the value and the
/// decimal separator is inferred when both `.` and `,` are present. The result is
/// rounded to cents.
pub fn parse_amount(value: &str) -> Result<Decimal, AmountParseError> {
    let original = value.trim();
    if original.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let mut cleaned = NON_NUMERIC.replace_all(original, "").into_owned();

    let negative = cleaned.contains('(') && cleaned.contains(')');
    if negative {
        cleaned.retain(|c| c != '(' && c != ')');
    }

    if cleaned.is_empty() {
        return Err(AmountParseError::NoDigits(original.to_string()));
    }

    match (cleaned.find('.'), cleaned.find(',')) {
        // 1.234,56
        (Some(dot), Some(comma)) if dot < comma => {
            cleaned = cleaned.replace('.', "").replace(',', ".");
        }
        (Some(_), Some(_)) | (None, Some(_)) => {
            cleaned = cleaned.replace(',', "");
        }
        _ => {}
    }

    if matches!(cleaned.as_str(), "" | "." | "-") {
        return Err(AmountParseError::NoDigits(original.to_string()));
    }

    if negative && !cleaned.starts_with('-') {
        cleaned.insert(0, '-');
    }

    let amount = Decimal::from_str(&cleaned).map_err(|_| AmountParseError::Invalid(original.to_string()))?;
    Ok(amount.round_dp(2))
}

/// Formats an amount with two decimals and comma thousands separators, e.g. `-$1,234.50`.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!("{}{}{}.{}", sign, currency, group_thousands(integer), fraction)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parses a date written in ISO form or one of the common day/month layouts.
/// An all-digits value is read as a Unix timestamp in seconds.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(datetime) = trimmed.parse::<NaiveDateTime>() {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    if trimmed.chars().all(|c| c.is_ascii_digit())
        && let Some(datetime) = trimmed.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0))
    {
        return Ok(datetime.date_naive());
    }

    Err(DateParseError::Unrecognized(trimmed.to_string()))
}

/// A calendar month, e.g. `2024-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=9999).contains(&year) {
            return Err(MonthParseError(format!("{}-{}", year, month)));
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| MonthParseError(format!("{}-{}", year, month)))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive `(first_day, last_day)` bounds.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('/', "-");
        let mut parts = normalized.splitn(3, '-');

        let year = parts.next().and_then(|p| p.parse::<i32>().ok());
        let month = parts.next().and_then(|p| p.parse::<u32>().ok());

        match (year, month, parts.next()) {
            (Some(year), Some(month), None) => Self::new(year, month).map_err(|_| MonthParseError(s.to_string())),
            _ => Err(MonthParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Month {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts an amount as a JSON number or as a human-entered string.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Integer(value) => Ok(Decimal::from(value)),
        RawAmount::Float(value) => Decimal::from_str(&value.to_string()).map(|d| d.round_dp(2)).map_err(de::Error::custom),
        RawAmount::Text(value) => parse_amount(&value).map_err(de::Error::custom),
    }
}

/// Accepts a missing, blank or formatted date. Use together with `#[serde(default)]`.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_date(&value).map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
