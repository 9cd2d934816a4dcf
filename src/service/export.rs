use crate::database::expense::ExpenseRepository;
use crate::database::income::IncomeRepository;
use crate::error::app_error::AppError;
use crate::models::entry::EntryKind;
use crate::models::expense::Expense;
use crate::models::income::Income;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

pub const EXPORT_FILE_NAME: &str = "transactions.csv";

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "type")]
    kind: EntryKind,
    date: NaiveDate,
    amount: String,
    category_or_source: &'a str,
    note: &'a str,
}

pub async fn export_transactions<R>(repository: &R, user_id: &Uuid) -> Result<String, AppError>
where
    R: IncomeRepository + ExpenseRepository + Sync,
{
    let incomes = repository.list_incomes_between(None, None, user_id).await?;
    let expenses = repository.list_expenses_between(None, None, None, user_id).await?;

    transactions_csv(&incomes, &expenses)
}

/// Incomes and expenses in one CSV, ordered by date and then by type.
pub fn transactions_csv(incomes: &[Income], expenses: &[Expense]) -> Result<String, AppError> {
    let mut rows: Vec<ExportRow> = incomes
        .iter()
        .map(|income| ExportRow {
            kind: EntryKind::Income,
            date: income.date,
            amount: format!("{:.2}", income.amount),
            category_or_source: &income.source,
            note: income.note.as_deref().unwrap_or_default(),
        })
        .chain(expenses.iter().map(|expense| ExportRow {
            kind: EntryKind::Expense,
            date: expense.date,
            amount: format!("{:.2}", expense.amount),
            category_or_source: expense.category.as_str(),
            note: expense.note.as_deref().unwrap_or_default(),
        }))
        .collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.kind.cmp(&b.kind)));

    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(["type", "date", "amount", "category_or_source", "note"])?;
    }
    for row in &rows {
        writer.serialize(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| AppError::Export {
        message: format!("Failed to flush CSV export: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| AppError::Export {
        message: format!("CSV export is not valid UTF-8: {}", e),
    })
}
