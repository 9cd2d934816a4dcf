use crate::auth::CurrentUser;
use crate::database::budget::BudgetRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::budget::{BudgetRequest, BudgetResponse};
use crate::util::Month;
use rocket::serde::json::Json;
use rocket::{State, get, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// Parses an optional `YYYY-MM` query value, defaulting to the current month.
#[allow(clippy::result_large_err)]
pub(crate) fn parse_month(month: Option<&str>) -> Result<Month, AppError> {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(value) => value.parse().map_err(|e| AppError::BadRequest(format!("{}", e))),
        None => Ok(Month::current()),
    }
}

/// Get the budget for `month` (`YYYY-MM`, default current month).
/// Returns 404 when no budget was set for that month.
#[openapi(tag = "Budgets")]
#[get("/?<month>")]
pub async fn get_budget(pool: &State<PgPool>, current_user: CurrentUser, month: Option<String>) -> Result<Json<BudgetResponse>, AppError> {
    let month = parse_month(month.as_deref())?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    match repo.get_budget(&month, &current_user.id).await? {
        Some(budget) => Ok(Json(BudgetResponse::from(&budget))),
        None => Err(AppError::NotFound(format!("No budget set for {}", month))),
    }
}

/// Set the budget for a month, replacing any existing amount.
#[openapi(tag = "Budgets")]
#[put("/", data = "<payload>")]
pub async fn put_budget(pool: &State<PgPool>, current_user: CurrentUser, payload: JsonBody<BudgetRequest>) -> Result<Json<BudgetResponse>, AppError> {
    payload.validate()?;
    let month = payload.month.unwrap_or_else(Month::current);

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let budget = repo.upsert_budget(&month, payload.amount, &current_user.id).await?;
    Ok(Json(BudgetResponse::from(&budget)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_budget, put_budget]
}
