use crate::Config;
use crate::auth::CurrentUser;
use crate::database::expense::ExpenseRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::entry::DeletedResponse;
use crate::models::expense::{ExpenseRequest, ExpenseResponse};
use crate::models::pagination::{PaginatedResponse, PaginationParams};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Record an expense. `category` defaults to `Others` and `date` to today.
#[openapi(tag = "Expenses")]
#[post("/", data = "<payload>")]
pub async fn create_expense(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: JsonBody<ExpenseRequest>,
) -> Result<(Status, Json<ExpenseResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let expense = repo.create_expense(&payload, &current_user.id).await?;
    Ok((Status::Created, Json(ExpenseResponse::from(&expense))))
}

/// List expenses, newest first.
#[openapi(tag = "Expenses")]
#[get("/?<page>&<limit>")]
pub async fn list_expenses(
    pool: &State<PgPool>,
    config: &State<Config>,
    current_user: CurrentUser,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<Json<PaginatedResponse<ExpenseResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let params = PaginationParams::from_query(page, limit, config.api.default_page_size);

    let (expenses, total) = repo.list_expenses(&params, &current_user.id).await?;
    let responses: Vec<ExpenseResponse> = expenses.iter().map(ExpenseResponse::from).collect();
    Ok(Json(PaginatedResponse::from_params(responses, &params, total)))
}

/// Delete one of the current user's expenses. Returns 404 for anyone else's.
#[openapi(tag = "Expenses")]
#[delete("/<id>")]
pub async fn delete_expense(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Json<DeletedResponse>, AppError> {
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid expense id", e))?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_expense(&uuid, &current_user.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_expense, list_expenses, delete_expense]
}
