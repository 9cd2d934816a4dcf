use crate::Config;
use crate::auth::CurrentUser;
use crate::database::income::IncomeRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::entry::DeletedResponse;
use crate::models::income::{IncomeRequest, IncomeResponse};
use crate::models::pagination::{PaginatedResponse, PaginationParams};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Record an income. `date` defaults to today.
#[openapi(tag = "Incomes")]
#[post("/", data = "<payload>")]
pub async fn create_income(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    payload: JsonBody<IncomeRequest>,
) -> Result<(Status, Json<IncomeResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let income = repo.create_income(&payload, &current_user.id).await?;
    Ok((Status::Created, Json(IncomeResponse::from(&income))))
}

/// List incomes, newest first.
#[openapi(tag = "Incomes")]
#[get("/?<page>&<limit>")]
pub async fn list_incomes(
    pool: &State<PgPool>,
    config: &State<Config>,
    current_user: CurrentUser,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<Json<PaginatedResponse<IncomeResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let params = PaginationParams::from_query(page, limit, config.api.default_page_size);

    let (incomes, total) = repo.list_incomes(&params, &current_user.id).await?;
    let responses: Vec<IncomeResponse> = incomes.iter().map(IncomeResponse::from).collect();
    Ok(Json(PaginatedResponse::from_params(responses, &params, total)))
}

/// Delete one of the current user's incomes. Returns 404 for anyone else's.
#[openapi(tag = "Incomes")]
#[delete("/<id>")]
pub async fn delete_income(pool: &State<PgPool>, current_user: CurrentUser, id: &str) -> Result<Json<DeletedResponse>, AppError> {
    let uuid = Uuid::parse_str(id).map_err(|e| AppError::uuid("Invalid income id", e))?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    repo.delete_income(&uuid, &current_user.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_income, list_incomes, delete_income]
}

#[cfg(test)]
mod tests {
    use crate::build_rocket;
    use crate::test_utils::test_config;
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;

    #[rocket::async_test]
    async fn test_create_income_requires_session() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        let payload = serde_json::json!({ "amount": "1,500", "source": "Salary" });
        let response = client
            .post("/api/v1/incomes/")
            .header(ContentType::JSON)
            .body(payload.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_list_incomes_requires_session() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");
        let response = client.get("/api/v1/incomes/?page=2&limit=5").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }
}
