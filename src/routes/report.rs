use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::report::ReportResponse;
use crate::service::report::{build_report, parse_report_filter};
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Income and expense totals with a category breakdown.
/// Dates accept ISO and common day/month layouts; `category` is `all` (default) or one category.
/// Returns 400 when a value cannot be parsed or `start_date` is after `end_date`.
#[openapi(tag = "Reports")]
#[get("/?<start_date>&<end_date>&<category>")]
pub async fn get_report(
    pool: &State<PgPool>,
    current_user: CurrentUser,
    start_date: Option<String>,
    end_date: Option<String>,
    category: Option<String>,
) -> Result<Json<ReportResponse>, AppError> {
    let filter = parse_report_filter(start_date.as_deref(), end_date.as_deref(), category.as_deref())?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    Ok(Json(build_report(&repo, &filter, &current_user.id).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_report]
}

#[cfg(test)]
mod tests {
    use crate::build_rocket;
    use crate::test_utils::test_config;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[rocket::async_test]
    async fn test_report_requires_session() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");
        let response = client.get("/api/v1/reports/?category=Food").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }
}
