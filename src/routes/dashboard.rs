use crate::Config;
use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::dashboard::{DashboardResponse, TotalsResponse};
use crate::routes::budget::parse_month;
use crate::service::dashboard::DashboardService;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Totals, recent entries, budget progress and category breakdown.
/// `month` (`YYYY-MM`, default current month) scopes the budget progress and categories;
/// totals are all-time. Returns 400 for a malformed month.
#[openapi(tag = "Dashboard")]
#[get("/?<month>")]
pub async fn get_dashboard(
    pool: &State<PgPool>,
    config: &State<Config>,
    current_user: CurrentUser,
    month: Option<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let month = parse_month(month.as_deref())?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = DashboardService::new(&repo, &config.display);
    Ok(Json(service.dashboard_response(&month, &current_user.id).await?))
}

/// All-time income, expense and balance.
#[openapi(tag = "Dashboard")]
#[get("/summary")]
pub async fn get_summary(pool: &State<PgPool>, config: &State<Config>, current_user: CurrentUser) -> Result<Json<TotalsResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = DashboardService::new(&repo, &config.display);
    Ok(Json(service.totals(&current_user.id).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_dashboard, get_summary]
}

#[cfg(test)]
mod tests {
    use crate::build_rocket;
    use crate::test_utils::test_config;
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::Value;
    use uuid::Uuid;

    async fn register(client: &Client) {
        let payload = serde_json::json!({
            "name": "Dashboard User",
            "email": format!("dashboard.{}@example.com", Uuid::new_v4()),
            "password": "password123",
            "confirm_password": "password123"
        });

        let response = client
            .post("/api/v1/users/register")
            .header(ContentType::JSON)
            .body(payload.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
    }

    async fn post_json(client: &Client, uri: &'static str, body: Value) -> Value {
        let response = client.post(uri).header(ContentType::JSON).body(body.to_string()).dispatch().await;
        assert_eq!(response.status(), Status::Created);
        serde_json::from_str(&response.into_string().await.expect("response body")).expect("valid json")
    }

    #[rocket::async_test]
    async fn test_dashboard_requires_session() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");
        let response = client.get("/api/v1/dashboard/?month=2024-01").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn test_dashboard_reflects_entries_and_budget() {
        let mut config = test_config();
        config.database.connect_lazily = false;
        config.database.run_migrations = true;
        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");
        register(&client).await;

        post_json(&client, "/api/v1/incomes/", serde_json::json!({ "amount": "3,000", "source": "Salary", "date": "2024-01-02" })).await;
        post_json(&client, "/api/v1/expenses/", serde_json::json!({ "amount": 40, "category": "Food", "date": "2024-01-05" })).await;
        post_json(&client, "/api/v1/expenses/", serde_json::json!({ "amount": 10, "category": "Food", "date": "2024-01-06" })).await;
        let bills = post_json(&client, "/api/v1/expenses/", serde_json::json!({ "amount": 30, "category": "Bills", "date": "2024-01-07" })).await;

        let response = client
            .put("/api/v1/budgets/")
            .header(ContentType::JSON)
            .body(serde_json::json!({ "month": "2024-01", "amount": 100 }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/v1/dashboard/?month=2024-01").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let dashboard: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(dashboard["budget"]["percent_used"], 80);
        assert_eq!(dashboard["budget"]["is_over"], false);
        assert_eq!(dashboard["budget"]["budget_set"], true);
        assert_eq!(dashboard["totals"]["balance"], 2920.0);
        assert_eq!(dashboard["categories"].as_array().map(Vec::len), Some(2));

        let bills_id = bills["id"].as_str().unwrap();
        let response = client.delete(format!("/api/v1/expenses/{}", bills_id)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let response = client.delete(format!("/api/v1/expenses/{}", bills_id)).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/api/v1/dashboard/summary").dispatch().await;
        let summary: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(summary["expense"], 50.0);
    }
}
