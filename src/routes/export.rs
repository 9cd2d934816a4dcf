use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::service::export::{EXPORT_FILE_NAME, export_transactions};
use rocket::http::Header;
use rocket::{Responder, State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

#[derive(Responder)]
#[response(content_type = "text/csv")]
pub struct CsvDownload {
    body: String,
    disposition: Header<'static>,
}

impl CsvDownload {
    fn attachment(body: String, file_name: &str) -> Self {
        Self {
            body,
            disposition: Header::new("Content-Disposition", format!("attachment; filename=\"{}\"", file_name)),
        }
    }
}

/// All incomes and expenses as CSV, oldest first.
#[openapi(skip)]
#[get("/transactions.csv")]
pub async fn export_transactions_csv(pool: &State<PgPool>, current_user: CurrentUser) -> Result<CsvDownload, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let csv = export_transactions(&repo, &current_user.id).await?;
    Ok(CsvDownload::attachment(csv, EXPORT_FILE_NAME))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![export_transactions_csv]
}

#[cfg(test)]
mod tests {
    use super::CsvDownload;
    use crate::build_rocket;
    use crate::test_utils::test_config;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[test]
    fn test_attachment_header() {
        let download = CsvDownload::attachment(String::new(), "transactions.csv");
        assert_eq!(download.disposition.value(), "attachment; filename=\"transactions.csv\"");
    }

    #[rocket::async_test]
    async fn test_export_requires_session() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");
        let response = client.get("/api/v1/export/transactions.csv").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }
}
