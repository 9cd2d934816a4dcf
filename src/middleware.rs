use crate::auth::CurrentUser;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::{Data, Response};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Longest user agent kept on a session.
const MAX_USER_AGENT_LEN: usize = 512;

const LEDGER_RESPONSE_HEADERS: [(&str, &str); 3] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    // per-user ledger data must not be cached
    ("Cache-Control", "no-store"),
];

/// Correlates the log lines of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4())
    }

    /// The id `RequestLogger` assigned to this request, if it ran.
    pub fn cached(request: &Request<'_>) -> Option<Self> {
        *request.local_cache(|| None::<RequestId>)
    }

    pub fn label(request: &Request<'_>) -> String {
        Self::cached(request).map_or_else(|| "unknown".to_string(), |id| id.to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestId {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(RequestId::cached(request).unwrap_or_default())
    }
}

struct RequestStarted(Instant);

fn ledger_user(request: &Request<'_>) -> String {
    request
        .local_cache(|| None::<CurrentUser>)
        .as_ref()
        .map_or_else(|| "anonymous".to_string(), |user| user.id.to_string())
}

/// Tags every API call with a request id, times it and logs the outcome per user.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Ledger Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(|| Some(RequestId::new()));
        request.local_cache(|| RequestStarted(Instant::now()));

        info!(
            request_id = %RequestId::label(request),
            method = %request.method(),
            path = %request.uri().path(),
            "ledger api call started"
        );
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let request_id = RequestId::label(request);
        let elapsed = request.local_cache(|| RequestStarted(Instant::now())).0.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let status = response.status();

        response.set_header(Header::new(REQUEST_ID_HEADER, request_id.clone()));
        for (name, value) in LEDGER_RESPONSE_HEADERS {
            response.set_header(Header::new(name, value));
        }

        let user_id = ledger_user(request);
        if status.class().is_server_error() || status.class().is_client_error() {
            warn!(
                request_id = %request_id,
                user_id = %user_id,
                method = %request.method(),
                path = %request.uri().path(),
                status = status.code,
                elapsed_ms,
                "ledger api call rejected"
            );
        } else {
            info!(
                request_id = %request_id,
                user_id = %user_id,
                method = %request.method(),
                path = %request.uri().path(),
                status = status.code,
                elapsed_ms,
                "ledger api call finished"
            );
        }
    }
}

/// Client description stored with a login session.
pub struct UserAgent(pub Option<String>);

impl UserAgent {
    pub fn from_header(value: Option<&str>) -> Self {
        let cleaned = value.map(str::trim).filter(|ua| !ua.is_empty()).map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect());
        UserAgent(cleaned)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserAgent {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, ()> {
        Outcome::Success(UserAgent::from_header(req.headers().get_one("User-Agent")))
    }
}

impl<'a> OpenApiFromRequest<'a> for UserAgent {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_rocket;
    use crate::test_utils::test_config;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[test]
    fn request_ids_are_unique_uuids() {
        let first = RequestId::new();
        let second = RequestId::default();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first.to_string()).is_ok());
    }

    #[test]
    fn user_agent_is_trimmed_and_blank_dropped() {
        assert_eq!(UserAgent::from_header(Some("  curl/8.0 ")).as_deref(), Some("curl/8.0"));
        assert_eq!(UserAgent::from_header(Some("   ")).as_deref(), None);
        assert_eq!(UserAgent::from_header(None).as_deref(), None);
    }

    #[test]
    fn user_agent_is_capped() {
        let long = "x".repeat(MAX_USER_AGENT_LEN + 40);
        let agent = UserAgent::from_header(Some(&long));
        assert_eq!(agent.as_deref().map(str::len), Some(MAX_USER_AGENT_LEN));
    }

    #[rocket::async_test]
    async fn responses_carry_request_id_and_no_store() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");
        let response = client.get("/api/v1/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let request_id = response.headers().get_one(REQUEST_ID_HEADER).expect("request id header");
        assert!(Uuid::parse_str(request_id).is_ok());
        assert_eq!(response.headers().get_one("Cache-Control"), Some("no-store"));
        assert_eq!(response.headers().get_one("X-Frame-Options"), Some("DENY"));
    }
}
