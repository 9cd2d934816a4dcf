use crate::Config;
use crate::auth::{CurrentUser, SESSION_COOKIE, build_auth_cookie, parse_session_cookie_value, session_cookie_value};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::UserAgent;
use crate::models::user::{LoginRequest, RegisterRequest, User, UserResponse};
use chrono::{Duration, Utc};
use rocket::State;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::serde::json::Json;
use rocket::{get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

/// Opens a server-side session and sets the private cookie pointing at it.
async fn start_session(
    repo: &PostgresRepository,
    config: &Config,
    cookies: &CookieJar<'_>,
    user: &User,
    user_agent: &UserAgent,
    remember: bool,
) -> Result<(), AppError> {
    let lifetime = config.session.lifetime_secs;
    let expires_at = Utc::now() + Duration::seconds(lifetime);
    let session = repo.create_session(&user.id, expires_at, user_agent.as_deref()).await?;

    cookies.add_private(build_auth_cookie(&session_cookie_value(&session.id, &user.id), remember.then_some(lifetime)));
    info!(user_id = %user.id, session_id = %session.id, remember, "session started");

    Ok(())
}

/// Register a new account and log it in.
/// Returns 400 when validation fails (including a mismatched confirmation) and 409 for a taken email.
#[openapi(tag = "Users")]
#[post("/register", data = "<payload>")]
pub async fn register(
    pool: &State<PgPool>,
    config: &State<Config>,
    cookies: &CookieJar<'_>,
    user_agent: UserAgent,
    payload: JsonBody<RegisterRequest>,
) -> Result<(Status, Json<UserResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo.create_user(&payload.name, &payload.email, &payload.password).await?;
    start_session(&repo, config, cookies, &user, &user_agent, false).await?;

    Ok((Status::Created, Json(UserResponse::from(&user))))
}

/// Log in with email and password. `remember` keeps the cookie for the session lifetime.
/// Returns 403 for an unknown email or a wrong password.
#[openapi(tag = "Users")]
#[post("/login", data = "<payload>")]
pub async fn login(
    pool: &State<PgPool>,
    config: &State<Config>,
    cookies: &CookieJar<'_>,
    user_agent: UserAgent,
    payload: JsonBody<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo.authenticate(&payload.email, &payload.password).await?;
    start_session(&repo, config, cookies, &user, &user_agent, payload.remember).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// End the current session. Succeeds even without one.
#[openapi(tag = "Users")]
#[post("/logout")]
pub async fn logout(pool: &State<PgPool>, cookies: &CookieJar<'_>) -> Result<Status, AppError> {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE)
        && let Some((session_id, _)) = parse_session_cookie_value(cookie.value())
    {
        let repo = PostgresRepository { pool: pool.inner().clone() };
        repo.delete_session(&session_id).await?;
    }

    cookies.remove_private(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok(Status::Ok)
}

/// The logged-in user.
#[openapi(tag = "Users")]
#[get("/me")]
pub async fn me(pool: &State<PgPool>, current_user: CurrentUser) -> Result<Json<UserResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo
        .get_user_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![register, login, logout, me]
}
