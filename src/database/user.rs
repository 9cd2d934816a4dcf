use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{User, normalize_email};
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for non-existent users take the same time as
/// requests for existing users.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| password_hash("dummy-never-matches").ok());

const USER_SELECT_FIELDS: &str = "id, name, email, password_hash, created_at";

impl PostgresRepository {
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        if self.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::UserAlreadyExists(email));
        }

        let password_hash = password_hash(password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_SELECT_FIELDS
        ))
        .bind(name.trim())
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::UserAlreadyExists(email.clone()),
            other => AppError::from(other),
        })?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE email = $1
            "#,
            USER_SELECT_FIELDS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE id = $1
            "#,
            USER_SELECT_FIELDS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up the user and checks the password. Unknown emails and wrong passwords
    /// both fail with `InvalidCredentials` after the same amount of hashing work.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        match self.get_user_by_email(email).await? {
            Some(user) => {
                verify_password(&user, password)?;
                Ok(user)
            }
            None => {
                dummy_verify(password);
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

pub fn verify_password(user: &User, password: &str) -> Result<(), AppError> {
    let password_hash = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &password_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    Ok(())
}

/// Perform a throwaway Argon2 verification to equalize response timing
/// regardless of whether the target account exists.
pub fn dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref()
        && let Ok(hash) = PasswordHash::new(hash)
    {
        let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
    }
}

/// Hashes with a fresh random salt; the salt is embedded in the PHC string.
pub(crate) fn password_hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_password(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: password_hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_salted() {
        let first = password_hash("pass123").unwrap();
        let second = password_hash("pass123").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password() {
        let user = user_with_password("pass123");
        assert!(verify_password(&user, "pass123").is_ok());
        assert!(matches!(verify_password(&user, "wrong"), Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_password_with_corrupt_hash() {
        let mut user = user_with_password("pass123");
        user.password_hash = "not-a-phc-string".to_string();
        assert!(matches!(verify_password(&user, "pass123"), Err(AppError::PasswordHash { .. })));
    }

    #[test]
    fn test_dummy_hash_is_available() {
        assert!(DUMMY_HASH.is_some());
        dummy_verify("anything");
    }
}
