//! User Model and Database Operations
//!
//! User rows are owned exclusively by this module; the password hash
//! never serializes out of it. Login validation tracks a failed-attempt
//! counter and honours the active flag: deactivated accounts cannot
//! log in regardless of password.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::error::ApiError;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt); never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Deactivated accounts cannot authenticate
    pub is_active: bool,
    /// Consecutive failed login attempts since the last success
    pub failed_attempts: i64,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Create a new user with a freshly hashed password.
///
/// # Errors
///
/// * `ApiError::Conflict` - username or email already taken
/// * `ApiError::Store` - any other database failure
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let password_hash = bcrypt::hash(password, 12).map_err(|e| {
        tracing::error!("Password hashing error: {e}");
        ApiError::validation("Unable to process password")
    })?;

    let now = Utc::now();

    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, is_active, failed_attempts, created_at, updated_at)
        VALUES (?1, ?2, ?3, 1, 0, ?4, ?5)
        RETURNING id, username, email, password_hash, is_active, failed_attempts, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db)) => {
            let message = db.message().to_string();
            if message.contains("users.email") {
                Err(ApiError::conflict("Email already exists"))
            } else if message.contains("users.username") {
                Err(ApiError::conflict(
                    "Username already exists, please choose another",
                ))
            } else {
                Err(ApiError::Store(sqlx::Error::Database(db)))
            }
        }
        Err(e) => Err(ApiError::Store(e)),
    }
}

/// Get user by email
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_active, failed_attempts, created_at, updated_at
        FROM users
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_active, failed_attempts, created_at, updated_at
        FROM users
        WHERE username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_active, failed_attempts, created_at, updated_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Validate login credentials.
///
/// Returns `Ok(None)` when the email is unknown, the account is
/// deactivated, or the password does not match. A failed password
/// check increments the user's failed-attempt counter; a success
/// resets it.
pub async fn validate_login(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        tracing::info!("Login attempt failed: no user found for email {email}");
        return Ok(None);
    };

    if !user.is_active {
        tracing::warn!("Login attempt for deactivated user: {email}");
        return Ok(None);
    }

    let is_valid = bcrypt::verify(password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {e}");
        ApiError::validation("Unable to process password")
    })?;

    if !is_valid {
        tracing::info!("Login attempt failed: invalid password for email {email}");
        increment_failed_attempts(pool, user.id).await?;
        return Ok(None);
    }

    if user.failed_attempts > 0 {
        reset_failed_attempts(pool, user.id).await?;
    }

    tracing::info!("Login successful for email {email}");
    Ok(Some(user))
}

async fn increment_failed_attempts(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET failed_attempts = failed_attempts + 1, updated_at = ?1 WHERE id = ?2",
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn reset_failed_attempts(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET failed_attempts = 0, updated_at = ?1 WHERE id = ?2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deactivate a user. Their boards remain; their credentials stop
/// working at the next authentication check.
pub async fn deactivate_user(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE users SET is_active = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::memory_pool;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let pool = memory_pool().await;

        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(user.username, "ada");
        assert!(user.is_active);
        assert_eq!(user.failed_attempts, 0);
        assert_ne!(user.password_hash, "password123");

        let by_email = get_user_by_email(&pool, "ada@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);

        let by_id = get_user_by_id(&pool, user.id).await.unwrap();
        assert_eq!(by_id.unwrap().username, "ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let pool = memory_pool().await;

        create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let result = create_user(&pool, "other", "ada@example.com", "password123").await;
        assert_matches!(result, Err(ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = memory_pool().await;

        create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let result = create_user(&pool, "ada", "other@example.com", "password123").await;
        assert_matches!(result, Err(ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_validate_login_success() {
        let pool = memory_pool().await;
        create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();

        let user = validate_login(&pool, "ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(user.unwrap().username, "ada");
    }

    #[tokio::test]
    async fn test_validate_login_tracks_failed_attempts() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();

        assert!(validate_login(&pool, "ada@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(validate_login(&pool, "ada@example.com", "also wrong")
            .await
            .unwrap()
            .is_none());
        let stored = get_user_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 2);

        // A successful login resets the counter.
        assert!(validate_login(&pool, "ada@example.com", "password123")
            .await
            .unwrap()
            .is_some());
        let stored = get_user_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_attempts, 0);
    }

    #[tokio::test]
    async fn test_validate_login_rejects_deactivated_user() {
        let pool = memory_pool().await;
        let user = create_user(&pool, "ada", "ada@example.com", "password123")
            .await
            .unwrap();

        assert!(deactivate_user(&pool, user.id).await.unwrap());
        assert!(validate_login(&pool, "ada@example.com", "password123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_validate_login_unknown_email() {
        let pool = memory_pool().await;
        assert!(validate_login(&pool, "nobody@example.com", "password123")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_password_hash_never_serializes() {
        let user = User {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            is_active: true,
            failed_attempts: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }
}
