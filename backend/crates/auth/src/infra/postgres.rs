//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation_constraint;
use kernel::id::{PasswordResetId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{password_reset::PasswordReset, user::User};
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, reset_code::ResetCode, user_filter::UserFilter,
    user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Unique constraint on `users.email`
const USERS_EMAIL_KEY: &str = "users_email_key";
/// Partial unique index: one unused record per identity
const RESETS_OPEN_PER_USER: &str = "password_resets_open_user_idx";
/// Partial unique index: unused codes are distinct
const RESETS_OPEN_CODE: &str = "password_resets_open_code_idx";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%needle%` with LIKE metacharacters escaped
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Turn a unique violation on the email key into `EmailTaken`
fn map_email_conflict(err: sqlx::Error) -> AuthError {
    match unique_violation_constraint(&err) {
        Some(USERS_EMAIL_KEY) => AuthError::EmailTaken,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                name,
                email,
                password_hash,
                user_role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.code())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_email_conflict)?
        .rows_affected();

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, email, password_hash, user_role, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, email, password_hash, user_role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<bool> {
        // user_role is deliberately absent: it never changes after creation
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                password_hash = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_email_conflict)?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn find_filtered(&self, filter: &UserFilter) -> AuthResult<Vec<User>> {
        // ORDER BY cannot be bound; both parts come from closed enums
        let sql = format!(
            r#"
            SELECT user_id, name, email, password_hash, user_role, created_at, updated_at
            FROM users
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\')
              AND ($2::TEXT IS NULL OR email ILIKE $2 ESCAPE '\')
              AND ($3::TEXT IS NULL OR user_role = $3)
            ORDER BY {} {}, user_id ASC
            LIMIT $4 OFFSET $5
            "#,
            filter.sort_by().column(),
            filter.sort_order().keyword(),
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(filter.name().map(contains_pattern))
            .bind(filter.email().map(contains_pattern))
            .bind(filter.role().map(|r| r.code()))
            .bind(i64::from(filter.limit()))
            .bind(filter.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Password Reset Repository Implementation
// ============================================================================

impl PasswordResetRepository for PgAuthRepository {
    async fn create(&self, reset: &PasswordReset) -> AuthResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Expired leftovers still sit in the partial unique indexes
        sqlx::query(
            r#"
            DELETE FROM password_resets
            WHERE used = FALSE
              AND expires_at <= $3
              AND (user_id = $1 OR code = $2)
            "#,
        )
        .bind(reset.user_id.as_uuid())
        .bind(reset.code.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO password_resets (
                reset_id,
                user_id,
                code,
                email,
                used,
                expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reset.reset_id.as_uuid())
        .bind(reset.user_id.as_uuid())
        .bind(reset.code.as_str())
        .bind(reset.email.as_str())
        .bind(reset.used)
        .bind(reset.expires_at)
        .bind(reset.created_at)
        .bind(reset.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match unique_violation_constraint(&e) {
            Some(RESETS_OPEN_PER_USER) => AuthError::ResetAlreadyPending,
            Some(RESETS_OPEN_CODE) => AuthError::ResetCodeCollision,
            _ => AuthError::Database(e),
        })?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_code(&self, code: &ResetCode) -> AuthResult<Option<PasswordReset>> {
        let row = sqlx::query_as::<_, PasswordResetRow>(
            r#"
            SELECT reset_id, user_id, code, email, used, expires_at, created_at, updated_at
            FROM password_resets
            WHERE code = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PasswordResetRow::into_password_reset))
    }

    async fn find_valid_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<PasswordReset>> {
        let row = sqlx::query_as::<_, PasswordResetRow>(
            r#"
            SELECT reset_id, user_id, code, email, used, expires_at, created_at, updated_at
            FROM password_resets
            WHERE user_id = $1
              AND used = FALSE
              AND expires_at > $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PasswordResetRow::into_password_reset))
    }

    async fn update(&self, reset: &PasswordReset) -> AuthResult<bool> {
        // `used` only ever goes false -> true
        let updated = sqlx::query(
            r#"
            UPDATE password_resets SET
                used = $2,
                updated_at = $3
            WHERE reset_id = $1
              AND used = FALSE
            "#,
        )
        .bind(reset.reset_id.as_uuid())
        .bind(reset.used)
        .bind(reset.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM password_resets WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    user_role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_code(&self.user_role).ok_or_else(|| {
            AuthError::Internal(format!("Invalid user_role in database: {}", self.user_role))
        })?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_db(self.password_hash),
            user_role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PasswordResetRow {
    reset_id: Uuid,
    user_id: Uuid,
    code: String,
    email: String,
    used: bool,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PasswordResetRow {
    fn into_password_reset(self) -> PasswordReset {
        PasswordReset {
            reset_id: PasswordResetId::from_uuid(self.reset_id),
            user_id: UserId::from_uuid(self.user_id),
            code: ResetCode::from_db(self.code),
            email: Email::from_db(self.email),
            used: self.used,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
