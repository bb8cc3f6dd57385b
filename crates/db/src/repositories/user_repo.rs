//! Repository for the `users` table.

use folio_core::types::DbId;
use folio_core::upload::MAX_UPLOAD_PATH_LENGTH;
use folio_core::validation::FieldChecker;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::user::{CreateUser, UpdateUser, User, UserUploadSlot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, is_active, is_staff, is_superuser, \
                       last_login, date_joined, email, first_name, last_name, short_bio, \
                       image, resume, website, github_profile, linkedin_profile, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Validate and insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, RepoError> {
        input.validate()?;

        let query = format!(
            "INSERT INTO users (username, password_hash, email, first_name, last_name,
                                short_bio, website, github_profile, linkedin_profile)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.short_bio)
            .bind(&input.website)
            .bind(&input.github_profile)
            .bind(&input.linkedin_profile)
            .fetch_one(pool)
            .await?;

        tracing::info!(user_id = user.id, username = %user.account.username, "Created user");
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Find a user by email (case-insensitive). Returns the oldest match.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1) ORDER BY id LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// List all users ordered by most recently joined first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY date_joined DESC, id DESC");
        let users = sqlx::query_as::<_, User>(&query).fetch_all(pool).await?;
        Ok(users)
    }

    /// Validate and apply a profile patch. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, RepoError> {
        input.validate()?;

        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                short_bio = COALESCE($6, short_bio),
                website = COALESCE($7, website),
                github_profile = COALESCE($8, github_profile),
                linkedin_profile = COALESCE($9, linkedin_profile),
                is_active = COALESCE($10, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.short_bio)
            .bind(&input.website)
            .bind(&input.github_profile)
            .bind(&input.linkedin_profile)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Record the stored path for one of the user's upload slots.
    ///
    /// A path must name a file directly inside the user's own upload
    /// directory; `None` clears the slot.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_upload(
        pool: &PgPool,
        id: DbId,
        slot: UserUploadSlot,
        path: Option<&str>,
    ) -> Result<Option<User>, RepoError> {
        FieldChecker::new()
            .required_if_set(slot.column(), path, MAX_UPLOAD_PATH_LENGTH)
            .owner_path(slot.column(), path, Some(id))
            .finish()?;

        let query = format!(
            "UPDATE users SET {column} = $2 WHERE id = $1 RETURNING {COLUMNS}",
            column = slot.column()
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Set the avatar image path.
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<User>, RepoError> {
        Self::set_upload(pool, id, UserUploadSlot::Image, Some(path)).await
    }

    /// Set the resume file path.
    pub async fn set_resume(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<User>, RepoError> {
        Self::set_upload(pool, id, UserUploadSlot::Resume, Some(path)).await
    }

    /// Permanently delete a user. Owned projects and their screenshots are
    /// removed by the `ON DELETE CASCADE` foreign keys.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id = id, "Deleted user and owned projects");
        }
        Ok(deleted)
    }
}
