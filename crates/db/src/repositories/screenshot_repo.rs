//! Repository for the `screenshots` table.

use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_core::validation::FieldChecker;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::screenshot::{CreateScreenshot, Screenshot, UpdateScreenshot};
use crate::repositories::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, image, caption, created_at, updated_at";

/// Provides CRUD operations for screenshots.
pub struct ScreenshotRepo;

impl ScreenshotRepo {
    /// Validate and insert a new screenshot, returning the created row.
    ///
    /// The image path must lie in the upload directory of the project's owner.
    pub async fn create(
        pool: &PgPool,
        input: &CreateScreenshot,
    ) -> Result<Screenshot, RepoError> {
        input.validate()?;

        let owner = ProjectRepo::owner_id(pool, input.project_id)
            .await?
            .ok_or(CoreError::MissingParent {
                entity: "screenshot",
                parent: "project",
                id: Some(input.project_id),
            })?;
        FieldChecker::new()
            .owner_path("image", Some(input.image.as_str()), Some(owner))
            .finish()?;

        let query = format!(
            "INSERT INTO screenshots (project_id, image, caption)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let screenshot = sqlx::query_as::<_, Screenshot>(&query)
            .bind(input.project_id)
            .bind(&input.image)
            .bind(&input.caption)
            .fetch_one(pool)
            .await
            .map_err(|e| RepoError::with_parent(e, "screenshot", "project", input.project_id))?;
        Ok(screenshot)
    }

    /// Find a screenshot by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Screenshot>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM screenshots WHERE id = $1");
        let screenshot = sqlx::query_as::<_, Screenshot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(screenshot)
    }

    /// List a project's screenshots in upload order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Screenshot>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM screenshots WHERE project_id = $1 ORDER BY id");
        let screenshots = sqlx::query_as::<_, Screenshot>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;
        Ok(screenshots)
    }

    /// Id of the user owning a screenshot through its project.
    ///
    /// Returns `None` if the screenshot does not exist.
    pub async fn owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, RepoError> {
        let owner = sqlx::query_scalar::<_, DbId>(
            "SELECT p.user_id
             FROM screenshots s
             JOIN projects p ON p.id = s.project_id
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(owner)
    }

    /// Validate and apply a patch. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScreenshot,
    ) -> Result<Option<Screenshot>, RepoError> {
        input.validate()?;

        if let Some(image) = input.image.as_deref() {
            let Some(owner) = Self::owner_id(pool, id).await? else {
                return Ok(None);
            };
            FieldChecker::new()
                .owner_path("image", Some(image), Some(owner))
                .finish()?;
        }

        let query = format!(
            "UPDATE screenshots SET
                image = COALESCE($2, image),
                caption = COALESCE($3, caption)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let screenshot = sqlx::query_as::<_, Screenshot>(&query)
            .bind(id)
            .bind(&input.image)
            .bind(&input.caption)
            .fetch_optional(pool)
            .await?;
        Ok(screenshot)
    }

    /// Permanently delete a screenshot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM screenshots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
