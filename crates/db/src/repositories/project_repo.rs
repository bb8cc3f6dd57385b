//! Repository for the `projects` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, short_description, full_description, tech_stack, \
                       role, private, live_url, repo_url, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Validate and insert a new project, returning the created row.
    ///
    /// If `private` is `None` in the input, defaults to `false`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, RepoError> {
        input.validate()?;

        let query = format!(
            "INSERT INTO projects (user_id, name, short_description, full_description,
                                   tech_stack, role, private, live_url, repo_url)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, false), $8, $9)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(&input.full_description)
            .bind(&input.tech_stack)
            .bind(&input.role)
            .bind(input.private)
            .bind(&input.live_url)
            .bind(&input.repo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| RepoError::with_parent(e, "project", "user", input.user_id))?;

        tracing::info!(project_id = project.id, user_id = project.user_id, "Created project");
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }

    /// List a user's projects, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(projects)
    }

    /// List a user's projects that are not marked private.
    pub async fn list_public_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Project>, RepoError> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1 AND private = false
             ORDER BY created_at DESC, id DESC"
        );
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(projects)
    }

    /// Id of the user owning a project, or `None` if the project does not exist.
    pub async fn owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, RepoError> {
        let owner = sqlx::query_scalar::<_, DbId>("SELECT user_id FROM projects WHERE id = $1")
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
        input: &UpdateProject,
    ) -> Result<Option<Project>, RepoError> {
        input.validate()?;

        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                short_description = COALESCE($3, short_description),
                full_description = COALESCE($4, full_description),
                tech_stack = COALESCE($5, tech_stack),
                role = COALESCE($6, role),
                private = COALESCE($7, private),
                live_url = COALESCE($8, live_url),
                repo_url = COALESCE($9, repo_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(&input.full_description)
            .bind(&input.tech_stack)
            .bind(&input.role)
            .bind(input.private)
            .bind(&input.live_url)
            .bind(&input.repo_url)
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }

    /// Permanently delete a project. Its screenshots are removed by the
    /// `ON DELETE CASCADE` foreign key.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(project_id = id, "Deleted project and its screenshots");
        }
        Ok(deleted)
    }
}
