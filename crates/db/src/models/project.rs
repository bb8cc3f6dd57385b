//! Project entity model and DTOs.

use folio_core::error::CoreError;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::FieldChecker;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MAX_PROJECT_NAME_LENGTH: usize = 50;
pub const MAX_SHORT_DESCRIPTION_LENGTH: usize = 100;
pub const MAX_FULL_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_TECH_STACK_LENGTH: usize = 200;
pub const MAX_ROLE_LENGTH: usize = 300;
pub const MAX_PROJECT_URL_LENGTH: usize = 200;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    /// Owning user.
    pub user_id: DbId,
    pub name: String,
    pub short_description: String,
    pub full_description: Option<String>,
    pub tech_stack: String,
    pub role: String,
    pub private: bool,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub user_id: DbId,
    pub name: String,
    pub short_description: String,
    pub full_description: Option<String>,
    pub tech_stack: String,
    pub role: String,
    /// Defaults to `false` if omitted.
    pub private: Option<bool>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
}

impl CreateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required("name", &self.name, MAX_PROJECT_NAME_LENGTH)
            .required(
                "short_description",
                &self.short_description,
                MAX_SHORT_DESCRIPTION_LENGTH,
            )
            .optional(
                "full_description",
                self.full_description.as_deref(),
                MAX_FULL_DESCRIPTION_LENGTH,
            )
            .required("tech_stack", &self.tech_stack, MAX_TECH_STACK_LENGTH)
            .required("role", &self.role, MAX_ROLE_LENGTH)
            .url("live_url", self.live_url.as_deref(), MAX_PROJECT_URL_LENGTH)
            .url("repo_url", self.repo_url.as_deref(), MAX_PROJECT_URL_LENGTH)
            .finish()
    }
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub tech_stack: Option<String>,
    pub role: Option<String>,
    pub private: Option<bool>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
}

impl UpdateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required_if_set("name", self.name.as_deref(), MAX_PROJECT_NAME_LENGTH)
            .required_if_set(
                "short_description",
                self.short_description.as_deref(),
                MAX_SHORT_DESCRIPTION_LENGTH,
            )
            .optional(
                "full_description",
                self.full_description.as_deref(),
                MAX_FULL_DESCRIPTION_LENGTH,
            )
            .required_if_set("tech_stack", self.tech_stack.as_deref(), MAX_TECH_STACK_LENGTH)
            .required_if_set("role", self.role.as_deref(), MAX_ROLE_LENGTH)
            .url("live_url", self.live_url.as_deref(), MAX_PROJECT_URL_LENGTH)
            .url("repo_url", self.repo_url.as_deref(), MAX_PROJECT_URL_LENGTH)
            .finish()
    }
}
