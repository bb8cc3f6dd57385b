//! Screenshot entity model and DTOs.

use folio_core::error::CoreError;
use folio_core::types::{DbId, Timestamp};
use folio_core::upload::{UploadOwner, MAX_UPLOAD_PATH_LENGTH};
use folio_core::validation::FieldChecker;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::project::Project;

pub const MAX_CAPTION_LENGTH: usize = 50;
pub const MAX_IMAGE_PATH_LENGTH: usize = MAX_UPLOAD_PATH_LENGTH;

/// A screenshot row from the `screenshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Screenshot {
    pub id: DbId,
    pub project_id: DbId,
    /// Storage-relative path of the image.
    pub image: String,
    pub caption: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new screenshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateScreenshot {
    pub project_id: DbId,
    pub image: String,
    pub caption: Option<String>,
}

impl CreateScreenshot {
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required("image", &self.image, MAX_IMAGE_PATH_LENGTH)
            .optional("caption", self.caption.as_deref(), MAX_CAPTION_LENGTH)
            .finish()
    }
}

/// DTO for updating an existing screenshot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScreenshot {
    pub image: Option<String>,
    pub caption: Option<String>,
}

impl UpdateScreenshot {
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required_if_set("image", self.image.as_deref(), MAX_IMAGE_PATH_LENGTH)
            .optional("caption", self.caption.as_deref(), MAX_CAPTION_LENGTH)
            .finish()
    }
}

/// Upload target for a screenshot image: files belong to the project's owner.
#[derive(Debug, Clone, Copy)]
pub struct ScreenshotUpload<'a> {
    pub project: &'a Project,
}

impl UploadOwner for ScreenshotUpload<'_> {
    fn owner_user_id(&self) -> Option<DbId> {
        Some(self.project.user_id)
    }
}
