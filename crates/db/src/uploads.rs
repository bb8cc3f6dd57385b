//! Upload workflows: resolve the storage path, write the file, record the path.
//!
//! These tie the pure path resolver in `folio_core::upload` to the media store
//! and the repositories. Paths and image bytes are validated before anything
//! is written; files are written before the row that references them, and a
//! failed row write discards the new file.

use folio_core::error::CoreError;
use folio_core::media::MediaStore;
use folio_core::types::DbId;
use folio_core::upload::{file_upload_path, owner_directory, MAX_UPLOAD_PATH_LENGTH};
use folio_core::validation::FieldChecker;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::screenshot::{
    CreateScreenshot, Screenshot, ScreenshotUpload, MAX_IMAGE_PATH_LENGTH,
};
use crate::models::user::{User, UserUploadSlot};
use crate::repositories::{ProjectRepo, ScreenshotRepo, UserRepo};

/// Store a file in one of a user's upload slots, replacing any previous file.
pub async fn upload_user_file(
    pool: &PgPool,
    store: &MediaStore,
    user_id: DbId,
    slot: UserUploadSlot,
    filename: &str,
    data: &[u8],
) -> Result<User, RepoError> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    let field = slot.column();
    let path = file_upload_path(&user, filename);
    let checker = FieldChecker::new().required(field, &path, MAX_UPLOAD_PATH_LENGTH);
    let checker = if slot.requires_image() {
        checker.image(field, data)
    } else {
        checker
    };
    checker.finish()?;

    let path = store.save(&path, data, MAX_UPLOAD_PATH_LENGTH).await?;

    let updated = match UserRepo::set_upload(pool, user_id, slot, Some(&path)).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            discard(store, &path).await;
            return Err(CoreError::NotFound {
                entity: "user",
                id: user_id,
            }
            .into());
        }
        Err(e) => {
            discard(store, &path).await;
            return Err(e);
        }
    };

    if let Some(previous) = user.upload(slot).filter(|p| *p != path) {
        discard(store, previous).await;
    }

    tracing::info!(user_id, slot = slot.column(), path = %path, "Stored user upload");
    Ok(updated)
}

/// Store a user's avatar image.
pub async fn upload_user_image(
    pool: &PgPool,
    store: &MediaStore,
    user_id: DbId,
    filename: &str,
    data: &[u8],
) -> Result<User, RepoError> {
    upload_user_file(pool, store, user_id, UserUploadSlot::Image, filename, data).await
}

/// Store a user's resume.
pub async fn upload_user_resume(
    pool: &PgPool,
    store: &MediaStore,
    user_id: DbId,
    filename: &str,
    data: &[u8],
) -> Result<User, RepoError> {
    upload_user_file(pool, store, user_id, UserUploadSlot::Resume, filename, data).await
}

/// Store a screenshot image and create its row.
///
/// The file lands in the upload directory of the user owning `project_id` and
/// must be a PNG, JPEG or WebP image.
pub async fn upload_screenshot(
    pool: &PgPool,
    store: &MediaStore,
    project_id: DbId,
    filename: &str,
    data: &[u8],
    caption: Option<String>,
) -> Result<Screenshot, RepoError> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(CoreError::MissingParent {
            entity: "screenshot",
            parent: "project",
            id: Some(project_id),
        })?;

    let target = ScreenshotUpload { project: &project };
    let mut input = CreateScreenshot {
        project_id,
        image: file_upload_path(&target, filename),
        caption,
    };
    input.validate()?;
    FieldChecker::new().image("image", data).finish()?;

    let path = store.save(&input.image, data, MAX_IMAGE_PATH_LENGTH).await?;
    input.image = path.clone();
    let screenshot = match ScreenshotRepo::create(pool, &input).await {
        Ok(screenshot) => screenshot,
        Err(e) => {
            discard(store, &path).await;
            return Err(e);
        }
    };

    tracing::info!(
        screenshot_id = screenshot.id,
        project_id,
        user_id = project.user_id,
        path = %path,
        "Stored screenshot"
    );
    Ok(screenshot)
}

/// Delete a screenshot row and its image file.
///
/// Returns `true` if a row was removed.
pub async fn delete_screenshot_with_upload(
    pool: &PgPool,
    store: &MediaStore,
    screenshot_id: DbId,
) -> Result<bool, RepoError> {
    let Some(screenshot) = ScreenshotRepo::find_by_id(pool, screenshot_id).await? else {
        return Ok(false);
    };
    let deleted = ScreenshotRepo::delete(pool, screenshot_id).await?;
    if deleted {
        discard(store, &screenshot.image).await;
    }
    Ok(deleted)
}

/// Delete a project, its screenshots, and their image files.
///
/// Returns `true` if a row was removed.
pub async fn delete_project_with_uploads(
    pool: &PgPool,
    store: &MediaStore,
    project_id: DbId,
) -> Result<bool, RepoError> {
    let screenshots = ScreenshotRepo::list_by_project(pool, project_id).await?;
    let deleted = ProjectRepo::delete(pool, project_id).await?;
    if deleted {
        for screenshot in &screenshots {
            discard(store, &screenshot.image).await;
        }
        tracing::info!(
            project_id,
            files = screenshots.len(),
            "Deleted project with screenshots"
        );
    }
    Ok(deleted)
}

/// Delete a user, their projects and screenshots, and every uploaded file.
///
/// Returns `true` if a row was removed.
pub async fn delete_user_with_uploads(
    pool: &PgPool,
    store: &MediaStore,
    user_id: DbId,
) -> Result<bool, RepoError> {
    let deleted = UserRepo::delete(pool, user_id).await?;
    if deleted {
        let dir = owner_directory(Some(user_id));
        if let Err(e) = store.remove_dir(&dir).await {
            tracing::warn!(user_id, dir = %dir, error = %e, "Failed to remove upload directory");
        }
    }
    Ok(deleted)
}

/// Best-effort removal of a file that is no longer referenced.
async fn discard(store: &MediaStore, path: &str) {
    if let Err(e) = store.remove(path).await {
        tracing::warn!(path = %path, error = %e, "Failed to remove stale upload");
    }
}
