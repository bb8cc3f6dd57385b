//! Local media storage for uploaded files.
//!
//! Files are addressed by the storage-relative paths produced in
//! [`crate::upload`] and written as whole files: the bytes land in a temporary
//! sibling first and are then linked under their final name. A stored file is
//! never replaced; a taken name gets a fresh variant instead.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Characters in the random token inserted into a colliding name.
pub const NAME_TOKEN_LENGTH: usize = 7;

/// Names tried before giving up on a crowded directory.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem-backed store rooted at a media directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a storage-relative path.
    pub fn absolute(&self, relative: &str) -> Result<PathBuf, CoreError> {
        Ok(self.root.join(checked_relative(relative)?))
    }

    /// Store `data` at `relative`, or at a variant of it when that name is taken.
    ///
    /// The final name is claimed with a hard link from the temporary file,
    /// which fails if the name already exists, so concurrent uploads of the
    /// same filename never overwrite each other. A variant inserts a short
    /// random token before the extension (`uploads/user_1/a.png` becomes
    /// `uploads/user_1/a_3f9c2e1.png`), shortening the stem so the path stays
    /// within `max_len` characters.
    ///
    /// Parent directories are created as needed. Returns the storage-relative
    /// path actually written.
    pub async fn save(
        &self,
        relative: &str,
        data: &[u8],
        max_len: usize,
    ) -> Result<String, CoreError> {
        let target = self.absolute(relative)?;
        let parent = target
            .parent()
            .ok_or_else(|| CoreError::Storage(format!("Upload path '{relative}' has no parent")))?;

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| storage_error("create directory", parent, e))?;

        let tmp = parent.join(format!(".{}.part", uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage_error("write", &tmp, e));
        }

        let claimed = self.claim_name(&tmp, relative, max_len).await;
        let _ = tokio::fs::remove_file(&tmp).await;
        claimed
    }

    /// Link `tmp` under `relative` or the first free variant of it.
    async fn claim_name(
        &self,
        tmp: &Path,
        relative: &str,
        max_len: usize,
    ) -> Result<String, CoreError> {
        let mut candidate = relative.to_string();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let target = self.absolute(&candidate)?;
            match tokio::fs::hard_link(tmp, &target).await {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = name_variant(relative, max_len)?;
                }
                Err(e) => return Err(storage_error("store", &target, e)),
            }
        }
        Err(CoreError::Storage(format!(
            "No free name for '{relative}' after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Read back a stored file.
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, CoreError> {
        let path = self.absolute(relative)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| storage_error("read", &path, e))
    }

    /// Whether a file exists at `relative`.
    pub async fn exists(&self, relative: &str) -> Result<bool, CoreError> {
        let path = self.absolute(relative)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| storage_error("stat", &path, e))
    }

    /// Delete a stored file. A missing file is not an error.
    ///
    /// Returns `true` if a file was removed.
    pub async fn remove(&self, relative: &str) -> Result<bool, CoreError> {
        let path = self.absolute(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("remove", &path, e)),
        }
    }

    /// Delete a directory tree. A missing directory is not an error.
    ///
    /// Returns `true` if a directory was removed.
    pub async fn remove_dir(&self, relative: &str) -> Result<bool, CoreError> {
        let path = self.absolute(relative)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("remove directory", &path, e)),
        }
    }
}

/// `relative` with a random token before the extension, its stem cut so the
/// result fits in `max_len` characters.
fn name_variant(relative: &str, max_len: usize) -> Result<String, CoreError> {
    let (dir, name) = match relative.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, relative),
    };
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let token = uuid::Uuid::new_v4().simple().to_string();
    let token = &token[..NAME_TOKEN_LENGTH];

    let fixed = dir.map_or(0, |d| d.chars().count() + 1)
        + 1
        + NAME_TOKEN_LENGTH
        + ext.map_or(0, |e| e.chars().count() + 1);
    let stem: String = stem.chars().take(max_len.saturating_sub(fixed)).collect();
    if stem.is_empty() {
        return Err(CoreError::Storage(format!(
            "No room for a unique variant of '{relative}' within {max_len} characters"
        )));
    }

    let file = match ext {
        Some(ext) => format!("{stem}_{token}.{ext}"),
        None => format!("{stem}_{token}"),
    };
    Ok(match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file,
    })
}

/// Reject paths that would escape the media root.
fn checked_relative(relative: &str) -> Result<&Path, CoreError> {
    let path = Path::new(relative);
    let escapes = relative.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(CoreError::Storage(format!(
            "Invalid storage path '{relative}': must be relative to the media root"
        )));
    }
    Ok(path)
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> CoreError {
    CoreError::Storage(format!("Failed to {action} '{}': {err}", path.display()))
}
