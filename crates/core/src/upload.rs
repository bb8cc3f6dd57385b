//! Upload path resolution for user-owned files.
//!
//! Every uploaded file (user avatar, resume, project screenshot) is stored
//! under a directory named after the user that owns it:
//!
//! ```text
//! uploads/user_<uid>/<basename>
//! ```
//!
//! The owning user is asked of the upload target through [`UploadOwner`], so a
//! screenshot resolves through its project's owner rather than its own id.

use crate::types::DbId;

/// Root directory (relative to the media root) for all uploads.
pub const UPLOADS_DIR: &str = "uploads";

/// Substituted for the user id when the owner is not yet known.
pub const UNASSIGNED_OWNER: &str = "unassigned";

/// Longest storage-relative path an upload slot can hold, in characters.
pub const MAX_UPLOAD_PATH_LENGTH: usize = 255;

/// Basename used when the supplied filename has no file component.
pub const FALLBACK_BASENAME: &str = "upload";

/// A record that files can be uploaded to.
pub trait UploadOwner {
    /// Id of the user whose upload directory receives the file.
    ///
    /// `None` when the owner cannot be determined yet (e.g. an unsaved record).
    fn owner_user_id(&self) -> Option<DbId>;
}

/// Upload targets known to the data layer, carrying just enough to find the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    /// A user's own image or resume slot.
    User { user_id: Option<DbId> },
    /// A screenshot's image slot; owned by the user that owns its project.
    Screenshot { project_owner_id: Option<DbId> },
}

impl UploadOwner for UploadTarget {
    fn owner_user_id(&self) -> Option<DbId> {
        match *self {
            UploadTarget::User { user_id } => user_id,
            UploadTarget::Screenshot { project_owner_id } => project_owner_id,
        }
    }
}

/// Strip any directory components (`/` or `\` separated) from `filename`.
pub fn upload_basename(filename: &str) -> &str {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_BASENAME
    } else {
        base
    }
}

/// Directory that holds every upload owned by `user_id`.
pub fn owner_directory(user_id: Option<DbId>) -> String {
    match user_id {
        Some(id) => format!("{UPLOADS_DIR}/user_{id}"),
        None => format!("{UPLOADS_DIR}/user_{UNASSIGNED_OWNER}"),
    }
}

/// Whether `path` names a file directly inside `user_id`'s upload directory.
///
/// Paths with extra directory levels, `.`/`..` names or another user's
/// directory are rejected.
pub fn is_owner_path(user_id: Option<DbId>, path: &str) -> bool {
    let dir = owner_directory(user_id);
    match path
        .strip_prefix(dir.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(name) => {
            !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
        }
        None => false,
    }
}

/// Storage-relative path for `filename` uploaded to `target`.
///
/// # Examples
///
/// ```
/// use folio_core::upload::{file_upload_path, UploadTarget};
///
/// let user = UploadTarget::User { user_id: Some(5) };
/// assert_eq!(file_upload_path(&user, "test.jpg"), "uploads/user_5/test.jpg");
///
/// let shot = UploadTarget::Screenshot { project_owner_id: Some(7) };
/// assert_eq!(file_upload_path(&shot, "/tmp/test.jpg"), "uploads/user_7/test.jpg");
/// ```
pub fn file_upload_path<T: UploadOwner + ?Sized>(target: &T, filename: &str) -> String {
    format!(
        "{}/{}",
        owner_directory(target.owner_user_id()),
        upload_basename(filename)
    )
}
