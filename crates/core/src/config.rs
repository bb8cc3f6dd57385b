use std::path::PathBuf;

use crate::media::MediaStore;

/// Default media root, relative to the working directory.
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Media storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory under which `uploads/user_<uid>/...` lives.
    pub media_root: PathBuf,
}

impl MediaConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var      | Default |
    /// |--------------|---------|
    /// | `MEDIA_ROOT` | `media` |
    pub fn from_env() -> Self {
        let media_root = std::env::var("MEDIA_ROOT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MEDIA_ROOT.into());

        Self {
            media_root: PathBuf::from(media_root),
        }
    }

    /// Build a [`MediaStore`] rooted at the configured directory.
    pub fn store(&self) -> MediaStore {
        MediaStore::new(&self.media_root)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
        }
    }
}
