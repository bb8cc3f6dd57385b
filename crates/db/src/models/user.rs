//! User entity model and DTOs.

use folio_core::error::CoreError;
use folio_core::types::{DbId, Timestamp};
use folio_core::upload::UploadOwner;
use folio_core::validation::FieldChecker;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_PASSWORD_HASH_LENGTH: usize = 128;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 30;
pub const MAX_SHORT_BIO_LENGTH: usize = 300;
pub const MAX_PROFILE_URL_LENGTH: usize = 200;

/// Base account fields every user carries.
///
/// Contains the password hash -- NEVER serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<Timestamp>,
    pub date_joined: Timestamp,
}

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub account: Account,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub short_bio: Option<String>,
    /// Storage-relative path of the avatar image.
    pub image: Option<String>,
    /// Storage-relative path of the resume file.
    pub resume: Option<String>,
    pub website: Option<String>,
    pub github_profile: Option<String>,
    pub linkedin_profile: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Stored path for the given upload slot.
    pub fn upload(&self, slot: UserUploadSlot) -> Option<&str> {
        match slot {
            UserUploadSlot::Image => self.image.as_deref(),
            UserUploadSlot::Resume => self.resume.as_deref(),
        }
    }
}

impl UploadOwner for User {
    fn owner_user_id(&self) -> Option<DbId> {
        Some(self.id)
    }
}

/// The two file slots on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserUploadSlot {
    Image,
    Resume,
}

impl UserUploadSlot {
    /// Column in `users` holding this slot's path.
    pub fn column(self) -> &'static str {
        match self {
            UserUploadSlot::Image => "image",
            UserUploadSlot::Resume => "resume",
        }
    }

    /// Whether uploads to this slot must be decodable images.
    pub fn requires_image(self) -> bool {
        matches!(self, UserUploadSlot::Image)
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub short_bio: Option<String>,
    pub website: Option<String>,
    pub github_profile: Option<String>,
    pub linkedin_profile: Option<String>,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required("username", &self.username, MAX_USERNAME_LENGTH)
            .required("password_hash", &self.password_hash, MAX_PASSWORD_HASH_LENGTH)
            .required("email", &self.email, MAX_EMAIL_LENGTH)
            .email("email", Some(self.email.as_str()), MAX_EMAIL_LENGTH)
            .required("first_name", &self.first_name, MAX_NAME_LENGTH)
            .required("last_name", &self.last_name, MAX_NAME_LENGTH)
            .optional("short_bio", self.short_bio.as_deref(), MAX_SHORT_BIO_LENGTH)
            .url("website", self.website.as_deref(), MAX_PROFILE_URL_LENGTH)
            .url(
                "github_profile",
                self.github_profile.as_deref(),
                MAX_PROFILE_URL_LENGTH,
            )
            .url(
                "linkedin_profile",
                self.linkedin_profile.as_deref(),
                MAX_PROFILE_URL_LENGTH,
            )
            .finish()
    }
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub short_bio: Option<String>,
    pub website: Option<String>,
    pub github_profile: Option<String>,
    pub linkedin_profile: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Validate the fields this patch sets. Required fields may not be blanked.
    pub fn validate(&self) -> Result<(), CoreError> {
        FieldChecker::new()
            .required_if_set("username", self.username.as_deref(), MAX_USERNAME_LENGTH)
            .required_if_set("email", self.email.as_deref(), MAX_EMAIL_LENGTH)
            .email("email", self.email.as_deref(), MAX_EMAIL_LENGTH)
            .required_if_set("first_name", self.first_name.as_deref(), MAX_NAME_LENGTH)
            .required_if_set("last_name", self.last_name.as_deref(), MAX_NAME_LENGTH)
            .optional("short_bio", self.short_bio.as_deref(), MAX_SHORT_BIO_LENGTH)
            .url("website", self.website.as_deref(), MAX_PROFILE_URL_LENGTH)
            .url(
                "github_profile",
                self.github_profile.as_deref(),
                MAX_PROFILE_URL_LENGTH,
            )
            .url(
                "linkedin_profile",
                self.linkedin_profile.as_deref(),
                MAX_PROFILE_URL_LENGTH,
            )
            .finish()
    }
}
