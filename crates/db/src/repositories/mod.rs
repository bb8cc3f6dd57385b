//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Writes validate their input
//! before touching the database.

pub mod project_repo;
pub mod screenshot_repo;
pub mod user_repo;

pub use project_repo::ProjectRepo;
pub use screenshot_repo::ScreenshotRepo;
pub use user_repo::UserRepo;
