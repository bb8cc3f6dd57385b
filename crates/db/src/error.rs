//! Repository error type.
//!
//! Wraps domain errors from `folio_core` and raw sqlx errors, classifying
//! PostgreSQL constraint violations into their domain equivalents.

use folio_core::error::CoreError;
use folio_core::types::DbId;

/// PostgreSQL `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain-level error (validation, referential, not found, storage).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience alias for repository return values.
pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Classify an insert/update error, attributing a foreign-key violation to
    /// the given parent reference.
    pub(crate) fn with_parent(
        err: sqlx::Error,
        entity: &'static str,
        parent: &'static str,
        parent_id: DbId,
    ) -> Self {
        if pg_code(&err).as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) {
            return RepoError::Core(CoreError::MissingParent {
                entity,
                parent,
                id: Some(parent_id),
            });
        }
        RepoError::from(err)
    }

    /// The wrapped domain error, if any.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            RepoError::Core(core) => Some(core),
            RepoError::Database(_) => None,
        }
    }

    /// Names of the fields that failed validation (empty for other errors).
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.as_core()
            .map(CoreError::invalid_fields)
            .unwrap_or_default()
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        let code = pg_code(&err);
        match code.as_deref() {
            Some(PG_UNIQUE_VIOLATION) => {
                let constraint = constraint_name(&err).unwrap_or_else(|| "unknown".into());
                RepoError::Core(CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )))
            }
            Some(PG_FOREIGN_KEY_VIOLATION) => {
                let (entity, parent) = match constraint_name(&err).as_deref() {
                    Some("projects_user_id_fkey") => ("project", "user"),
                    Some("screenshots_project_id_fkey") => ("screenshot", "project"),
                    _ => ("record", "parent"),
                };
                RepoError::Core(CoreError::MissingParent {
                    entity,
                    parent,
                    id: None,
                })
            }
            _ => RepoError::Database(err),
        }
    }
}

fn pg_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn constraint_name(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}
