use crate::types::DbId;
use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// One or more fields failed validation. Every violation names its field.
    #[error("Validation failed: {0}")]
    InvalidFields(ValidationErrors),

    /// A child record references a parent that does not exist.
    #[error("Referential violation: {entity} requires an existing {parent} (id {id:?})")]
    MissingParent {
        entity: &'static str,
        parent: &'static str,
        id: Option<DbId>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Names of the fields that failed validation, in the order they were checked.
    ///
    /// Empty for every variant other than [`CoreError::InvalidFields`].
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        match self {
            CoreError::InvalidFields(errors) => errors.fields(),
            _ => Vec::new(),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::InvalidFields(errors)
    }
}
