/// Domain-level error shared by every layer.
///
/// The content service is the boundary that produces these; the HTTP layer
/// only maps them to status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Underlying storage failure. The message is for logs, not for clients.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Shorthand for a missing content record.
    pub fn content_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Content",
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
