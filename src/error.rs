use thiserror::Error;

/// Failures surfaced by command and interaction handlers.
///
/// Platform failures are never retried; handlers log the detail and show the
/// invoking user a generic message.
#[derive(Debug, Error)]
pub enum BotError {
    /// A role or channel reference no longer resolves on the platform.
    #[error("{0} not found")]
    NotFound(String),

    /// The durable role-config record could not be read or parsed.
    #[error("role config storage failed: {0}")]
    Storage(String),

    /// An outbound platform API call failed.
    #[error("platform call failed: {0}")]
    Platform(#[from] serenity::Error),
}

impl BotError {
    /// Shorthand for a missing role reference.
    pub fn role_not_found(role_id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("role {}", role_id))
    }
}
