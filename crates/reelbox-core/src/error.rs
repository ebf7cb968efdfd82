/// Central error type for the Reelbox system.
#[derive(Debug, thiserror::Error)]
pub enum ReelboxError {
    #[error("Collection \"{name}\" already exists")]
    DuplicateName { name: String },

    #[error("collection name cannot be empty")]
    EmptyName,

    #[error("collection not found: {id}")]
    CollectionNotFound { id: String },

    #[error("authentication failed for {service}: {message}")]
    AuthFailed { service: String, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by {service}, retry after {retry_after_secs}s")]
    RateLimited { service: String, retry_after_secs: u64 },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("credential error: {message}")]
    CredentialError { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ReelboxError {
    /// True for errors raised by input validation rather than by a backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReelboxError::DuplicateName { .. }
                | ReelboxError::EmptyName
                | ReelboxError::CollectionNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for ReelboxError {
    fn from(e: serde_json::Error) -> Self {
        ReelboxError::Serialization(e.to_string())
    }
}
