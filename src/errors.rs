use thiserror::Error;

/// Errors raised while loading configuration, reading the costing snapshot,
/// or validating request parameters.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    /// True for errors caused by the caller's input rather than the service.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
