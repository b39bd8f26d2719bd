use std::path::PathBuf;

/// Result alias that carries the custom [`ActorError`] type.
pub type Result<T> = std::result::Result<T, ActorError>;

/// Status code handed back to the host when a callback succeeds.
pub const STATUS_OK: i32 = 0;

/// Status code handed back to the host when a callback fails.
pub const STATUS_FAILURE: i32 = -1;

/// Common error type for the actor.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Free-form message, mostly used by the command line tooling.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The rendering engine refused to create an instance.
    #[error("could not create a projectM instance")]
    EngineCreation,
    /// The engine exists but its preset playlist could not be created.
    #[error("could not create the projectM preset playlist")]
    PlaylistCreation,
    /// A lifecycle call arrived before `init` or after `cleanup`.
    #[error("the actor has not been initialized")]
    NotInitialized,
    /// `init` was called twice without an intervening `cleanup`.
    #[error("the actor is already initialized")]
    AlreadyInitialized,
    /// The path cannot be handed to the engine (interior NUL byte or not UTF-8).
    #[error("path `{}` cannot be passed to the engine", .0.display())]
    InvalidPath(PathBuf),
}

impl ActorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ActorError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ActorError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

/// Collapses a callback result into the integer the host ABI expects.
pub fn status_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(_) => STATUS_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_negative_status() {
        assert_eq!(status_code(&Ok(())), STATUS_OK);
        assert!(status_code(&Err(ActorError::EngineCreation)) < 0);
        assert!(status_code(&Err(ActorError::PlaylistCreation)) < 0);
    }

    #[test]
    fn invalid_path_mentions_the_path() {
        let err = ActorError::InvalidPath(PathBuf::from("/tmp/presets"));
        assert!(err.to_string().contains("/tmp/presets"));
    }
}
