use thiserror::Error;

/// The four outcomes a caller of the board operations has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidArgument,
    StoreFailure,
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("user {user_id} does not own board {board_id}")]
    Forbidden { board_id: String, user_id: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Store failure: {message}")]
    StoreFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

impl BoardError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        BoardError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        BoardError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        BoardError::StoreFailure {
            message: message.into(),
        }
    }

    /// IO and serialization errors only ever come out of a store adapter.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::NotFound { .. } => ErrorKind::NotFound,
            BoardError::Forbidden { .. } => ErrorKind::Forbidden,
            BoardError::InvalidArgument { .. }
            | BoardError::ConfigError { .. }
            | BoardError::ConfigValidationError { .. } => ErrorKind::InvalidArgument,
            BoardError::StoreFailure { .. }
            | BoardError::IoError(_)
            | BoardError::SerializationError(_) => ErrorKind::StoreFailure,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.kind() {
            ErrorKind::NotFound => format!("Nothing found: {}", self),
            ErrorKind::Forbidden => "You do not have access to this board".to_string(),
            ErrorKind::InvalidArgument => format!("Request rejected: {}", self),
            ErrorKind::StoreFailure => format!("The board store failed: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "Refresh the board; the record may have been deleted",
            ErrorKind::Forbidden => "Ask the board owner to perform this change",
            ErrorKind::InvalidArgument => "Reload the board state and retry with valid input",
            ErrorKind::StoreFailure => {
                "Check the data directory and retry the whole operation"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(BoardError::not_found("board", "b1").kind(), ErrorKind::NotFound);
        assert_eq!(BoardError::invalid("bad").kind(), ErrorKind::InvalidArgument);
        assert_eq!(BoardError::store("down").kind(), ErrorKind::StoreFailure);

        let io = BoardError::from(std::io::Error::other("disk"));
        assert_eq!(io.kind(), ErrorKind::StoreFailure);

        let cfg = BoardError::ConfigValidationError {
            field: "limits.title_max_chars".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(cfg.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_display_messages() {
        let err = BoardError::not_found("list", "l-42");
        assert_eq!(err.to_string(), "list not found: l-42");

        let err = BoardError::Forbidden {
            board_id: "b1".to_string(),
            user_id: "u2".to_string(),
        };
        assert!(err.to_string().contains("does not own board b1"));
        assert!(err.user_friendly_message().contains("access"));
    }
}
