/// Error category. Determines the process exit code and lets callers react to
/// recoverable conditions (e.g. show a message instead of aborting the TUI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid CLI values or request parameters (bad date range, bad horizon).
    InvalidInput,
    /// Backing store missing, unreadable, or lacking a required column.
    DataUnavailable,
    /// A selection yielded zero rows where a command needed data.
    EmptySelection,
    /// Fewer usable history points than the forecaster needs.
    InsufficientHistory,
    /// Numeric failure or a collaborator breaking its contract.
    Internal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidInput | ErrorKind::DataUnavailable => 2,
            ErrorKind::EmptySelection | ErrorKind::InsufficientHistory => 3,
            ErrorKind::Internal => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataUnavailable, message)
    }

    pub fn empty_selection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptySelection, message)
    }

    pub fn insufficient_history(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientHistory, message)
    }

    /// Horizon outside the configured bounds. The policy here is to error,
    /// not clamp; interactive widgets clamp before calling the core.
    pub fn invalid_horizon(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::invalid_input("x").exit_code(), 2);
        assert_eq!(AppError::data_unavailable("x").exit_code(), 2);
        assert_eq!(AppError::empty_selection("x").exit_code(), 3);
        assert_eq!(AppError::insufficient_history("x").exit_code(), 3);
        assert_eq!(AppError::internal("x").exit_code(), 4);
    }
}
