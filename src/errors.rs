//! The five error kinds the engine can report (see `last_error`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForthError {
    #[error("word not found: '{word}'")]
    WordNotFound { word: String },

    #[error("compilation error in '{expression}': {message}")]
    CompilationError { expression: String, message: String },

    #[error("control flow mismatch in '{expression}': {message}")]
    ControlFlowMismatch { expression: String, message: String },

    #[error("execution error in '{expression}': {message}")]
    ExecutionError { expression: String, message: String },

    #[error("I/O error loading '{path}': {message}")]
    IoError { path: String, message: String },
}

impl ForthError {
    pub fn word_not_found(word: impl Into<String>) -> Self {
        ForthError::WordNotFound { word: word.into() }
    }

    pub fn compilation(expression: impl Into<String>, message: impl Into<String>) -> Self {
        ForthError::CompilationError {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn control_flow(expression: impl Into<String>, message: impl Into<String>) -> Self {
        ForthError::ControlFlowMismatch {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn execution(expression: impl Into<String>, message: impl Into<String>) -> Self {
        ForthError::ExecutionError {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        ForthError::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_offending_token() {
        let e = ForthError::word_not_found("FROBNICATE");
        assert!(e.to_string().contains("FROBNICATE"));
    }
}
