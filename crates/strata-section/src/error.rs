use thiserror::Error;

/// Errors produced while building sections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("invalid section path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("duplicate section: {0}")]
    DuplicateSection(String),
}

pub type SectionResult<T> = Result<T, SectionError>;
