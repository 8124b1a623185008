use std::fmt;

use thiserror::Error;

/// Identifier fields guarded by a uniqueness check on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    UserId,
    Email,
    CourseId,
}

impl KeyField {
    /// Field name as it appears in the documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyField::UserId => "userId",
            KeyField::Email => "email",
            KeyField::CourseId => "courseId",
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KeyField::UserId => "user ID",
            KeyField::Email => "email",
            KeyField::CourseId => "course ID",
        };
        f.write_str(label)
    }
}

/// Failures that reach the caller. Everything else (missing records, I/O
/// trouble, malformed documents) degrades to a default value instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{field} already exists: {value}")]
    DuplicateKey { field: KeyField, value: String },
}

impl ServiceError {
    pub fn duplicate(field: KeyField, value: &str) -> Self {
        Self::DuplicateKey { field, value: value.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::DuplicateKey { field: KeyField::UserId, .. } => 1201,
            ServiceError::DuplicateKey { field: KeyField::Email, .. } => 1202,
            ServiceError::DuplicateKey { field: KeyField::CourseId, .. } => 1203,
        }
    }
}
