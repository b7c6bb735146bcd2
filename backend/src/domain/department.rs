//! Department aggregate.

use std::fmt;

use thiserror::Error;

use crate::domain::audit::AuditTrail;

/// Validation error raised when constructing a [`DepartmentId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepartmentIdError {
    /// Identifier is missing or blank after trimming whitespace.
    #[error("Department ID cannot be blank")]
    Blank,
}

/// Natural department identifier, lowercased at construction.
///
/// Every entry point builds a `DepartmentId` before touching the store, so
/// lookups, writes, and foreign keys inside assignment input all observe the
/// same normalised form.
///
/// # Examples
/// ```
/// use hr_backend::domain::department::DepartmentId;
///
/// let id = DepartmentId::new("D001").expect("valid id");
/// assert_eq!(id.as_str(), "d001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartmentId(String);

impl DepartmentId {
    /// Validate and construct an identifier, rejecting blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DepartmentIdError> {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            return Err(DepartmentIdError::Blank);
        }
        Ok(Self(raw.to_lowercase()))
    }

    /// Borrow the normalised identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for DepartmentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Department record. Referenced, never owned, by department assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub active: bool,
    pub audit: AuditTrail,
}
