use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Separates the section path from the title of an update action.
pub const UPDATE_MARK: &str = " ~> ";

/// Separates the section path from the title of a replace action.
pub const REPLACE_MARK: &str = " => ";

/// Key of a section inside the global state.
///
/// A path is non-empty and contains no whitespace. Both markers start with a
/// space, so neither can occur inside a path and a prefix test on an action
/// type always identifies exactly one section.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionPath(String);

impl SectionPath {
    pub fn new(path: impl Into<String>) -> SectionResult<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(SectionError::InvalidPath {
                path,
                reason: "path is empty",
            });
        }
        if path.chars().any(char::is_whitespace) {
            return Err(SectionError::InvalidPath {
                path,
                reason: "path contains whitespace",
            });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SectionPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SectionPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionPath {
    type Error = SectionError;

    fn try_from(path: String) -> SectionResult<Self> {
        Self::new(path)
    }
}

impl TryFrom<&str> for SectionPath {
    type Error = SectionError;

    fn try_from(path: &str) -> SectionResult<Self> {
        Self::new(path)
    }
}

impl From<SectionPath> for String {
    fn from(path: SectionPath) -> Self {
        path.0
    }
}
