//! Absolute repository paths.
//!
//! A path always starts at the repository root (`/`) and names either a node
//! or a property. Segments are qualified names (`prefix:local` or `local`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TransportError, TransportResult};
use crate::name::{NameValidator, PATH_SEPARATOR};

/// An absolute, slash-delimited location in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path(String);

impl Path {
    /// The repository root.
    pub fn root() -> Self {
        Self(PATH_SEPARATOR.to_string())
    }

    /// Parse and validate an absolute path.
    pub fn parse(path: impl Into<String>) -> TransportResult<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(TransportError::invalid_path(path, "path is empty"));
        }
        if !path.starts_with(PATH_SEPARATOR) {
            return Err(TransportError::invalid_path(path, "path is not absolute"));
        }
        if path.len() == 1 {
            return Ok(Self(path));
        }
        if path.ends_with(PATH_SEPARATOR) {
            return Err(TransportError::invalid_path(path, "trailing separator"));
        }

        let validator = NameValidator::default();
        for segment in path[1..].split(PATH_SEPARATOR) {
            if segment.is_empty() {
                return Err(TransportError::invalid_path(path, "empty segment"));
            }
            if let Err(e) = validator.assert_valid_qualified_name(segment) {
                return Err(TransportError::invalid_path(path, e.to_string()));
            }
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Segments below the root, in order. Empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0[1..].split(PATH_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The final segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit(PATH_SEPARATOR).next()
    }

    /// The parent path, `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(PATH_SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Split into parent path and final segment. Fails for the root.
    pub fn split_last(&self) -> TransportResult<(Path, &str)> {
        match (self.parent(), self.name()) {
            (Some(parent), Some(name)) => Ok((parent, name)),
            _ => Err(TransportError::invalid_path(
                self.as_str(),
                "the root has no parent",
            )),
        }
    }

    /// Append a child segment.
    pub fn child(&self, name: &str) -> TransportResult<Path> {
        NameValidator::default()
            .assert_valid_qualified_name(name)
            .map_err(|e| TransportError::invalid_path(format!("{}/{}", self, name), e.to_string()))?;
        if self.is_root() {
            Ok(Self(format!("/{}", name)))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == PATH_SEPARATOR as u8
    }

    /// True when `self` equals `other` or lies below it.
    pub fn is_same_or_descendant_of(&self, other: &Path) -> bool {
        self == other || other.is_ancestor_of(self)
    }

    /// Replace the `from` prefix with `to`. `None` when `self` is not at or
    /// below `from`.
    pub fn rebase(&self, from: &Path, to: &Path) -> Option<Path> {
        if self == from {
            return Some(to.clone());
        }
        if !from.is_ancestor_of(self) {
            return None;
        }
        let rest = if from.is_root() {
            &self.0[1..]
        } else {
            &self.0[from.0.len() + 1..]
        };
        if to.is_root() {
            Some(Self(format!("/{}", rest)))
        } else {
            Some(Self(format!("{}/{}", to.0, rest)))
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Path {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = TransportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Path {
    type Error = TransportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
