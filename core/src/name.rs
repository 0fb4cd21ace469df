//! Local name validation.

use crate::error::{TransportError, TransportResult};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Separator between a namespace prefix and a local name.
pub const PREFIX_SEPARATOR: char = ':';

/// Characters a backend reserves in addition to the two separators.
pub const DEFAULT_RESERVED_CHARACTERS: &str = "[]|*";

/// Validates candidate local names against the separator class and the
/// backend's reserved characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidator {
    reserved: Vec<char>,
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_CHARACTERS.chars())
    }
}

impl NameValidator {
    /// Create a validator with the given reserved characters. The path and
    /// prefix separators are always reserved.
    pub fn new(reserved: impl IntoIterator<Item = char>) -> Self {
        let mut chars = vec![PATH_SEPARATOR, PREFIX_SEPARATOR];
        for c in reserved {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        Self { reserved: chars }
    }

    /// Reserved characters, separators first.
    pub fn reserved(&self) -> &[char] {
        &self.reserved
    }

    /// Succeeds when `name` is a legal local name.
    pub fn assert_valid_name(&self, name: &str) -> TransportResult<()> {
        if name.is_empty() {
            return Err(TransportError::invalid_name(name, "name is empty"));
        }
        if name == "." || name == ".." {
            return Err(TransportError::invalid_name(name, "name is a relative path step"));
        }
        if name.trim().is_empty() {
            return Err(TransportError::invalid_name(name, "name is only whitespace"));
        }
        if let Some(c) = name.chars().find(|c| self.reserved.contains(c)) {
            return Err(TransportError::invalid_name(
                name,
                format!("contains reserved character '{}'", c),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(TransportError::invalid_name(name, "contains a control character"));
        }
        Ok(())
    }

    /// Validate a possibly prefixed name (`prefix:local` or `local`).
    pub fn assert_valid_qualified_name(&self, name: &str) -> TransportResult<()> {
        match name.split_once(PREFIX_SEPARATOR) {
            Some((prefix, local)) => {
                self.assert_valid_name(prefix)
                    .map_err(|_| TransportError::invalid_name(name, "invalid namespace prefix"))?;
                self.assert_valid_name(local)
                    .map_err(|e| match e {
                        TransportError::InvalidName { reason, .. } => {
                            TransportError::invalid_name(name, reason)
                        }
                        other => other,
                    })
            }
            None => self.assert_valid_name(name),
        }
    }
}

/// Validate a local name with the default reserved characters.
pub fn assert_valid_name(name: &str) -> TransportResult<()> {
    NameValidator::default().assert_valid_name(name)
}
