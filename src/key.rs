//! Hierarchical configuration keys.

use crate::error::{Result, VaultError};
use std::fmt;

/// A parsed hierarchical configuration key.
///
/// Raw keys have the form `namespace/item-path`: the namespace is everything
/// before the first `/`, the item path is everything after it and may itself
/// contain further `/` separators (e.g. `production/database/host`).
///
/// # Examples
///
/// ```rust
/// use config_vault::key::ConfigKey;
///
/// let key = ConfigKey::parse("production/database/host").unwrap();
/// assert_eq!(key.namespace(), "production");
/// assert_eq!(key.item(), "database/host");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    namespace: String,
    item: String,
}

impl ConfigKey {
    /// Parse a raw key into its namespace and item parts.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidKeyFormat`] when the key has no `/`
    /// separator after the first character, or when the item part is empty
    /// or whitespace-only.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.find('/') {
            Some(index) if index > 0 => {
                let item = &raw[index + 1..];
                if item.trim().is_empty() {
                    return Err(VaultError::InvalidKeyFormat(
                        "item name cannot be empty".to_string(),
                    ));
                }
                Ok(Self {
                    namespace: raw[..index].to_string(),
                    item: item.to_string(),
                })
            }
            _ => Err(VaultError::InvalidKeyFormat(
                "key must contain a '/' separator (format: namespace/item)".to_string(),
            )),
        }
    }

    /// The namespace part (the vault folder name).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The item path within the namespace.
    pub fn item(&self) -> &str {
        &self.item
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.item)
    }
}
