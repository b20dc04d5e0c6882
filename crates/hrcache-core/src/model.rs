//! Resource model binding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CacheError, Result};

/// The resource type a cache manager is bound to.
///
/// The cache layer needs nothing from a model besides its name. Names are
/// restricted to ASCII letters, digits and `_` so that the derived
/// [`CachePattern`](crate::CachePattern) never contains glob metacharacters.
///
/// # Example
///
/// ```
/// use hrcache_core::ResourceModel;
///
/// let model = ResourceModel::new("Employee").unwrap();
/// assert_eq!(model.name(), "Employee");
/// assert_eq!(model.cache_name(), "EMPLOYEE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceModel {
    name: String,
}

impl ResourceModel {
    /// Creates a model binding, validating the name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(CacheError::configuration("model name cannot be empty"));
        }

        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(CacheError::configuration(format!(
                "model name '{}' contains invalid character '{}'",
                name,
                bad.escape_default()
            )));
        }

        Ok(Self { name })
    }

    /// Returns the model name as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the uppercased name used as key prefix.
    pub fn cache_name(&self) -> String {
        self.name.to_uppercase()
    }
}

impl fmt::Display for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TryFrom<String> for ResourceModel {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceModel {
    type Error = CacheError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ResourceModel> for String {
    fn from(model: ResourceModel) -> Self {
        model.name
    }
}
