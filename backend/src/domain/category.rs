//! Categories group products by kind.

use serde::{Deserialize, Serialize};

use super::validation::required_name;
use super::{CategoryId, Error};

/// Stored category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Category list row carrying the number of products that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}

/// Validated fields for creating or renaming a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    name: String,
}

impl CategoryDraft {
    /// Validate caller-supplied category fields.
    pub fn try_new(name: &str) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
