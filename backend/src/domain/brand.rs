//! Brands group products by manufacturer.

use serde::{Deserialize, Serialize};

use super::validation::required_name;
use super::{BrandId, Error};

/// Stored brand record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// Brand list row carrying the number of products that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSummary {
    pub id: BrandId,
    pub name: String,
    pub product_count: i64,
}

/// Validated fields for creating or renaming a brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDraft {
    name: String,
}

impl BrandDraft {
    /// Validate caller-supplied brand fields.
    pub fn try_new(name: &str) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
