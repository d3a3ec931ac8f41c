//! Products are the sellable catalogue items.

use serde::{Deserialize, Serialize};

use super::validation::{non_negative_amount, optional_text, required_name};
use super::{BrandId, CategoryId, Error, ProductId};

/// Stored product record. `price` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
}

/// Product list row with the brand and category names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    barcode: Option<String>,
    price: i64,
    brand_id: BrandId,
    category_id: CategoryId,
}

impl ProductDraft {
    /// Validate caller-supplied product fields.
    ///
    /// Brand and category existence is enforced by the store.
    pub fn try_new(
        name: &str,
        barcode: Option<&str>,
        price: i64,
        brand_id: BrandId,
        category_id: CategoryId,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
            barcode: optional_text(barcode),
            price: non_negative_amount("price", price)?,
            brand_id,
            category_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }
}
