//! Customers place orders.

use serde::{Deserialize, Serialize};

use super::validation::{optional_email, optional_text, required_name};
use super::{CustomerId, Error};

/// Stored customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Customer list row carrying the number of orders placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub order_count: i64,
}

/// Validated customer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    name: String,
    phone: Option<String>,
    email: Option<String>,
}

impl CustomerDraft {
    /// Validate caller-supplied customer fields.
    ///
    /// Blank phone and e-mail values are stored as absent.
    pub fn try_new(name: &str, phone: Option<&str>, email: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
            phone: optional_text(phone),
            email: optional_email(email)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
