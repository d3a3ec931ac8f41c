//! Which cached views a successful mutation makes stale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Data set a command reads or writes, as seen by the client cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Brands,
    Categories,
    Customers,
    Products,
    Users,
    Orders,
    Reports,
}

impl Entity {
    pub const ALL: [Self; 7] = [
        Self::Brands,
        Self::Categories,
        Self::Customers,
        Self::Products,
        Self::Users,
        Self::Orders,
        Self::Reports,
    ];

    /// Command prefix, e.g. `brands` in `brands:list`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brands => "brands",
            Self::Categories => "categories",
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Users => "users",
            Self::Orders => "orders",
            Self::Reports => "reports",
        }
    }

    /// Entity addressed by a command name such as `products:update`.
    pub fn of_command(command: &str) -> Option<Self> {
        let (prefix, _) = command.split_once(':')?;
        Self::ALL.into_iter().find(|entity| entity.as_str() == prefix)
    }

    /// Entities whose cached queries must be dropped after this entity is
    /// mutated. Always includes `self`.
    ///
    /// Product lists embed brand and category names, brand and category
    /// lists count products, and orders embed customer and cashier names.
    pub const fn dependents(self) -> &'static [Self] {
        match self {
            Self::Brands => &[Self::Brands, Self::Products],
            Self::Categories => &[Self::Categories, Self::Products],
            Self::Products => &[
                Self::Products,
                Self::Brands,
                Self::Categories,
                Self::Orders,
                Self::Reports,
            ],
            Self::Customers => &[Self::Customers, Self::Orders, Self::Reports],
            Self::Users => &[Self::Users, Self::Orders],
            Self::Orders => &[Self::Orders, Self::Customers, Self::Reports],
            Self::Reports => &[Self::Reports],
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
