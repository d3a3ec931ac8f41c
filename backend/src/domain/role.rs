//! User roles and the permission matrix attached to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including other administrators' accounts.
    SuperAdmin,
    /// Full access except `super_admin` accounts.
    Admin,
    /// Reads the catalogue and records customers and orders.
    Operator,
}

/// Data set a command touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Product brands.
    Brands,
    /// Product categories.
    Categories,
    /// Customer records.
    Customers,
    /// Catalogue products.
    Products,
    /// Orders and their lines.
    Orders,
    /// User accounts.
    Users,
    /// Aggregated sales reports.
    Reports,
}

/// What a command does to its [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List or fetch.
    Read,
    /// Insert a new record.
    Create,
    /// Change an existing record.
    Update,
    /// Remove a record.
    Delete,
}

impl Role {
    /// Storage and wire spelling of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }

    /// Whether this role may perform `action` on `resource`.
    ///
    /// Every role is matched explicitly; adding a role fails to compile until
    /// it is given a row here.
    pub const fn permits(self, resource: Resource, action: Action) -> bool {
        match self {
            Self::SuperAdmin | Self::Admin => true,
            Self::Operator => match resource {
                Resource::Brands
                | Resource::Categories
                | Resource::Products => matches!(action, Action::Read),
                Resource::Customers => {
                    matches!(action, Action::Read | Action::Create | Action::Update)
                }
                Resource::Orders => matches!(action, Action::Read | Action::Create),
                Resource::Users | Resource::Reports => false,
            },
        }
    }

    /// Whether this role may create, change or remove accounts holding
    /// `target`.
    pub const fn may_manage(self, target: Role) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::Admin => !matches!(target, Role::SuperAdmin),
            Self::Operator => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or supplied role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Brands => "brands",
            Self::Categories => "categories",
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Users => "users",
            Self::Reports => "reports",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}
