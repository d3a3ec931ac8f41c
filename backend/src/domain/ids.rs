//! Strongly typed record identifiers.
//!
//! Each entity gets its own id newtype so a brand id can never be passed
//! where a product id is expected. On the wire they are plain integers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store identifier.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw store identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a brand row.
    BrandId
);
entity_id!(
    /// Identifier of a category row.
    CategoryId
);
entity_id!(
    /// Identifier of a customer row.
    CustomerId
);
entity_id!(
    /// Identifier of a product row.
    ProductId
);
entity_id!(
    /// Identifier of a user row.
    UserId
);
entity_id!(
    /// Identifier of an order row.
    OrderId
);
