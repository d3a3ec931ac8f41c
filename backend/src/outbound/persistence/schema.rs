//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! SQLite reports `INTEGER PRIMARY KEY` columns as `Integer`; they are
//! declared as `BigInt` here because SQLite integers are 64-bit and the
//! domain identifiers are `i64`. Keep that in mind when regenerating with
//! `diesel print-schema`.

diesel::table! {
    /// Back-office accounts.
    users (id) {
        id -> BigInt,
        /// Login name; unique.
        name -> Text,
        /// One of `super_admin`, `admin`, `operator`.
        role -> Text,
        /// `sha256$<rounds>$<salt-hex>$<digest-hex>`.
        password_hash -> Text,
    }
}

diesel::table! {
    brands (id) {
        id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    categories (id) {
        id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    customers (id) {
        id -> BigInt,
        name -> Text,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
    }
}

diesel::table! {
    /// Sellable catalogue items. `price` is in minor currency units.
    products (id) {
        id -> BigInt,
        name -> Text,
        barcode -> Nullable<Text>,
        price -> BigInt,
        brand_id -> BigInt,
        category_id -> BigInt,
    }
}

diesel::table! {
    /// Order headers; `total_price` is the sum of the line subtotals.
    orders (id) {
        id -> BigInt,
        customer_id -> BigInt,
        user_id -> BigInt,
        total_price -> BigInt,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Order lines; removed together with their order.
    order_lines (id) {
        id -> BigInt,
        order_id -> BigInt,
        product_id -> BigInt,
        quantity -> BigInt,
        /// Unit price charged.
        price -> BigInt,
    }
}

diesel::joinable!(products -> brands (brand_id));
diesel::joinable!(products -> categories (category_id));
diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_lines -> orders (order_id));
diesel::joinable!(order_lines -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    brands,
    categories,
    customers,
    order_lines,
    orders,
    products,
    users,
);
