//! SQLite-backed `CategoryRepository` implementation using Diesel ORM.

use crate::domain::ports::CategoryRepository;
use crate::domain::{Category, CategoryDraft, CategoryId, CategorySummary};

use super::models::CategoryRow;

crate::named_catalogue_repository! {
    /// Diesel-backed implementation of the `CategoryRepository` port.
    pub struct DieselCategoryRepository;
    port: CategoryRepository,
    table: categories,
    product_fk: category_id,
    entity: "category",
    row: CategoryRow,
    write: CategoryWrite,
    record: Category,
    summary: CategorySummary,
    id: CategoryId,
    draft: CategoryDraft,
}
