//! SQLite-backed `BrandRepository` implementation using Diesel ORM.

use crate::domain::ports::BrandRepository;
use crate::domain::{Brand, BrandDraft, BrandId, BrandSummary};

use super::models::BrandRow;

crate::named_catalogue_repository! {
    /// Diesel-backed implementation of the `BrandRepository` port.
    pub struct DieselBrandRepository;
    port: BrandRepository,
    table: brands,
    product_fk: brand_id,
    entity: "brand",
    row: BrandRow,
    write: BrandWrite,
    record: Brand,
    summary: BrandSummary,
    id: BrandId,
    draft: BrandDraft,
}
