//! Brand commands.

use std::sync::Arc;

use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::BrandRepository;
use crate::domain::{
    Action, Authorizer, Brand, BrandDraft, BrandId, BrandSummary, Deleted, DomainResult, Envelope,
    Error, Resource, UserId,
};

use super::ListRequest;

/// `brands:get` and `brands:delete` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BrandIdRequest {
    pub logged_user_id: UserId,
    pub brand_id: BrandId,
}

/// `brands:create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveBrandRequest {
    pub logged_user_id: UserId,
    pub name: String,
}

/// `brands:update` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBrandRequest {
    pub logged_user_id: UserId,
    pub brand_id: BrandId,
    pub name: String,
}

/// Brand operations behind the command channel.
#[derive(Clone)]
pub struct BrandsController {
    authorizer: Authorizer,
    brands: Arc<dyn BrandRepository>,
}

impl BrandsController {
    /// Controller over `brands`, gated by `authorizer`.
    pub fn new(authorizer: Authorizer, brands: Arc<dyn BrandRepository>) -> Self {
        Self { authorizer, brands }
    }

    async fn allow(&self, user: UserId, action: Action) -> DomainResult<()> {
        self.authorizer
            .authorize(user, Resource::Brands, action)
            .await
            .map(drop)
    }

    /// Page through brands, optionally filtered by name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<BrandSummary>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<BrandSummary>> {
        self.allow(request.logged_user_id, Action::Read).await?;
        let query = request.to_query()?;
        self.brands.list(&query).await
    }

    /// Fetch one brand by id.
    pub async fn get(&self, request: BrandIdRequest) -> Envelope<Brand> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: BrandIdRequest) -> DomainResult<Brand> {
        self.allow(request.logged_user_id, Action::Read).await?;
        self.brands
            .find_by_id(request.brand_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("brand {} not found", request.brand_id)))
    }

    /// Validate and store a new brand.
    pub async fn create(&self, request: SaveBrandRequest) -> Envelope<Brand> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: SaveBrandRequest) -> DomainResult<Brand> {
        self.allow(request.logged_user_id, Action::Create).await?;
        let draft = BrandDraft::try_new(&request.name)?;
        self.brands.create(&draft).await
    }

    /// Replace the editable fields of an existing brand.
    pub async fn update(&self, request: UpdateBrandRequest) -> Envelope<Brand> {
        self.try_update(request).await.into()
    }

    async fn try_update(&self, request: UpdateBrandRequest) -> DomainResult<Brand> {
        self.allow(request.logged_user_id, Action::Update).await?;
        let draft = BrandDraft::try_new(&request.name)?;
        self.brands.update(request.brand_id, &draft).await
    }

    /// Remove one brand; referenced records cannot be deleted.
    pub async fn delete(&self, request: BrandIdRequest) -> Envelope<Deleted<BrandId>> {
        self.try_delete(request).await.into()
    }

    async fn try_delete(&self, request: BrandIdRequest) -> DomainResult<Deleted<BrandId>> {
        self.allow(request.logged_user_id, Action::Delete).await?;
        self.brands.delete(request.brand_id).await?;
        Ok(Deleted {
            id: request.brand_id,
        })
    }
}
