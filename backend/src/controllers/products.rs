//! Product commands.

use std::sync::Arc;

use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::ProductRepository;
use crate::domain::{
    Action, Authorizer, BrandId, CategoryId, Deleted, DomainResult, Envelope, Error, Product,
    ProductDraft, ProductId, ProductSummary, Resource, UserId,
};

use super::ListRequest;

/// `products:get` and `products:delete` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductIdRequest {
    pub logged_user_id: UserId,
    pub product_id: ProductId,
}

/// `products:create` parameters. `price` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveProductRequest {
    pub logged_user_id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
}

/// `products:update` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub logged_user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
}

/// Product operations behind the command channel.
#[derive(Clone)]
pub struct ProductsController {
    authorizer: Authorizer,
    products: Arc<dyn ProductRepository>,
}

impl ProductsController {
    /// Controller over `products`, gated by `authorizer`.
    pub fn new(authorizer: Authorizer, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            authorizer,
            products,
        }
    }

    async fn allow(&self, user: UserId, action: Action) -> DomainResult<()> {
        self.authorizer
            .authorize(user, Resource::Products, action)
            .await
            .map(drop)
    }

    /// Page through products, optionally filtered by name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<ProductSummary>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<ProductSummary>> {
        self.allow(request.logged_user_id, Action::Read).await?;
        let query = request.to_query()?;
        self.products.list(&query).await
    }

    /// Fetch one product by id.
    pub async fn get(&self, request: ProductIdRequest) -> Envelope<Product> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: ProductIdRequest) -> DomainResult<Product> {
        self.allow(request.logged_user_id, Action::Read).await?;
        self.products
            .find_by_id(request.product_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("product {} not found", request.product_id)))
    }

    /// Validate and store a new product.
    pub async fn create(&self, request: SaveProductRequest) -> Envelope<Product> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: SaveProductRequest) -> DomainResult<Product> {
        self.allow(request.logged_user_id, Action::Create).await?;
        let draft = ProductDraft::try_new(
            &request.name,
            request.barcode.as_deref(),
            request.price,
            request.brand_id,
            request.category_id,
        )?;
        self.products.create(&draft).await
    }

    /// Replace the editable fields of an existing product.
    pub async fn update(&self, request: UpdateProductRequest) -> Envelope<Product> {
        self.try_update(request).await.into()
    }

    async fn try_update(&self, request: UpdateProductRequest) -> DomainResult<Product> {
        self.allow(request.logged_user_id, Action::Update).await?;
        let draft = ProductDraft::try_new(
            &request.name,
            request.barcode.as_deref(),
            request.price,
            request.brand_id,
            request.category_id,
        )?;
        self.products.update(request.product_id, &draft).await
    }

    /// Remove one product; referenced records cannot be deleted.
    pub async fn delete(&self, request: ProductIdRequest) -> Envelope<Deleted<ProductId>> {
        self.try_delete(request).await.into()
    }

    async fn try_delete(&self, request: ProductIdRequest) -> DomainResult<Deleted<ProductId>> {
        self.allow(request.logged_user_id, Action::Delete).await?;
        self.products.delete(request.product_id).await?;
        Ok(Deleted {
            id: request.product_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_helpers::{ACTOR, assert_kind, authorizer_for};
    use crate::domain::ports::MockProductRepository;
    use crate::domain::{ErrorKind, Role};
    use rstest::rstest;

    fn save(price: i64) -> SaveProductRequest {
        SaveProductRequest {
            logged_user_id: ACTOR,
            name: "Widget".to_owned(),
            barcode: Some("4006381333931".to_owned()),
            price,
            brand_id: BrandId::new(1),
            category_id: CategoryId::new(2),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn negative_prices_are_rejected() {
        let mut products = MockProductRepository::new();
        products.expect_create().times(0);
        let controller =
            ProductsController::new(authorizer_for(Some(Role::Admin)), Arc::new(products));
        assert_kind(controller.create(save(-1)).await, ErrorKind::Validation);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_brand_surfaces_as_foreign_key_violation() {
        let mut products = MockProductRepository::new();
        products.expect_create().return_once(|_| {
            Err(Error::foreign_key_violation(
                "product references a missing record or is still in use",
            ))
        });
        let controller =
            ProductsController::new(authorizer_for(Some(Role::Admin)), Arc::new(products));
        assert_kind(
            controller.create(save(250)).await,
            ErrorKind::ForeignKeyViolation,
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_forwards_the_validated_draft() {
        let mut products = MockProductRepository::new();
        products
            .expect_update()
            .withf(|id, draft| {
                *id == ProductId::new(3) && draft.price() == 990 && draft.barcode().is_none()
            })
            .times(1)
            .return_once(|id, draft| {
                Ok(Product {
                    id,
                    name: draft.name().to_owned(),
                    barcode: None,
                    price: draft.price(),
                    brand_id: draft.brand_id(),
                    category_id: draft.category_id(),
                })
            });
        let controller =
            ProductsController::new(authorizer_for(Some(Role::SuperAdmin)), Arc::new(products));
        let product = controller
            .update(UpdateProductRequest {
                logged_user_id: ACTOR,
                product_id: ProductId::new(3),
                name: "Widget".to_owned(),
                barcode: Some("   ".to_owned()),
                price: 990,
                brand_id: BrandId::new(1),
                category_id: CategoryId::new(2),
            })
            .await
            .into_result()
            .expect("updated");
        assert_eq!(product.price, 990);
    }

    #[rstest]
    #[tokio::test]
    async fn operators_may_only_read_products() {
        let mut products = MockProductRepository::new();
        products.expect_update().times(0);
        let controller =
            ProductsController::new(authorizer_for(Some(Role::Operator)), Arc::new(products));
        let envelope = controller
            .update(UpdateProductRequest {
                logged_user_id: ACTOR,
                product_id: ProductId::new(3),
                name: "Renamed".to_owned(),
                barcode: None,
                price: 100,
                brand_id: BrandId::new(1),
                category_id: CategoryId::new(2),
            })
            .await;
        assert_kind(envelope, ErrorKind::Unauthorized);
    }
}
