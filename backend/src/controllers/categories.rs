//! Category commands.

use std::sync::Arc;

use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::CategoryRepository;
use crate::domain::{
    Action, Authorizer, Category, CategoryDraft, CategoryId, CategorySummary, Deleted,
    DomainResult, Envelope, Error, Resource, UserId,
};

use super::ListRequest;

/// `categories:get` and `categories:delete` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryIdRequest {
    pub logged_user_id: UserId,
    pub category_id: CategoryId,
}

/// `categories:create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveCategoryRequest {
    pub logged_user_id: UserId,
    pub name: String,
}

/// `categories:update` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    pub logged_user_id: UserId,
    pub category_id: CategoryId,
    pub name: String,
}

/// Category operations behind the command channel.
#[derive(Clone)]
pub struct CategoriesController {
    authorizer: Authorizer,
    categories: Arc<dyn CategoryRepository>,
}

impl CategoriesController {
    /// Controller over `categories`, gated by `authorizer`.
    pub fn new(authorizer: Authorizer, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { authorizer, categories }
    }

    async fn allow(&self, user: UserId, action: Action) -> DomainResult<()> {
        self.authorizer
            .authorize(user, Resource::Categories, action)
            .await
            .map(drop)
    }

    /// Page through categories, optionally filtered by name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<CategorySummary>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<CategorySummary>> {
        self.allow(request.logged_user_id, Action::Read).await?;
        let query = request.to_query()?;
        self.categories.list(&query).await
    }

    /// Fetch one category by id.
    pub async fn get(&self, request: CategoryIdRequest) -> Envelope<Category> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: CategoryIdRequest) -> DomainResult<Category> {
        self.allow(request.logged_user_id, Action::Read).await?;
        self.categories
            .find_by_id(request.category_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("category {} not found", request.category_id)))
    }

    /// Validate and store a new category.
    pub async fn create(&self, request: SaveCategoryRequest) -> Envelope<Category> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: SaveCategoryRequest) -> DomainResult<Category> {
        self.allow(request.logged_user_id, Action::Create).await?;
        let draft = CategoryDraft::try_new(&request.name)?;
        self.categories.create(&draft).await
    }

    /// Replace the editable fields of an existing category.
    pub async fn update(&self, request: UpdateCategoryRequest) -> Envelope<Category> {
        self.try_update(request).await.into()
    }

    async fn try_update(&self, request: UpdateCategoryRequest) -> DomainResult<Category> {
        self.allow(request.logged_user_id, Action::Update).await?;
        let draft = CategoryDraft::try_new(&request.name)?;
        self.categories.update(request.category_id, &draft).await
    }

    /// Remove one category; referenced records cannot be deleted.
    pub async fn delete(&self, request: CategoryIdRequest) -> Envelope<Deleted<CategoryId>> {
        self.try_delete(request).await.into()
    }

    async fn try_delete(&self, request: CategoryIdRequest) -> DomainResult<Deleted<CategoryId>> {
        self.allow(request.logged_user_id, Action::Delete).await?;
        self.categories.delete(request.category_id).await?;
        Ok(Deleted {
            id: request.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_helpers::{ACTOR, assert_kind, authorizer_for};
    use crate::domain::ports::MockCategoryRepository;
    use crate::domain::{ErrorKind, Role};
    use rstest::rstest;

    fn controller(role: Option<Role>, categories: MockCategoryRepository) -> CategoriesController {
        CategoriesController::new(authorizer_for(role), Arc::new(categories))
    }

    fn untouched() -> MockCategoryRepository {
        let mut categories = MockCategoryRepository::new();
        categories.expect_list().times(0);
        categories.expect_create().times(0);
        categories.expect_update().times(0);
        categories.expect_delete().times(0);
        categories
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_actor_is_rejected_before_any_query() {
        let envelope = controller(None, untouched())
            .list(ListRequest::first_page(ACTOR))
            .await;
        assert_kind(envelope, ErrorKind::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn operators_cannot_create_categories() {
        let envelope = controller(Some(Role::Operator), untouched())
            .create(SaveCategoryRequest {
                logged_user_id: ACTOR,
                name: "Drinks".to_owned(),
            })
            .await;
        assert_kind(envelope, ErrorKind::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_names_are_rejected_before_any_query() {
        let envelope = controller(Some(Role::Admin), untouched())
            .create(SaveCategoryRequest {
                logged_user_id: ACTOR,
                name: "  ".to_owned(),
            })
            .await;
        assert_kind(envelope, ErrorKind::Validation);
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(None, Some(500))]
    #[tokio::test]
    async fn invalid_pages_are_rejected(
        #[case] page: Option<i64>,
        #[case] items_per_page: Option<i64>,
    ) {
        let envelope = controller(Some(Role::Operator), untouched())
            .list(ListRequest {
                logged_user_id: ACTOR,
                name: None,
                page,
                items_per_page,
            })
            .await;
        assert_kind(envelope, ErrorKind::Validation);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_category_is_not_found() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().return_once(|_| Ok(None));
        let envelope = controller(Some(Role::Operator), categories)
            .get(CategoryIdRequest {
                logged_user_id: ACTOR,
                category_id: CategoryId::new(9),
            })
            .await;
        assert_kind(envelope, ErrorKind::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_errors_pass_through() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_delete()
            .return_once(|_| Err(Error::foreign_key_violation("category is still in use")));
        let envelope = controller(Some(Role::Admin), categories)
            .delete(CategoryIdRequest {
                logged_user_id: ACTOR,
                category_id: CategoryId::new(2),
            })
            .await;
        assert_kind(envelope, ErrorKind::ForeignKeyViolation);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_echoes_the_id() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_delete().times(1).return_once(|_| Ok(()));
        let envelope = controller(Some(Role::SuperAdmin), categories)
            .delete(CategoryIdRequest {
                logged_user_id: ACTOR,
                category_id: CategoryId::new(2),
            })
            .await;
        assert_eq!(
            envelope.into_result().expect("deleted"),
            Deleted {
                id: CategoryId::new(2)
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn create_passes_the_trimmed_name() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_create()
            .withf(|draft| draft.name() == "Drinks")
            .return_once(|draft| {
                Ok(Category {
                    id: CategoryId::new(1),
                    name: draft.name().to_owned(),
                })
            });
        let category = controller(Some(Role::Admin), categories)
            .create(SaveCategoryRequest {
                logged_user_id: ACTOR,
                name: " Drinks ".to_owned(),
            })
            .await
            .into_result()
            .expect("created");
        assert_eq!(category.name, "Drinks");
    }
}
