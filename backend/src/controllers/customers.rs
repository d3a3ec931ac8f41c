//! Customer commands.

use std::sync::Arc;

use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::CustomerRepository;
use crate::domain::{
    Action, Authorizer, Customer, CustomerDraft, CustomerId, CustomerSummary, Deleted,
    DomainResult, Envelope, Error, Resource, UserId,
};

use super::ListRequest;

/// `customers:get` and `customers:delete` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerIdRequest {
    pub logged_user_id: UserId,
    pub customer_id: CustomerId,
}

/// `customers:create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveCustomerRequest {
    pub logged_user_id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `customers:update` parameters. Absent contact details are cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCustomerRequest {
    pub logged_user_id: UserId,
    pub customer_id: CustomerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Customer operations behind the command channel.
#[derive(Clone)]
pub struct CustomersController {
    authorizer: Authorizer,
    customers: Arc<dyn CustomerRepository>,
}

impl CustomersController {
    /// Controller over `customers`, gated by `authorizer`.
    pub fn new(authorizer: Authorizer, customers: Arc<dyn CustomerRepository>) -> Self {
        Self {
            authorizer,
            customers,
        }
    }

    /// Page through customers, optionally filtered by name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<CustomerSummary>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<CustomerSummary>> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Customers, Action::Read)
            .await?;
        let query = request.to_query()?;
        self.customers.list(&query).await
    }

    /// Fetch one customer by id.
    pub async fn get(&self, request: CustomerIdRequest) -> Envelope<Customer> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: CustomerIdRequest) -> DomainResult<Customer> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Customers, Action::Read)
            .await?;
        self.customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!("customer {} not found", request.customer_id))
            })
    }

    /// Validate and store a new customer.
    pub async fn create(&self, request: SaveCustomerRequest) -> Envelope<Customer> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: SaveCustomerRequest) -> DomainResult<Customer> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Customers, Action::Create)
            .await?;
        let draft = CustomerDraft::try_new(
            &request.name,
            request.phone.as_deref(),
            request.email.as_deref(),
        )?;
        self.customers.create(&draft).await
    }

    /// Replace the editable fields of an existing customer.
    pub async fn update(&self, request: UpdateCustomerRequest) -> Envelope<Customer> {
        self.try_update(request).await.into()
    }

    async fn try_update(&self, request: UpdateCustomerRequest) -> DomainResult<Customer> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Customers, Action::Update)
            .await?;
        let draft = CustomerDraft::try_new(
            &request.name,
            request.phone.as_deref(),
            request.email.as_deref(),
        )?;
        self.customers.update(request.customer_id, &draft).await
    }

    /// Remove one customer; referenced records cannot be deleted.
    pub async fn delete(&self, request: CustomerIdRequest) -> Envelope<Deleted<CustomerId>> {
        self.try_delete(request).await.into()
    }

    async fn try_delete(&self, request: CustomerIdRequest) -> DomainResult<Deleted<CustomerId>> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Customers, Action::Delete)
            .await?;
        self.customers.delete(request.customer_id).await?;
        Ok(Deleted {
            id: request.customer_id,
        })
    }
}
