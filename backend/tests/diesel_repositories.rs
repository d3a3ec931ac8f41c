//! Integration tests for the Diesel repositories against a temporary SQLite
//! database.
//!
//! Each test migrates its own database file, so tests are independent and
//! may run in parallel.

use backoffice::domain::ports::{
    BrandRepository, CategoryRepository, CustomerRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use backoffice::domain::{
    Brand, BrandDraft, Category, CategoryDraft, CustomerDraft, ErrorKind, ListQuery, NewOrder,
    OrderLineDraft, Product, ProductDraft, ProductId, Role, UserChanges,
};
use backoffice::outbound::persistence::{
    DieselBrandRepository, DieselCategoryRepository, DieselCustomerRepository,
    DieselOrderRepository, DieselProductRepository, DieselUserRepository,
};
use backoffice::test_support::TestDatabase;
use chrono::NaiveDate;
use rstest::{fixture, rstest};

#[fixture]
async fn database() -> TestDatabase {
    TestDatabase::new().await
}

fn query(name: Option<&str>, page: i64, items_per_page: i64) -> ListQuery {
    ListQuery::try_new(name, Some(page), Some(items_per_page)).expect("valid list query")
}

async fn brand(database: &TestDatabase, name: &str) -> Brand {
    DieselBrandRepository::new(database.pool())
        .create(&BrandDraft::try_new(name).expect("valid brand"))
        .await
        .expect("brand stored")
}

async fn category(database: &TestDatabase, name: &str) -> Category {
    DieselCategoryRepository::new(database.pool())
        .create(&CategoryDraft::try_new(name).expect("valid category"))
        .await
        .expect("category stored")
}

async fn product(database: &TestDatabase, name: &str, brand: &Brand, category: &Category) -> Product {
    let draft = ProductDraft::try_new(name, None, 150, brand.id, category.id).expect("valid product");
    DieselProductRepository::new(database.pool())
        .create(&draft)
        .await
        .expect("product stored")
}

#[rstest]
#[tokio::test]
async fn pages_share_one_total(#[future] database: TestDatabase) {
    let database = database.await;
    for name in ["Acme", "Bolt", "Crown", "Delta", "Ember"] {
        brand(&database, name).await;
    }
    let brands = DieselBrandRepository::new(database.pool());

    let first = brands.list(&query(None, 1, 2)).await.expect("first page");
    let last = brands.list(&query(None, 3, 2)).await.expect("last page");

    assert_eq!(first.total(), 5);
    assert_eq!(last.total(), 5);
    assert_eq!(first.items().len(), 2);
    assert_eq!(last.items().len(), 1);
    let names: Vec<_> = first.items().iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["Acme", "Bolt"]);
}

#[rstest]
#[tokio::test]
async fn name_filters_match_substrings_literally(#[future] database: TestDatabase) {
    let database = database.await;
    for name in ["Tea 100%", "Tea 10", "Coffee"] {
        brand(&database, name).await;
    }
    let brands = DieselBrandRepository::new(database.pool());

    let percent = brands
        .list(&query(Some("0%"), 1, 10))
        .await
        .expect("filtered");
    let tea = brands
        .list(&query(Some("tea"), 1, 10))
        .await
        .expect("filtered");

    assert_eq!(percent.total(), 1);
    assert_eq!(tea.total(), 2);
}

#[rstest]
#[tokio::test]
async fn created_records_read_back(#[future] database: TestDatabase) {
    let database = database.await;
    let customers = DieselCustomerRepository::new(database.pool());
    let draft = CustomerDraft::try_new("Grace", Some("555-0100"), Some("grace@example.com"))
        .expect("valid customer");

    let created = customers.create(&draft).await.expect("stored");
    let fetched = customers
        .find_by_id(created.id)
        .await
        .expect("query")
        .expect("present");

    assert_eq!(fetched, created);
    assert_eq!(fetched.email.as_deref(), Some("grace@example.com"));
}

#[rstest]
#[tokio::test]
async fn second_delete_is_not_found(#[future] database: TestDatabase) {
    let database = database.await;
    let stored = category(&database, "Drinks").await;
    let categories = DieselCategoryRepository::new(database.pool());

    categories.delete(stored.id).await.expect("first delete");
    let err = categories.delete(stored.id).await.expect_err("already gone");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test]
async fn duplicate_brand_names_are_unique_violations(#[future] database: TestDatabase) {
    let database = database.await;
    brand(&database, "Acme").await;

    let err = DieselBrandRepository::new(database.pool())
        .create(&BrandDraft::try_new("Acme").expect("valid brand"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.kind(), ErrorKind::UniqueViolation);
}

#[rstest]
#[tokio::test]
async fn referenced_brands_cannot_be_deleted(#[future] database: TestDatabase) {
    let database = database.await;
    let acme = brand(&database, "Acme").await;
    let drinks = category(&database, "Drinks").await;
    product(&database, "Cola", &acme, &drinks).await;
    let brands = DieselBrandRepository::new(database.pool());

    let err = brands.delete(acme.id).await.expect_err("still referenced");

    assert_eq!(err.kind(), ErrorKind::ForeignKeyViolation);
    assert!(brands.find_by_id(acme.id).await.expect("query").is_some());
    let summaries = brands.list(&query(None, 1, 10)).await.expect("list");
    assert_eq!(summaries.items().first().map(|row| row.product_count), Some(1));
}

#[rstest]
#[tokio::test]
async fn failing_order_lines_roll_back_the_order(#[future] database: TestDatabase) {
    let database = database.await;
    let clerk = database.seed_user("clerk", Role::Operator, "clerk-password").await;
    let acme = brand(&database, "Acme").await;
    let drinks = category(&database, "Drinks").await;
    let cola = product(&database, "Cola", &acme, &drinks).await;
    let customer = DieselCustomerRepository::new(database.pool())
        .create(&CustomerDraft::try_new("Grace", None, None).expect("valid customer"))
        .await
        .expect("customer stored");
    let orders = DieselOrderRepository::new(database.pool());
    let created_at = NaiveDate::from_ymd_opt(2026, 5, 1)
        .and_then(|day| day.and_hms_opt(9, 30, 0))
        .expect("valid timestamp");
    let lines = vec![
        OrderLineDraft::try_new(cola.id, 1, 150).expect("line"),
        OrderLineDraft::try_new(ProductId::new(9_999), 1, 10).expect("line"),
        OrderLineDraft::try_new(cola.id, 2, 150).expect("line"),
    ];
    let order = NewOrder::try_new(customer.id, clerk.id, created_at, lines).expect("valid order");

    let err = orders.create(&order).await.expect_err("missing product");

    assert_eq!(err.kind(), ErrorKind::ForeignKeyViolation);
    let listed = orders.list(&query(None, 1, 10)).await.expect("list");
    assert_eq!(listed.total(), 0);
    assert_eq!(database.row_count("orders").await, 0);
    assert_eq!(database.row_count("order_lines").await, 0);
}

#[rstest]
#[tokio::test]
async fn orders_keep_their_lines_and_totals(#[future] database: TestDatabase) {
    let database = database.await;
    let clerk = database.seed_user("clerk", Role::Operator, "clerk-password").await;
    let acme = brand(&database, "Acme").await;
    let drinks = category(&database, "Drinks").await;
    let cola = product(&database, "Cola", &acme, &drinks).await;
    let lemonade = product(&database, "Lemonade", &acme, &drinks).await;
    let customer = DieselCustomerRepository::new(database.pool())
        .create(&CustomerDraft::try_new("Grace", None, None).expect("valid customer"))
        .await
        .expect("customer stored");
    let orders = DieselOrderRepository::new(database.pool());
    let created_at = NaiveDate::from_ymd_opt(2026, 5, 1)
        .and_then(|day| day.and_hms_opt(9, 30, 0))
        .expect("valid timestamp");
    let lines = vec![
        OrderLineDraft::try_new(cola.id, 2, 150).expect("line"),
        OrderLineDraft::try_new(lemonade.id, 1, 200).expect("line"),
    ];
    let order = NewOrder::try_new(customer.id, clerk.id, created_at, lines).expect("valid order");

    let detail = orders.create(&order).await.expect("stored");
    assert_eq!(database.row_count("order_lines").await, 2);

    assert_eq!(detail.order.total_price, 500);
    assert_eq!(detail.order.customer_name, "Grace");
    assert_eq!(detail.order.user_name, "clerk");
    let names: Vec<_> = detail.lines.iter().map(|line| line.product_name.as_str()).collect();
    assert_eq!(names, ["Cola", "Lemonade"]);

    let day = NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date");
    let totals = orders
        .totals_between(
            day.and_hms_opt(0, 0, 0).expect("midnight"),
            day.succ_opt()
                .and_then(|next| next.and_hms_opt(0, 0, 0))
                .expect("next midnight"),
        )
        .await
        .expect("totals");
    assert_eq!(totals, vec![(created_at, 500)]);
}

#[rstest]
#[tokio::test]
async fn user_updates_keep_the_password_when_none_is_given(#[future] database: TestDatabase) {
    let database = database.await;
    let ada = database.seed_user("ada", Role::Admin, "analytical").await;
    let users = DieselUserRepository::new(database.pool());
    let changes = UserChanges::try_new("ada lovelace", Role::Operator, None).expect("valid");

    let updated = users.update(ada.id, &changes).await.expect("updated");
    let credentials = users
        .find_credentials("ada lovelace")
        .await
        .expect("query")
        .expect("present");

    assert_eq!(updated.role, Role::Operator);
    let hash = backoffice::domain::PasswordHash::parse(&credentials.password_hash)
        .expect("stored hash parses");
    assert!(hash.verify("analytical"));
}
