//! Order commands.
//!
//! Orders are recorded by the acting user at the current UTC time; the
//! total is derived from the lines and never taken from the caller.

use std::sync::Arc;

use mockable::Clock;
use pagination::Page;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::OrderRepository;
use crate::domain::{
    Action, Authorizer, CustomerId, DomainResult, Envelope, Error, NewOrder, Order, OrderDetail,
    OrderId, OrderLineDraft, ProductId, Resource, UserId,
};

use super::ListRequest;

/// `orders:get` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderIdRequest {
    pub logged_user_id: UserId,
    pub order_id: OrderId,
}

/// One requested order line. `price` is the unit price in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: i64,
}

/// `orders:create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub logged_user_id: UserId,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLineRequest>,
}

/// Order operations behind the command channel.
#[derive(Clone)]
pub struct OrdersController {
    authorizer: Authorizer,
    orders: Arc<dyn OrderRepository>,
    clock: Arc<dyn Clock>,
}

impl OrdersController {
    /// Controller over `orders`; `clock` stamps new orders.
    pub fn new(
        authorizer: Authorizer,
        orders: Arc<dyn OrderRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            authorizer,
            orders,
            clock,
        }
    }

    /// Page through orders, filtered by customer name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<Order>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<Order>> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Orders, Action::Read)
            .await?;
        let query = request.to_query()?;
        self.orders.list(&query).await
    }

    /// Fetch one order with its lines.
    pub async fn get(&self, request: OrderIdRequest) -> Envelope<OrderDetail> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: OrderIdRequest) -> DomainResult<OrderDetail> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Orders, Action::Read)
            .await?;
        self.orders
            .find_by_id(request.order_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("order {} not found", request.order_id)))
    }

    /// Record an order with all its lines in one store transaction.
    pub async fn create(&self, request: CreateOrderRequest) -> Envelope<OrderDetail> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: CreateOrderRequest) -> DomainResult<OrderDetail> {
        let actor = self
            .authorizer
            .authorize(request.logged_user_id, Resource::Orders, Action::Create)
            .await?;
        let lines = request
            .lines
            .iter()
            .map(|line| OrderLineDraft::try_new(line.product_id, line.quantity, line.price))
            .collect::<DomainResult<Vec<_>>>()?;
        let order = NewOrder::try_new(
            request.customer_id,
            actor.id,
            self.clock.utc().naive_utc(),
            lines,
        )?;
        let detail = self.orders.create(&order).await?;
        info!(
            order_id = %detail.order.id,
            customer_id = %detail.order.customer_id,
            total_price = detail.order.total_price,
            "order recorded"
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_helpers::{ACTOR, assert_kind, authorizer_for, expect_err};
    use crate::domain::ports::MockOrderRepository;
    use crate::domain::{ErrorKind, OrderLine, Role};
    use crate::test_support::MutableClock;
    use chrono::{NaiveDateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<dyn Clock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn line(product: i64, quantity: i64, price: i64) -> OrderLineRequest {
        OrderLineRequest {
            product_id: ProductId::new(product),
            quantity,
            price,
        }
    }

    fn create(lines: Vec<OrderLineRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            logged_user_id: ACTOR,
            customer_id: CustomerId::new(4),
            lines,
        }
    }

    fn echo(order: &NewOrder) -> DomainResult<OrderDetail> {
        Ok(OrderDetail {
            order: Order {
                id: OrderId::new(11),
                customer_id: order.customer_id(),
                customer_name: "Ada".to_owned(),
                user_id: order.user_id(),
                user_name: "actor".to_owned(),
                total_price: order.total_price(),
                created_at: order.created_at(),
            },
            lines: order
                .lines()
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id(),
                    product_name: format!("product-{}", line.product_id()),
                    quantity: line.quantity(),
                    price: line.price(),
                })
                .collect(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn operators_record_orders_with_computed_totals(clock: Arc<dyn Clock>) {
        let mut orders = MockOrderRepository::new();
        orders.expect_create().times(1).returning(echo);
        let controller =
            OrdersController::new(authorizer_for(Some(Role::Operator)), Arc::new(orders), clock);

        let detail = controller
            .create(create(vec![line(1, 2, 150), line(2, 1, 1_000)]))
            .await
            .into_result()
            .expect("order recorded");

        assert_eq!(detail.order.total_price, 1_300);
        assert_eq!(detail.order.user_id, ACTOR);
        assert_eq!(
            detail.order.created_at,
            NaiveDateTime::parse_from_str("2026-03-14 09:26:53", "%Y-%m-%d %H:%M:%S")
                .expect("timestamp")
        );
        assert_eq!(detail.lines.len(), 2);
    }

    #[rstest]
    #[case::no_lines(vec![])]
    #[case::zero_quantity(vec![line(1, 0, 100)])]
    #[case::negative_price(vec![line(1, 1, -5)])]
    #[case::overflowing_total(vec![line(1, i64::MAX, 2)])]
    #[tokio::test]
    async fn invalid_orders_never_reach_the_store(
        clock: Arc<dyn Clock>,
        #[case] lines: Vec<OrderLineRequest>,
    ) {
        let mut orders = MockOrderRepository::new();
        orders.expect_create().times(0);
        let controller =
            OrdersController::new(authorizer_for(Some(Role::Admin)), Arc::new(orders), clock);
        assert_kind(controller.create(create(lines)).await, ErrorKind::Validation);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_pass_through(clock: Arc<dyn Clock>) {
        let mut orders = MockOrderRepository::new();
        orders.expect_create().return_once(|_| {
            Err(Error::foreign_key_violation(
                "order references a missing record or is still in use",
            ))
        });
        let controller =
            OrdersController::new(authorizer_for(Some(Role::Admin)), Arc::new(orders), clock);
        let err = expect_err(controller.create(create(vec![line(99, 1, 10)])).await);
        assert_eq!(err.kind(), ErrorKind::ForeignKeyViolation);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_order_is_not_found(clock: Arc<dyn Clock>) {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().return_once(|_| Ok(None));
        let controller =
            OrdersController::new(authorizer_for(Some(Role::Operator)), Arc::new(orders), clock);
        let envelope = controller
            .get(OrderIdRequest {
                logged_user_id: ACTOR,
                order_id: OrderId::new(3),
            })
            .await;
        assert_kind(envelope, ErrorKind::NotFound);
    }
}
