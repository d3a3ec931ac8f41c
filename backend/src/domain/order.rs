//! Orders: a header row plus one row per purchased product.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CustomerId, Error, OrderId, ProductId, UserId};

/// Order header as listed, with customer and cashier names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub total_price: i64,
    pub created_at: NaiveDateTime,
}

/// One purchased product within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub price: i64,
}

/// Order header together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Validated line of a new order. `price` is the unit price charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineDraft {
    product_id: ProductId,
    quantity: i64,
    price: i64,
}

impl OrderLineDraft {
    pub fn try_new(product_id: ProductId, quantity: i64, price: i64) -> Result<Self, Error> {
        if quantity <= 0 {
            return Err(Error::validation("quantity must be at least 1"));
        }
        if price < 0 {
            return Err(Error::validation("price must not be negative"));
        }
        Ok(Self {
            product_id,
            quantity,
            price,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    /// `price * quantity`, or `None` on overflow.
    pub fn subtotal(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

/// Sum of every line's subtotal.
///
/// # Examples
/// ```
/// use backoffice::domain::{order_total, OrderLineDraft, ProductId};
///
/// let lines = [
///     OrderLineDraft::try_new(ProductId::new(1), 2, 150).unwrap(),
///     OrderLineDraft::try_new(ProductId::new(2), 1, 99).unwrap(),
/// ];
/// assert_eq!(order_total(&lines).unwrap(), 399);
/// ```
pub fn order_total(lines: &[OrderLineDraft]) -> Result<i64, Error> {
    lines
        .iter()
        .try_fold(0_i64, |total, line| {
            line.subtotal().and_then(|subtotal| total.checked_add(subtotal))
        })
        .ok_or_else(|| Error::validation("order total is too large"))
}

/// Everything needed to persist an order atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer_id: CustomerId,
    user_id: UserId,
    created_at: NaiveDateTime,
    total_price: i64,
    lines: Vec<OrderLineDraft>,
}

impl NewOrder {
    /// Assemble a new order, computing its total from the lines.
    pub fn try_new(
        customer_id: CustomerId,
        user_id: UserId,
        created_at: NaiveDateTime,
        lines: Vec<OrderLineDraft>,
    ) -> Result<Self, Error> {
        if lines.is_empty() {
            return Err(Error::validation("an order needs at least one line"));
        }
        let total_price = order_total(&lines)?;
        Ok(Self {
            customer_id,
            user_id,
            created_at,
            total_price,
            lines,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn total_price(&self) -> i64 {
        self.total_price
    }

    pub fn lines(&self) -> &[OrderLineDraft] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn placed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn line(product: i64, quantity: i64, price: i64) -> OrderLineDraft {
        OrderLineDraft::try_new(ProductId::new(product), quantity, price).expect("valid line")
    }

    #[rstest]
    #[case(0, 10)]
    #[case(-2, 10)]
    #[case(1, -1)]
    fn invalid_lines_are_rejected(#[case] quantity: i64, #[case] price: i64) {
        let err = OrderLineDraft::try_new(ProductId::new(1), quantity, price)
            .expect_err("invalid line");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[rstest]
    fn total_sums_price_times_quantity(placed_at: NaiveDateTime) {
        let order = NewOrder::try_new(
            CustomerId::new(1),
            UserId::new(1),
            placed_at,
            vec![line(1, 3, 250), line(2, 1, 1_000), line(3, 2, 0)],
        )
        .expect("valid order");
        assert_eq!(order.total_price(), 1_750);
        assert_eq!(order.lines().len(), 3);
    }

    #[rstest]
    fn empty_orders_are_rejected(placed_at: NaiveDateTime) {
        let err = NewOrder::try_new(CustomerId::new(1), UserId::new(1), placed_at, Vec::new())
            .expect_err("empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[rstest]
    #[case(vec![line(1, 2, i64::MAX)])]
    #[case(vec![line(1, 1, i64::MAX), line(2, 1, 1)])]
    fn overflowing_totals_are_validation_errors(#[case] lines: Vec<OrderLineDraft>) {
        let err = order_total(&lines).expect_err("overflow");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[rstest]
    fn detail_flattens_the_header(placed_at: NaiveDateTime) {
        let detail = OrderDetail {
            order: Order {
                id: OrderId::new(9),
                customer_id: CustomerId::new(2),
                customer_name: "Ada".to_owned(),
                user_id: UserId::new(1),
                user_name: "till".to_owned(),
                total_price: 500,
                created_at: placed_at,
            },
            lines: vec![OrderLine {
                product_id: ProductId::new(4),
                product_name: "Soap".to_owned(),
                quantity: 2,
                price: 250,
            }],
        };
        insta::assert_json_snapshot!(detail, @r#"
        {
          "id": 9,
          "customerId": 2,
          "customerName": "Ada",
          "userId": 1,
          "userName": "till",
          "totalPrice": 500,
          "createdAt": "2026-03-01T12:00:00",
          "lines": [
            {
              "productId": 4,
              "productName": "Soap",
              "quantity": 2,
              "price": 250
            }
          ]
        }
        "#);
    }
}
