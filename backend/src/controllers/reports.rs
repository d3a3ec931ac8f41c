//! Sales reporting commands.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::OrderRepository;
use crate::domain::{
    Action, Authorizer, DomainResult, Envelope, OrdersReport, ReportRange, Resource, UserId,
};

/// `reports:getOrdersReport` parameters. Dates are inclusive `YYYY-MM-DD`
/// UTC calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrdersReportRequest {
    pub logged_user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Sales reporting behind the command channel.
#[derive(Clone)]
pub struct ReportsController {
    authorizer: Authorizer,
    orders: Arc<dyn OrderRepository>,
    clock: Arc<dyn Clock>,
}

impl ReportsController {
    /// Controller over order totals; `clock` supplies the default range.
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

    /// Order count and revenue per day over the requested range.
    pub async fn orders_report(&self, request: OrdersReportRequest) -> Envelope<OrdersReport> {
        self.try_orders_report(request).await.into()
    }

    async fn try_orders_report(&self, request: OrdersReportRequest) -> DomainResult<OrdersReport> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Reports, Action::Read)
            .await?;
        let today = self.clock.utc().date_naive();
        let range = ReportRange::resolve(request.from, request.to, today)?;
        let totals = self
            .orders
            .totals_between(range.start(), range.end_exclusive())
            .await?;
        Ok(OrdersReport::aggregate(range, &totals))
    }
}
