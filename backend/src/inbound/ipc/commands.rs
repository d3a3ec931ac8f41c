//! The fixed command vocabulary and its binding onto controllers.

use super::channel::{CommandChannel, RegistrationError};
use crate::context::Controllers;

pub const BRANDS_LIST: &str = "brands:list";
pub const BRANDS_GET: &str = "brands:get";
pub const BRANDS_CREATE: &str = "brands:create";
pub const BRANDS_UPDATE: &str = "brands:update";
pub const BRANDS_DELETE: &str = "brands:delete";

pub const CATEGORIES_LIST: &str = "categories:list";
pub const CATEGORIES_GET: &str = "categories:get";
pub const CATEGORIES_CREATE: &str = "categories:create";
pub const CATEGORIES_UPDATE: &str = "categories:update";
pub const CATEGORIES_DELETE: &str = "categories:delete";

pub const CUSTOMERS_LIST: &str = "customers:list";
pub const CUSTOMERS_GET: &str = "customers:get";
pub const CUSTOMERS_CREATE: &str = "customers:create";
pub const CUSTOMERS_UPDATE: &str = "customers:update";
pub const CUSTOMERS_DELETE: &str = "customers:delete";

pub const PRODUCTS_LIST: &str = "products:list";
pub const PRODUCTS_GET: &str = "products:get";
pub const PRODUCTS_CREATE: &str = "products:create";
pub const PRODUCTS_UPDATE: &str = "products:update";
pub const PRODUCTS_DELETE: &str = "products:delete";

pub const USERS_LIST: &str = "users:list";
pub const USERS_GET: &str = "users:get";
pub const USERS_CREATE: &str = "users:create";
pub const USERS_UPDATE: &str = "users:update";
pub const USERS_DELETE: &str = "users:delete";

pub const ORDERS_LIST: &str = "orders:list";
pub const ORDERS_GET: &str = "orders:get";
pub const ORDERS_CREATE: &str = "orders:create";

pub const REPORTS_ORDERS: &str = "reports:getOrdersReport";

pub const LOGIN: &str = "login";

/// Bind `$name` to `$controller.$method`, cloning the controller into the
/// handler.
macro_rules! bind {
    ($channel:expr, $name:expr, $controller:expr, $method:ident) => {{
        let controller = $controller.clone();
        $channel.register($name, move |request| {
            let controller = controller.clone();
            async move { controller.$method(request).await }
        })
    }};
}

/// Register every command onto `channel`.
///
/// # Errors
/// Returns [`RegistrationError::Duplicate`] if any name is already bound.
pub fn register_commands(
    channel: &mut CommandChannel,
    controllers: &Controllers,
) -> Result<(), RegistrationError> {
    bind!(channel, BRANDS_LIST, controllers.brands, list)?;
    bind!(channel, BRANDS_GET, controllers.brands, get)?;
    bind!(channel, BRANDS_CREATE, controllers.brands, create)?;
    bind!(channel, BRANDS_UPDATE, controllers.brands, update)?;
    bind!(channel, BRANDS_DELETE, controllers.brands, delete)?;

    bind!(channel, CATEGORIES_LIST, controllers.categories, list)?;
    bind!(channel, CATEGORIES_GET, controllers.categories, get)?;
    bind!(channel, CATEGORIES_CREATE, controllers.categories, create)?;
    bind!(channel, CATEGORIES_UPDATE, controllers.categories, update)?;
    bind!(channel, CATEGORIES_DELETE, controllers.categories, delete)?;

    bind!(channel, CUSTOMERS_LIST, controllers.customers, list)?;
    bind!(channel, CUSTOMERS_GET, controllers.customers, get)?;
    bind!(channel, CUSTOMERS_CREATE, controllers.customers, create)?;
    bind!(channel, CUSTOMERS_UPDATE, controllers.customers, update)?;
    bind!(channel, CUSTOMERS_DELETE, controllers.customers, delete)?;

    bind!(channel, PRODUCTS_LIST, controllers.products, list)?;
    bind!(channel, PRODUCTS_GET, controllers.products, get)?;
    bind!(channel, PRODUCTS_CREATE, controllers.products, create)?;
    bind!(channel, PRODUCTS_UPDATE, controllers.products, update)?;
    bind!(channel, PRODUCTS_DELETE, controllers.products, delete)?;

    bind!(channel, USERS_LIST, controllers.users, list)?;
    bind!(channel, USERS_GET, controllers.users, get)?;
    bind!(channel, USERS_CREATE, controllers.users, create)?;
    bind!(channel, USERS_UPDATE, controllers.users, update)?;
    bind!(channel, USERS_DELETE, controllers.users, delete)?;

    bind!(channel, ORDERS_LIST, controllers.orders, list)?;
    bind!(channel, ORDERS_GET, controllers.orders, get)?;
    bind!(channel, ORDERS_CREATE, controllers.orders, create)?;

    bind!(channel, REPORTS_ORDERS, controllers.reports, orders_report)?;

    bind!(channel, LOGIN, controllers.login, login)?;
    Ok(())
}
