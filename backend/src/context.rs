//! Application wiring: repositories, controllers and the command channel.
//!
//! Nothing here is global. `main`, the `create-user` tool and the tests each
//! build their own [`AppContext`] from a pool and a clock.

use std::sync::Arc;

use mockable::Clock;

use crate::controllers::{
    BrandsController, CategoriesController, CustomersController, LoginController,
    OrdersController, ProductsController, ReportsController, UsersController,
};
use crate::domain::Authorizer;
use crate::domain::ports::{
    BrandRepository, CategoryRepository, CustomerRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::inbound::ipc::{CommandChannel, RegistrationError, register_commands};
use crate::outbound::persistence::{
    DbPool, DieselBrandRepository, DieselCategoryRepository, DieselCustomerRepository,
    DieselOrderRepository, DieselProductRepository, DieselUserRepository,
};

/// One implementation per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub brands: Arc<dyn BrandRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    /// Diesel-backed repositories sharing `pool`.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            brands: Arc::new(DieselBrandRepository::new(pool.clone())),
            categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
            customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
        }
    }
}

/// Every controller, constructed once and shared by the command handlers.
#[derive(Clone)]
pub struct Controllers {
    pub brands: BrandsController,
    pub categories: CategoriesController,
    pub customers: CustomersController,
    pub products: ProductsController,
    pub users: UsersController,
    pub orders: OrdersController,
    pub reports: ReportsController,
    pub login: LoginController,
}

impl Controllers {
    /// Build every controller over `repositories` with one shared authorizer.
    pub fn new(repositories: Repositories, clock: Arc<dyn Clock>) -> Self {
        let authorizer = Authorizer::new(Arc::clone(&repositories.users));
        Self {
            brands: BrandsController::new(authorizer.clone(), repositories.brands),
            categories: CategoriesController::new(authorizer.clone(), repositories.categories),
            customers: CustomersController::new(authorizer.clone(), repositories.customers),
            products: ProductsController::new(authorizer.clone(), repositories.products),
            users: UsersController::new(authorizer.clone(), Arc::clone(&repositories.users)),
            orders: OrdersController::new(
                authorizer.clone(),
                Arc::clone(&repositories.orders),
                Arc::clone(&clock),
            ),
            reports: ReportsController::new(authorizer, repositories.orders, clock),
            login: LoginController::new(repositories.users),
        }
    }
}

/// Owns the store pool and the fully registered command channel.
#[derive(Clone)]
pub struct AppContext {
    pool: DbPool,
    channel: Arc<CommandChannel>,
}

impl AppContext {
    /// Wire Diesel repositories over `pool` and register every command.
    ///
    /// # Errors
    /// Returns [`RegistrationError`] if a command name is bound twice.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Result<Self, RegistrationError> {
        let controllers = Controllers::new(Repositories::diesel(&pool), clock);
        let mut channel = CommandChannel::new();
        register_commands(&mut channel, &controllers)?;
        Ok(Self {
            pool,
            channel: Arc::new(channel),
        })
    }

    /// Pool shared by the repositories.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Channel with every command registered.
    pub fn channel(&self) -> Arc<CommandChannel> {
        Arc::clone(&self.channel)
    }
}
