//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_gate;
mod checkout_gateway;
mod dashboard_cache;
mod expense_repository;
mod expenses_command;
mod expenses_query;
mod login_service;
mod subscription_repository;

#[cfg(test)]
pub use access_gate::MockAccessGate;
pub use access_gate::{AccessGate, FixtureAccessGate};
#[cfg(test)]
pub use checkout_gateway::MockCheckoutGateway;
pub use checkout_gateway::{
    CheckoutGateway, CheckoutGatewayError, CheckoutSession, FixtureCheckoutGateway,
};
#[cfg(test)]
pub use dashboard_cache::MockDashboardCache;
pub use dashboard_cache::{DashboardCache, DashboardCacheError, FixtureDashboardCache};
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_repository::{ExpenseRepository, ExpenseRepositoryError, FixtureExpenseRepository};
#[cfg(test)]
pub use expenses_command::MockExpensesCommand;
pub use expenses_command::ExpensesCommand;
#[cfg(test)]
pub use expenses_query::MockExpensesQuery;
pub use expenses_query::{ExpensesQuery, FixtureExpensesQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FixtureLoginService, LoginService, LoginServiceError, FIXTURE_EMAIL, FIXTURE_PASSWORD,
    FIXTURE_USER_ID,
};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{
    FixtureSubscriptionRepository, SubscriptionRepository, SubscriptionRepositoryError,
};
