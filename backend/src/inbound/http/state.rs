//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CheckoutGateway, DashboardCache, ExpensesCommand, ExpensesQuery, LoginService,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use outlay::domain::ports::{
///     FixtureCheckoutGateway, FixtureDashboardCache, FixtureExpensesQuery, FixtureLoginService,
/// };
/// use outlay::domain::ports::FixtureExpenseRepository;
/// use outlay::domain::ExpenseService;
/// use outlay::inbound::http::state::HttpState;
///
/// let service = Arc::new(ExpenseService::new(
///     Arc::new(FixtureExpenseRepository::new()),
///     Arc::new(FixtureDashboardCache),
/// ));
/// let state = HttpState {
///     login: Arc::new(FixtureLoginService),
///     expenses: service.clone(),
///     expenses_query: Arc::new(FixtureExpensesQuery),
///     checkout: Arc::new(FixtureCheckoutGateway),
///     dashboard_cache: Arc::new(FixtureDashboardCache),
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub expenses: Arc<dyn ExpensesCommand>,
    pub expenses_query: Arc<dyn ExpensesQuery>,
    pub checkout: Arc<dyn CheckoutGateway>,
    pub dashboard_cache: Arc<dyn DashboardCache>,
}
