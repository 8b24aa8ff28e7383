//! Builders selecting real adapters or fixtures for the HTTP state.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    AccessGate, CheckoutGateway, ExpensesCommand, ExpensesQuery, FixtureCheckoutGateway,
    FixtureExpenseRepository, FixtureLoginService, FixtureSubscriptionRepository, LoginService,
};
use crate::domain::{AccessPolicyService, ExpenseService};
use crate::inbound::http::state::HttpState;
use crate::outbound::billing::HttpCheckoutGateway;
use crate::outbound::cache::MemoryDashboardCache;
use crate::outbound::identity::HttpLoginService;
use crate::outbound::persistence::{DieselExpenseRepository, DieselSubscriptionRepository};

use super::ServerConfig;

/// Select the login service: the HTTP identity adapter when an endpoint is
/// configured, otherwise the fixture accepting the development credentials.
fn build_login_service(config: &ServerConfig) -> std::io::Result<Arc<dyn LoginService>> {
    match &config.identity_endpoint {
        Some(endpoint) => {
            let service = HttpLoginService::new(endpoint.clone(), config.provider_timeout)
                .map_err(|e| {
                    std::io::Error::other(format!("identity client construction failed: {e}"))
                })?;
            Ok(Arc::new(service))
        }
        None => Ok(Arc::new(FixtureLoginService)),
    }
}

/// Select the checkout gateway: the HTTP provider adapter when configured,
/// otherwise the fixture returning a canned redirect.
fn build_checkout_gateway(config: &ServerConfig) -> std::io::Result<Arc<dyn CheckoutGateway>> {
    match &config.checkout {
        Some(checkout) => {
            let gateway = HttpCheckoutGateway::new(checkout.clone(), config.provider_timeout)
                .map_err(|e| {
                    std::io::Error::other(format!("checkout client construction failed: {e}"))
                })?;
            Ok(Arc::new(gateway))
        }
        None => Ok(Arc::new(FixtureCheckoutGateway)),
    }
}

/// Build the expense command/query pair over the shared dashboard cache.
///
/// Both trait objects point at the same service instance so mutations and
/// reads agree on cache invalidation.
fn build_expense_services(
    config: &ServerConfig,
    cache: Arc<MemoryDashboardCache>,
) -> (Arc<dyn ExpensesCommand>, Arc<dyn ExpensesQuery>) {
    match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(ExpenseService::new(
                Arc::new(DieselExpenseRepository::new(pool.clone())),
                cache,
            ));
            (
                service.clone() as Arc<dyn ExpensesCommand>,
                service as Arc<dyn ExpensesQuery>,
            )
        }
        None => {
            let service = Arc::new(ExpenseService::new(
                Arc::new(FixtureExpenseRepository::new()),
                cache,
            ));
            (
                service.clone() as Arc<dyn ExpensesCommand>,
                service as Arc<dyn ExpensesQuery>,
            )
        }
    }
}

/// Build the page access gate over the configured subscription source.
pub(super) fn build_access_gate(config: &ServerConfig) -> Arc<dyn AccessGate> {
    match &config.db_pool {
        Some(pool) => Arc::new(AccessPolicyService::new(Arc::new(
            DieselSubscriptionRepository::new(pool.clone()),
        ))),
        None => Arc::new(AccessPolicyService::new(Arc::new(
            FixtureSubscriptionRepository,
        ))),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let cache = Arc::new(MemoryDashboardCache::new());
    let (expenses, expenses_query) = build_expense_services(config, Arc::clone(&cache));

    Ok(web::Data::new(HttpState {
        login: build_login_service(config)?,
        expenses,
        expenses_query,
        checkout: build_checkout_gateway(config)?,
        dashboard_cache: cache,
    }))
}
