//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_access_gate, build_http_state};

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::AccessGate;
use crate::inbound::http::billing::create_checkout;
use crate::inbound::http::expenses::{add_expense, delete_expense, edit_expense, list_expenses};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::pages::{account_page, dashboard, marketing};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{account, login, logout};
use crate::middleware::{AccessGuard, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    gate: Arc<dyn AccessGate>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Assemble the application with its middleware stack and route surface.
///
/// Middleware executes outermost first: trace capture, then the session
/// layer, then the page access guard. The session layer sits at the app
/// level because both the API scope and the server-rendered pages read it.
fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        gate,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(login)
        .service(logout)
        .service(account)
        .service(list_expenses)
        .service(add_expense)
        .service(edit_expense)
        .service(delete_expense)
        .service(create_checkout);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(AccessGuard::new(gate))
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(marketing)
        .service(dashboard)
        .service(account_page)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, and provider settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when adapter construction, binding the
/// socket, or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let gate = build_access_gate(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            gate: Arc::clone(&gate),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
