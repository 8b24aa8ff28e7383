//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated document covering the session,
//! expense, billing, and health endpoints. Swagger UI serves it at `/docs`
//! in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Expense, ExpenseId};
use crate::inbound::http::billing::CheckoutResponse;
use crate::inbound::http::expenses::ExpensePayload;
use crate::inbound::http::users::{AccountResponse, LoginRequest, LoginResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Outlay API",
        description = "Session-authenticated expense tracking with a \
                       subscription-gated dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::account,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::add_expense,
        crate::inbound::http::expenses::edit_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::billing::create_checkout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Expense,
        ExpenseId,
        ExpensePayload,
        LoginRequest,
        LoginResponse,
        AccountResponse,
        CheckoutResponse,
    )),
    tags(
        (name = "session", description = "Login, logout, and account details"),
        (name = "expenses", description = "Per-user expense records"),
        (name = "billing", description = "Hosted checkout"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
