//! Billing API handlers.
//!
//! ```text
//! POST /api/v1/billing/checkout
//! ```
//!
//! The handler creates a hosted checkout session for the caller and hands
//! the provider's redirect URL back to the browser. Subscription rows are
//! written by the provider's fulfilment flow, never by this service.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::CheckoutGatewayError;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Checkout response body carrying the provider's hosted page URL.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Hosted payment page the browser should navigate to.
    #[schema(example = "https://checkout.example.com/c/cs_123")]
    pub redirect_url: String,
}

fn map_gateway_error(err: CheckoutGatewayError) -> Error {
    match err {
        CheckoutGatewayError::Rejected { message } => {
            Error::invalid_request(format!("checkout provider rejected the request: {message}"))
        }
        CheckoutGatewayError::Transport { message } => {
            Error::service_unavailable(format!("checkout provider unreachable: {message}"))
        }
        CheckoutGatewayError::Decode { message } => {
            Error::internal(format!("checkout provider response invalid: {message}"))
        }
    }
}

/// Create a checkout session for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/billing/checkout",
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Checkout provider unreachable", body = Error)
    ),
    tags = ["billing"],
    operation_id = "createCheckoutSession"
)]
#[post("/billing/checkout")]
pub async fn create_checkout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CheckoutResponse>> {
    let user_id = session.require_user_id()?;
    let email = session.require_user_email()?;
    let checkout = state
        .checkout
        .create_session(&user_id, &email)
        .await
        .map_err(map_gateway_error)?;
    Ok(web::Json(CheckoutResponse {
        redirect_url: checkout.redirect_url,
    }))
}
