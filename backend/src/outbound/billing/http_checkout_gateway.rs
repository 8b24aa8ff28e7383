//! Reqwest-backed hosted checkout adapter.
//!
//! Creates checkout sessions against the payment provider's form-encoded,
//! bearer-authenticated endpoint. The caller's user id rides along as the
//! session's client reference so the provider's fulfilment flow can
//! attribute the resulting subscription; success and cancel URLs point the
//! browser back at the account and dashboard pages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use serde::Deserialize;

use crate::domain::ports::{CheckoutGateway, CheckoutGatewayError, CheckoutSession};
use crate::domain::{UserEmail, UserId};

/// Provider endpoint and session parameters for the checkout adapter.
#[derive(Debug, Clone)]
pub struct CheckoutEndpoint {
    /// Session creation endpoint.
    pub endpoint: Url,
    /// Bearer secret authenticating this service to the provider.
    pub secret: String,
    /// Provider price identifier for the subscription being sold.
    pub price_id: String,
    /// Absolute URL the provider redirects to after payment.
    pub success_url: String,
    /// Absolute URL the provider redirects to on cancellation.
    pub cancel_url: String,
}

/// Checkout adapter performing HTTP POST requests against one provider.
pub struct HttpCheckoutGateway {
    client: Client,
    config: CheckoutEndpoint,
}

impl HttpCheckoutGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: CheckoutEndpoint, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[derive(Deserialize)]
struct SessionResponseDto {
    url: String,
}

fn map_transport_error(error: reqwest::Error) -> CheckoutGatewayError {
    CheckoutGatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CheckoutGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    if status.is_client_error() {
        CheckoutGatewayError::rejected(message)
    } else {
        CheckoutGatewayError::transport(message)
    }
}

fn parse_session(body: &[u8]) -> Result<CheckoutSession, CheckoutGatewayError> {
    let decoded: SessionResponseDto = serde_json::from_slice(body)
        .map_err(|error| CheckoutGatewayError::decode(format!("invalid session payload: {error}")))?;
    if decoded.url.is_empty() {
        return Err(CheckoutGatewayError::decode(
            "session payload carried an empty redirect URL",
        ));
    }
    Ok(CheckoutSession {
        redirect_url: decoded.url,
    })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl CheckoutGateway for HttpCheckoutGateway {
    async fn create_session(
        &self,
        user_id: &UserId,
        email: &UserEmail,
    ) -> Result<CheckoutSession, CheckoutGatewayError> {
        let form = [
            ("mode", "subscription"),
            ("client_reference_id", user_id.as_ref()),
            ("customer_email", email.as_ref()),
            ("line_items[0][price]", self.config.price_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", self.config.success_url.as_str()),
            ("cancel_url", self.config.cancel_url.as_str()),
        ];
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.secret)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_session(body.as_ref())
    }
}
