//! Port for the hosted payment checkout provider.

use async_trait::async_trait;

use crate::domain::{UserEmail, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by checkout gateway adapters.
    pub enum CheckoutGatewayError {
        /// The provider rejected the session request.
        Rejected { message: String } =>
            "checkout provider rejected the request: {message}",
        /// The provider could not be reached or timed out.
        Transport { message: String } =>
            "checkout provider unreachable: {message}",
        /// The provider answered with an unusable payload.
        Decode { message: String } =>
            "checkout provider response invalid: {message}",
    }
}

/// A checkout session created by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Hosted payment page the browser should be sent to.
    pub redirect_url: String,
}

/// Port for creating hosted checkout sessions.
///
/// The user id rides along as the session's client reference so the
/// provider's fulfilment flow can attribute the resulting subscription.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a checkout session for the given customer.
    async fn create_session(
        &self,
        user_id: &UserId,
        email: &UserEmail,
    ) -> Result<CheckoutSession, CheckoutGatewayError>;
}

/// Fixture gateway returning a deterministic redirect URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCheckoutGateway;

#[async_trait]
impl CheckoutGateway for FixtureCheckoutGateway {
    async fn create_session(
        &self,
        user_id: &UserId,
        _email: &UserEmail,
    ) -> Result<CheckoutSession, CheckoutGatewayError> {
        Ok(CheckoutSession {
            redirect_url: format!("https://checkout.invalid/session/{user_id}"),
        })
    }
}
