//! Payment provider adapters.

mod http_checkout_gateway;

pub use http_checkout_gateway::{CheckoutEndpoint, HttpCheckoutGateway};
