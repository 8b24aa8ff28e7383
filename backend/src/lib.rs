//! Expense tracking backend with session authentication and a
//! subscription-gated dashboard.
//!
//! The crate follows a hexagonal layout: `domain` holds the transport-free
//! core (expense records, the access policy, driving and driven ports),
//! `inbound::http` exposes the REST handlers and server-rendered pages,
//! `outbound` implements the ports against PostgreSQL, the identity
//! provider, and the checkout provider, and `server` wires everything into
//! an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
