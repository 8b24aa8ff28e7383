//! Actix middleware: request tracing and the page access guard.

pub mod access_guard;
pub mod trace;

pub use access_guard::AccessGuard;
pub use trace::Trace;
