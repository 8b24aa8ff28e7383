//! Test helpers for inbound HTTP components.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing/encryption key per invocation, names the cookie
/// `session`, and disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
