//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting a verified user, requiring an
//! authenticated id, or clearing the session on logout.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserEmail, UserId, VerifiedUser};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_EMAIL_KEY: &str = "user_email";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the verified user's identity in the session cookie.
    ///
    /// Renews the session key first so a pre-login cookie cannot be fixated
    /// onto the authenticated session.
    pub fn persist_user(&self, user: &VerifiedUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.user_id.as_ref())
            .and_then(|()| self.0.insert(USER_EMAIL_KEY, user.email.as_ref()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Fetch the session user's email, if present.
    pub fn user_email(&self) -> Result<Option<UserEmail>, Error> {
        let email = self
            .0
            .get::<String>(USER_EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match email {
            Some(raw) => match UserEmail::new(raw) {
                Ok(email) => Ok(Some(email)),
                Err(error) => {
                    tracing::warn!("invalid email in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require the authenticated session's email or return `401 Unauthorized`.
    pub fn require_user_email(&self) -> Result<UserEmail, Error> {
        self.user_email()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Remove all session state and invalidate the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
