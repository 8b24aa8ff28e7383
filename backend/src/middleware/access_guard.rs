//! Access guard applying the page access policy ahead of the handlers.
//!
//! The guard classifies each request path, resolves the requester's identity
//! from the session, and asks the [`AccessGate`] port for a decision. Paths
//! outside the page surface (API routes, health probes, docs) pass through
//! untouched; API handlers enforce their own authentication.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error as ActixError, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::domain::ports::AccessGate;
use crate::domain::{Decision, Error, Identity, Route, UserId};
use crate::inbound::http::session::USER_ID_KEY;

/// Page access guard middleware.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::App;
/// use outlay::domain::ports::FixtureAccessGate;
/// use outlay::middleware::AccessGuard;
///
/// let app = App::new().wrap(AccessGuard::new(Arc::new(FixtureAccessGate)));
/// ```
#[derive(Clone)]
pub struct AccessGuard {
    gate: Arc<dyn AccessGate>,
}

impl AccessGuard {
    /// Create a guard over the given access gate.
    pub fn new(gate: Arc<dyn AccessGate>) -> Self {
        Self { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AccessGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGuardMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
        }))
    }
}

/// Service wrapper produced by [`AccessGuard`].
pub struct AccessGuardMiddleware<S> {
    service: Rc<S>,
    gate: Arc<dyn AccessGate>,
}

/// Resolve the requester's identity from the session cookie.
///
/// A missing or malformed session value degrades to [`Identity::Anonymous`];
/// the guard never grants access on a value it cannot parse.
fn session_identity(req: &ServiceRequest) -> Identity {
    let session = req.get_session();
    match session.get::<String>(USER_ID_KEY) {
        Ok(Some(raw)) => match UserId::new(raw) {
            Ok(user_id) => Identity::Authenticated(user_id),
            Err(error) => {
                debug!(%error, "session carried an invalid user id");
                Identity::Anonymous
            }
        },
        Ok(None) => Identity::Anonymous,
        Err(error) => {
            debug!(%error, "session read failed");
            Identity::Anonymous
        }
    }
}

impl<S, B> Service<ServiceRequest> for AccessGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(route) = Route::classify(req.path()) else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) });
        };

        let identity = session_identity(&req);
        let gate = Arc::clone(&self.gate);
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match gate.decide(&route, &identity).await {
                Decision::Allow => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_boxed_body())
                }
                Decision::RedirectTo(path) => {
                    debug!(path = req.path(), target = %path, "redirecting by policy");
                    let response = HttpResponse::SeeOther()
                        .insert_header((header::LOCATION, path))
                        .finish();
                    Ok(req.into_response(response))
                }
                Decision::Deny => {
                    let response = HttpResponse::Unauthorized()
                        .json(Error::unauthorized("sign in to access this page"));
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
