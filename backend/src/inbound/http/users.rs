//! Session API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.com","password":"password"}
//! POST /api/v1/logout
//! GET /api/v1/account
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::LoginServiceError;
use crate::domain::{ApiResult, Error, LoginCredentials, UserValidationError};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body carrying the established identity.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
}

/// Account response body for `GET /api/v1/account`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub email: String,
}

fn map_credentials_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyPassword => "password",
        _ => "email",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_login_service_error(err: LoginServiceError) -> Error {
    match err {
        LoginServiceError::InvalidCredentials { .. } => Error::unauthorized("invalid credentials"),
        LoginServiceError::Transport { message } => {
            Error::service_unavailable(format!("identity provider unreachable: {message}"))
        }
        LoginServiceError::Decode { message } => {
            Error::internal(format!("identity provider response invalid: {message}"))
        }
    }
}

/// Verify credentials through the identity provider and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Identity provider unreachable", body = Error)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(payload.email, payload.password)
        .map_err(map_credentials_validation_error)?;
    let verified = state
        .login
        .verify(&credentials)
        .await
        .map_err(map_login_service_error)?;
    session.persist_user(&verified)?;
    Ok(web::Json(LoginResponse {
        user_id: verified.user_id.into(),
        email: verified.email.into(),
    }))
}

/// Tear down the session.
///
/// Idempotent: logging out without a session still succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Expose the signed-in user's email for the account surface.
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["session"],
    operation_id = "account"
)]
#[get("/account")]
pub async fn account(session: SessionContext) -> ApiResult<web::Json<AccountResponse>> {
    session.require_user_id()?;
    let email = session.require_user_email()?;
    Ok(web::Json(AccountResponse {
        email: email.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureCheckoutGateway, FixtureDashboardCache, FixtureExpensesQuery, FixtureLoginService,
        MockExpensesCommand, MockLoginService, FIXTURE_EMAIL, FIXTURE_PASSWORD, FIXTURE_USER_ID,
    };
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn state_with_login(login_service: Arc<dyn crate::domain::ports::LoginService>) -> HttpState {
        HttpState {
            login: login_service,
            expenses: Arc::new(MockExpensesCommand::new()),
            expenses_query: Arc::new(FixtureExpensesQuery),
            checkout: Arc::new(FixtureCheckoutGateway),
            dashboard_cache: Arc::new(FixtureDashboardCache),
        }
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(logout)
                    .service(account),
            )
    }

    async fn login_fixture_user(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: FIXTURE_EMAIL.into(),
                password: FIXTURE_PASSWORD.into(),
            })
            .to_request();
        let res = actix_test::call_service(app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        res.response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn login_establishes_a_session_and_returns_the_identity() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: FIXTURE_EMAIL.into(),
                password: FIXTURE_PASSWORD.into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["userId"], FIXTURE_USER_ID);
        assert_eq!(body["email"], FIXTURE_EMAIL);
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials_with_unauthorised_status() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: FIXTURE_EMAIL.into(),
                password: "wrong-password".into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(body["message"], "invalid credentials");
    }

    #[actix_web::test]
    async fn login_flags_the_offending_field_on_validation_failure() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: "not-an-address".into(),
                password: "password".into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "email");
    }

    #[actix_web::test]
    async fn provider_outage_maps_to_service_unavailable() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_verify()
            .times(1)
            .return_once(|_| Err(LoginServiceError::transport("connect timed out")));
        let app = actix_test::init_service(test_app(state_with_login(Arc::new(login_service))))
            .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: FIXTURE_EMAIL.into(),
                password: FIXTURE_PASSWORD.into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn account_returns_the_session_email() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;
        let cookie = login_fixture_user(&app).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["email"], FIXTURE_EMAIL);
    }

    #[actix_web::test]
    async fn account_requires_a_session() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app =
            actix_test::init_service(test_app(state_with_login(Arc::new(FixtureLoginService))))
                .await;
        let cookie = login_fixture_user(&app).await;

        let logout_req = actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie.clone())
            .to_request();
        let logout_res = actix_test::call_service(&app, logout_req).await;
        assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);

        let cleared = logout_res
            .response()
            .cookies()
            .find(|c| c.name() == "session");
        let mut account_req = actix_test::TestRequest::get().uri("/api/v1/account");
        if let Some(cleared) = cleared {
            account_req = account_req.cookie(cleared);
        }
        let res = actix_test::call_service(&app, account_req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
