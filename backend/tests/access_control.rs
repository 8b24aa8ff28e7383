//! End to end access control through the full middleware stack.
//!
//! Boots an application wired the way the server wires it (trace capture,
//! session layer, page access guard) over fixture adapters, then walks the
//! page surface as an anonymous visitor, a signed-in free user, and a
//! subscriber.

use std::sync::Arc;

use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{header, StatusCode};
use actix_web::{test as actix_test, web, App};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use outlay::domain::ports::{
    AccessGate, ExpensesCommand, ExpensesQuery, FixtureCheckoutGateway, FixtureExpenseRepository,
    FixtureLoginService, FixtureSubscriptionRepository, SubscriptionRepository,
    SubscriptionRepositoryError, FIXTURE_EMAIL, FIXTURE_PASSWORD,
};
use outlay::domain::{
    AccessPolicyService, ExpenseService, Subscription, UserId, ACCOUNT_PATH, ACTIVE_STATUS,
    DASHBOARD_PATH,
};
use outlay::inbound::http::pages::{account_page, dashboard, marketing};
use outlay::inbound::http::state::HttpState;
use outlay::inbound::http::users::{account, login, logout};
use outlay::middleware::{AccessGuard, Trace};
use outlay::outbound::cache::MemoryDashboardCache;

/// Subscription store that reports an active subscription for everyone.
struct ActiveSubscriptions;

#[async_trait]
impl SubscriptionRepository for ActiveSubscriptions {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        Ok(Some(Subscription {
            user_id: user_id.clone(),
            status: ACTIVE_STATUS.to_owned(),
            created_at: Utc::now(),
        }))
    }
}

fn test_state() -> HttpState {
    let cache = Arc::new(MemoryDashboardCache::new());
    let service = Arc::new(ExpenseService::new(
        Arc::new(FixtureExpenseRepository::new()),
        Arc::clone(&cache),
    ));
    HttpState {
        login: Arc::new(FixtureLoginService),
        expenses: service.clone() as Arc<dyn ExpensesCommand>,
        expenses_query: service as Arc<dyn ExpensesQuery>,
        checkout: Arc::new(FixtureCheckoutGateway),
        dashboard_cache: cache,
    }
}

fn test_app<S>(
    subscriptions: Arc<S>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SubscriptionRepository + 'static,
{
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();
    let gate = Arc::new(AccessPolicyService::new(subscriptions)) as Arc<dyn AccessGate>;

    App::new()
        .app_data(web::Data::new(test_state()))
        .wrap(AccessGuard::new(gate))
        .wrap(session)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(logout)
                .service(account),
        )
        .service(marketing)
        .service(dashboard)
        .service(account_page)
}

async fn login_fixture_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": FIXTURE_EMAIL, "password": FIXTURE_PASSWORD }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn location_header(res: &actix_web::dev::ServiceResponse) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii header")
}

#[actix_web::test]
async fn anonymous_visitors_see_the_marketing_page() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn anonymous_visitors_are_denied_app_pages() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    for path in [DASHBOARD_PATH, ACCOUNT_PATH] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(path).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");
        assert!(
            res.headers().contains_key("trace-id"),
            "denied responses carry a trace id"
        );
    }
}

#[actix_web::test]
async fn signed_in_visitors_skip_the_marketing_page() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let cookie = login_fixture_user(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&res), DASHBOARD_PATH);
}

#[actix_web::test]
async fn free_users_are_steered_to_the_account_page() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let cookie = login_fixture_user(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(DASHBOARD_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&res), ACCOUNT_PATH);
}

#[actix_web::test]
async fn subscribers_reach_the_dashboard() {
    let app = actix_test::init_service(test_app(Arc::new(ActiveSubscriptions))).await;
    let cookie = login_fixture_user(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(DASHBOARD_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = actix_test::read_body(res).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Dashboard"));
}

#[actix_web::test]
async fn the_account_page_is_open_to_any_signed_in_user() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let cookie = login_fixture_user(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(ACCOUNT_PATH)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn api_requests_bypass_the_page_policy() {
    // No subscription, yet the account API works: the gate only covers pages.
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let cookie = login_fixture_user(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn logout_returns_the_visitor_to_anonymous_access() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureSubscriptionRepository))).await;
    let cookie = login_fixture_user(&app).await;

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);

    // The cleared cookie no longer grants access to app pages.
    let cleared = logout_res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(Cookie::into_owned);
    let mut req = actix_test::TestRequest::get().uri(DASHBOARD_PATH);
    if let Some(cleared) = cleared {
        req = req.cookie(cleared);
    }
    let res = actix_test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
