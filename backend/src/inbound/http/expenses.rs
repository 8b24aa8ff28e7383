//! Expense API handlers.
//!
//! ```text
//! GET /api/v1/expenses
//! POST /api/v1/expenses {"amount":42.5,"description":"lunch"}
//! PUT /api/v1/expenses/{id} {"amount":40.0,"description":"lunch (split)"}
//! DELETE /api/v1/expenses/{id}
//! ```
//!
//! Every handler resolves the caller from the session and passes that
//! identity to the expense service; client payloads never carry ownership.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    ApiResult, Error, Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, ExpenseValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Mutable expense fields, shared by create and edit payloads.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    /// Signed amount. Negative values record refunds.
    #[schema(example = 42.5)]
    pub amount: f64,
    /// Free-text description.
    #[schema(example = "lunch")]
    pub description: String,
}

fn map_validation_error(err: ExpenseValidationError) -> Error {
    let field = match err {
        ExpenseValidationError::NonFiniteAmount => "amount",
        ExpenseValidationError::EmptyDescription
        | ExpenseValidationError::DescriptionTooLong { .. } => "description",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

impl TryFrom<ExpensePayload> for ExpenseDraft {
    type Error = ExpenseValidationError;

    fn try_from(value: ExpensePayload) -> Result<Self, Self::Error> {
        Self::new(value.amount, value.description)
    }
}

impl TryFrom<ExpensePayload> for ExpenseUpdate {
    type Error = ExpenseValidationError;

    fn try_from(value: ExpensePayload) -> Result<Self, Self::Error> {
        Self::new(value.amount, value.description)
    }
}

/// List the caller's expenses, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    responses(
        (status = 200, description = "The caller's expenses", body = [Expense]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Expense>>> {
    let requester = session.require_user_id()?;
    let expenses = state.expenses_query.list(&requester).await?;
    Ok(web::Json(expenses))
}

/// Record a new expense owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = ExpensePayload,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "addExpense"
)]
#[post("/expenses")]
pub async fn add_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExpensePayload>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let draft = ExpenseDraft::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let expense = state.expenses.add(&requester, draft).await?;
    Ok(HttpResponse::Created().json(expense))
}

/// Edit an expense's amount and description.
#[utoipa::path(
    put,
    path = "/api/v1/expenses/{id}",
    request_body = ExpensePayload,
    params(("id" = i64, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "No such expense", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "editExpense"
)]
#[put("/expenses/{id}")]
pub async fn edit_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<ExpensePayload>,
) -> ApiResult<web::Json<Expense>> {
    let requester = session.require_user_id()?;
    let id = ExpenseId(path.into_inner());
    let update = ExpenseUpdate::try_from(payload.into_inner()).map_err(map_validation_error)?;
    let expense = state.expenses.edit(&requester, id, update).await?;
    Ok(web::Json(expense))
}

/// Delete an expense.
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    params(("id" = i64, Path, description = "Expense identifier")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owned by another user", body = Error),
        (status = 404, description = "No such expense", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/expenses/{id}")]
pub async fn delete_expense(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    state
        .expenses
        .delete(&requester, ExpenseId(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ExpensesCommand, ExpensesQuery, FixtureCheckoutGateway, FixtureDashboardCache,
        FixtureExpenseRepository, FixtureLoginService, FIXTURE_EMAIL, FIXTURE_PASSWORD,
    };
    use crate::domain::ExpenseService;
    use crate::inbound::http::users::{login, LoginRequest};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn fixture_state() -> HttpState {
        let service = Arc::new(ExpenseService::new(
            Arc::new(FixtureExpenseRepository::new()),
            Arc::new(FixtureDashboardCache),
        ));
        HttpState {
            login: Arc::new(FixtureLoginService),
            expenses: service.clone() as Arc<dyn ExpensesCommand>,
            expenses_query: service as Arc<dyn ExpensesQuery>,
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
                    .service(list_expenses)
                    .service(add_expense)
                    .service(edit_expense)
                    .service(delete_expense),
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
    async fn create_then_list_round_trips() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = login_fixture_user(&app).await;

        let create_req = actix_test::TestRequest::post()
            .uri("/api/v1/expenses")
            .cookie(cookie.clone())
            .set_json(&ExpensePayload {
                amount: 42.5,
                description: "lunch".into(),
            })
            .to_request();
        let create_res = actix_test::call_service(&app, create_req).await;
        assert_eq!(create_res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(create_res).await;
        assert_eq!(created["amount"], 42.5);
        assert_eq!(created["description"], "lunch");
        assert!(created["creatorId"].is_string());

        let list_req = actix_test::TestRequest::get()
            .uri("/api/v1/expenses")
            .cookie(cookie)
            .to_request();
        let list_res = actix_test::call_service(&app, list_req).await;
        assert_eq!(list_res.status(), StatusCode::OK);
        let listed: Value = actix_test::read_body_json(list_res).await;
        assert_eq!(listed.as_array().expect("array").len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[actix_web::test]
    async fn edit_replaces_the_mutable_fields() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = login_fixture_user(&app).await;

        let create_req = actix_test::TestRequest::post()
            .uri("/api/v1/expenses")
            .cookie(cookie.clone())
            .set_json(&ExpensePayload {
                amount: 42.5,
                description: "lunch".into(),
            })
            .to_request();
        let created: Value =
            actix_test::read_body_json(actix_test::call_service(&app, create_req).await).await;
        let id = created["id"].as_i64().expect("id");

        let edit_req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/expenses/{id}"))
            .cookie(cookie)
            .set_json(&ExpensePayload {
                amount: 40.0,
                description: "lunch (split)".into(),
            })
            .to_request();
        let edit_res = actix_test::call_service(&app, edit_req).await;
        assert_eq!(edit_res.status(), StatusCode::OK);
        let edited: Value = actix_test::read_body_json(edit_res).await;
        assert_eq!(edited["id"], created["id"]);
        assert_eq!(edited["amount"], 40.0);
        assert_eq!(edited["description"], "lunch (split)");
        assert_eq!(edited["creatorId"], created["creatorId"]);
    }

    #[actix_web::test]
    async fn delete_removes_the_expense() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = login_fixture_user(&app).await;

        let create_req = actix_test::TestRequest::post()
            .uri("/api/v1/expenses")
            .cookie(cookie.clone())
            .set_json(&ExpensePayload {
                amount: 5.0,
                description: "coffee".into(),
            })
            .to_request();
        let created: Value =
            actix_test::read_body_json(actix_test::call_service(&app, create_req).await).await;
        let id = created["id"].as_i64().expect("id");

        let delete_req = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/expenses/{id}"))
            .cookie(cookie.clone())
            .to_request();
        let delete_res = actix_test::call_service(&app, delete_req).await;
        assert_eq!(delete_res.status(), StatusCode::NO_CONTENT);

        let list_req = actix_test::TestRequest::get()
            .uri("/api/v1/expenses")
            .cookie(cookie)
            .to_request();
        let listed: Value =
            actix_test::read_body_json(actix_test::call_service(&app, list_req).await).await;
        assert_eq!(listed.as_array().expect("array").len(), 0);
    }

    #[actix_web::test]
    async fn missing_expense_is_not_found() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = login_fixture_user(&app).await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/v1/expenses/404")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn invalid_payload_flags_the_field() {
        let app = actix_test::init_service(test_app(fixture_state())).await;
        let cookie = login_fixture_user(&app).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/expenses")
            .cookie(cookie)
            .set_json(&ExpensePayload {
                amount: 1.0,
                description: "   ".into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "description");
    }

    #[actix_web::test]
    async fn endpoints_reject_without_a_session() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/expenses")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
