//! Page handlers rendering minimal HTML shells.
//!
//! ```text
//! GET /              marketing landing page
//! GET /app/dashboard expense list shell, per-user cached
//! GET /app/account   account shell with upgrade entry point
//! ```
//!
//! The access guard has already applied the page policy before these run:
//! app pages only ever see authenticated sessions, and the dashboard only
//! entitled ones. The dashboard rendering is cached per user and the cache
//! entry is invalidated by every expense mutation.

use actix_web::{get, web, HttpResponse};

use crate::domain::ports::DashboardCacheError;
use crate::domain::{ApiResult, Error, Expense};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn map_cache_error(error: DashboardCacheError) -> Error {
    let DashboardCacheError::Backend { message } = error;
    Error::internal(format!("dashboard cache failed: {message}"))
}

/// Assemble the dashboard shell from the caller's expenses.
fn render_dashboard(expenses: &[Expense]) -> String {
    let rows: String = expenses
        .iter()
        .map(|expense| {
            format!(
                "<li>{amount:.2} &mdash; {description}</li>",
                amount = expense.amount,
                description = escape(&expense.description),
            )
        })
        .collect();
    format!(
        "<!doctype html><html><body><h1>Dashboard</h1><ul>{rows}</ul></body></html>"
    )
}

/// Marketing landing page.
///
/// The guard bounces authenticated visitors to the dashboard before this
/// handler runs.
#[get("/")]
pub async fn marketing() -> HttpResponse {
    html(
        "<!doctype html><html><body><h1>Outlay</h1>\
         <p>Track your expenses.</p></body></html>"
            .to_owned(),
    )
}

/// Dashboard page listing the caller's expenses.
#[get("/app/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    if let Some(cached) = state
        .dashboard_cache
        .get(&user_id)
        .await
        .map_err(map_cache_error)?
    {
        return Ok(html(cached));
    }

    let expenses = state.expenses_query.list(&user_id).await?;
    let rendered = render_dashboard(&expenses);
    state
        .dashboard_cache
        .put(&user_id, &rendered)
        .await
        .map_err(map_cache_error)?;
    Ok(html(rendered))
}

/// Account page showing the signed-in email and the upgrade entry point.
#[get("/app/account")]
pub async fn account_page(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let email = session.require_user_email()?;
    Ok(html(format!(
        "<!doctype html><html><body><h1>Account</h1>\
         <p>Signed in as {email}.</p>\
         <form method=\"post\" action=\"/api/v1/billing/checkout\">\
         <button type=\"submit\">Upgrade</button></form></body></html>",
        email = escape(email.as_ref()),
    )))
}
