//! HTTP handlers.

use std::any::Any;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use caseview_core::SearchInput;
use caseview_source::{Court, available_courts};
use caseview_store::StoreError;
use serde::Deserialize;
use tracing::error;

use crate::AppState;
use crate::flash::FlashSigner;
use crate::render::{self, Nav};
use crate::search::{SearchError, run_search};

const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// Raw `POST /search` form body. Every field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    pub case_type: Option<String>,
    pub case_number: Option<String>,
    pub filing_year: Option<String>,
}

impl From<SearchForm> for SearchInput {
    fn from(form: SearchForm) -> Self {
        SearchInput {
            case_type: form.case_type,
            case_number: form.case_number,
            filing_year: form.filing_year,
        }
    }
}

/// Read-only page failure, rendered as the 500 page.
pub struct PageError(StoreError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "query log read failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page()),
        )
            .into_response()
    }
}

/// GET /
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let flash = state.flash.read(&headers);
    let courts: &[Court] = if state.lookup.is_external() {
        available_courts()
    } else {
        &[]
    };
    let page = Html(render::index_page(
        state.nav(),
        flash.as_deref(),
        courts,
        state.max_filing_year,
    ));
    if flash.is_some() {
        ([FlashSigner::clear_cookie()], page).into_response()
    } else {
        page.into_response()
    }
}

/// POST /search
pub async fn search(
    State(state): State<AppState>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Response {
    let input: SearchInput = form.map(|Form(f)| f).unwrap_or_default().into();

    match run_search(&state.lookup, state.log.as_ref(), &input, state.max_filing_year).await {
        Ok(report) => Html(render::results_page(state.nav(), &report)).into_response(),
        Err(SearchError::Validation(e)) => redirect_with_flash(&state.flash, &e.to_string()),
        Err(SearchError::Store(e)) => {
            error!(error = %e, "search failed");
            redirect_with_flash(&state.flash, UNEXPECTED)
        }
    }
}

/// GET /history
pub async fn history(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let queries = state.log.history(state.history_limit).map_err(PageError)?;
    Ok(Html(render::history_page(state.nav(), &queries)))
}

/// GET /cases, static strategy only
pub async fn cases(State(state): State<AppState>) -> Response {
    match state.lookup.case_table() {
        Some(table) => Html(render::cases_page(state.nav(), table)).into_response(),
        None => not_found_response(state.nav()),
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Fallback for unknown routes.
pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_response(state.nav())
}

/// Response for a panicking handler.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page()),
    )
        .into_response()
}

fn not_found_response(nav: Nav) -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page(nav))).into_response()
}

fn redirect_with_flash(signer: &FlashSigner, message: &str) -> Response {
    match signer.set_cookie(message) {
        Some(cookie) => ([cookie], Redirect::to("/")).into_response(),
        None => Redirect::to("/").into_response(),
    }
}
