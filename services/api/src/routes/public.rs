//! Public site endpoints

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use common::calendar::YearMonth;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::ApiResult,
    forms::{BookingFields, CallbackFields, ContactFields},
    pages::{self, BookingFlow, ContactPage, HomePage, PortfolioPage},
    state::AppState,
};

/// `?year=2030&month=5`; month is zero-based, both default to today's
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    pub fn resolve(&self, today: NaiveDate) -> ApiResult<YearMonth> {
        let current = YearMonth::containing(today);
        Ok(YearMonth::new(
            self.year.unwrap_or(current.year),
            self.month.unwrap_or(current.month),
        )?)
    }
}

/// `?year=2030&month=5` to browse, `?date=2030-06-22` to pick a day
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    /// Show every video instead of the first page
    #[serde(default)]
    pub all: bool,
}

pub async fn home(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let page = HomePage::load(&state.repositories, state.today()).await?;
    Ok(Json(page))
}

pub async fn portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut page = PortfolioPage::load(&state.repositories).await?;
    if query.all {
        page.show_more();
    }
    Ok(Json(page.view()))
}

pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<impl IntoResponse> {
    let today = state.today();
    let month = query.resolve(today)?;
    let view = pages::month_view(&state.repositories.calendar, month, today).await?;
    Ok(Json(view))
}

/// The booking calendar, and whether the picked date can move on to the
/// details step
pub async fn booking(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> ApiResult<impl IntoResponse> {
    let today = state.today();
    let month = match query.date {
        Some(date) => YearMonth::containing(date),
        None => MonthQuery {
            year: query.year,
            month: query.month,
        }
        .resolve(today)?,
    };

    let mut flow = BookingFlow::for_month(&state.repositories, month).await?;
    if let Some(date) = query.date {
        flow.select_date(date, today)?;
    }
    Ok(Json(flow.snapshot(today)?))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(fields): Json<ContactFields>,
) -> ApiResult<impl IntoResponse> {
    let mut page = ContactPage::new();
    page.contact.fields = fields;
    let stored = page.submit_contact(&state.repositories).await?;

    info!(id = %stored.id, "Contact form received");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn request_callback(
    State(state): State<AppState>,
    Json(fields): Json<CallbackFields>,
) -> ApiResult<impl IntoResponse> {
    let mut page = ContactPage::new();
    page.open_callback();
    page.callback.fields = fields;
    let stored = page.submit_callback(&state.repositories).await?;

    info!(id = %stored.id, "Callback requested");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn request_booking(
    State(state): State<AppState>,
    Json(fields): Json<BookingFields>,
) -> ApiResult<impl IntoResponse> {
    let booking = BookingFlow::book(&state.repositories, fields, state.today()).await?;

    info!(id = %booking.id, date = %booking.wedding_date, "Booking requested");
    Ok((StatusCode::CREATED, Json(booking)))
}
