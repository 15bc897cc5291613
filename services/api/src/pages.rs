//! Per-page view models
//!
//! Each page loads what it renders through the repositories and exposes
//! its interactions as methods. Nothing is shared between pages.

use chrono::NaiveDate;
use common::{
    calendar::{MonthView, Overrides, YearMonth},
    models::CalendarFilter,
};

use crate::error::ApiResult;
use crate::repositories::CalendarRepository;

pub mod booking;
pub mod contact;
pub mod dashboard;
pub mod home;
pub mod portfolio;

pub use booking::BookingFlow;
pub use contact::ContactPage;
pub use dashboard::AdminDashboard;
pub use home::HomePage;
pub use portfolio::PortfolioPage;

/// Overrides stored for the days of `month`
pub async fn month_overrides(
    calendar: &CalendarRepository,
    month: YearMonth,
) -> ApiResult<Overrides> {
    let filter = CalendarFilter::between(month.first_day()?, month.last_day()?);
    Ok(calendar.overrides(filter).await?)
}

/// The rendered availability of `month`
pub async fn month_view(
    calendar: &CalendarRepository,
    month: YearMonth,
    today: NaiveDate,
) -> ApiResult<MonthView> {
    let overrides = month_overrides(calendar, month).await?;
    Ok(MonthView::build(month, today, &overrides)?)
}
