//! Booking flow: pick an available date, fill in the details, done

use chrono::NaiveDate;
use common::{
    calendar::{MonthView, Overrides, YearMonth, describe_day},
    models::BookingRecord,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::forms::{BookingFields, Form, FormController};
use crate::repositories::Repositories;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    SelectDate,
    FillDetails,
    Confirmed,
}

/// Where the flow stands, with the calendar it shows
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub step: BookingStep,
    pub selected: Option<NaiveDate>,
    pub calendar: MonthView,
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    month: YearMonth,
    overrides: Overrides,
    selected: Option<NaiveDate>,
    pub details: FormController<BookingFields>,
    confirmed: Option<BookingRecord>,
}

impl BookingFlow {
    /// Start on the month containing `today`
    pub async fn load(repos: &Repositories, today: NaiveDate) -> ApiResult<Self> {
        Self::for_month(repos, YearMonth::containing(today)).await
    }

    pub async fn for_month(repos: &Repositories, month: YearMonth) -> ApiResult<Self> {
        let overrides = super::month_overrides(&repos.calendar, month).await?;
        Ok(Self {
            step: BookingStep::SelectDate,
            month,
            overrides,
            selected: None,
            details: FormController::new(),
            confirmed: None,
        })
    }

    /// Validate and store a booking in one go, checking the date is still
    /// open against the stored calendar
    pub async fn book(
        repos: &Repositories,
        fields: BookingFields,
        today: NaiveDate,
    ) -> ApiResult<BookingRecord> {
        let draft = fields.validate()?;

        let mut flow = Self::for_month(repos, YearMonth::containing(draft.wedding_date)).await?;
        flow.select_date(draft.wedding_date, today)?;
        flow.details.fields = fields;
        flow.submit(repos).await
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn confirmed(&self) -> Option<&BookingRecord> {
        self.confirmed.as_ref()
    }

    pub fn view(&self, today: NaiveDate) -> ApiResult<MonthView> {
        Ok(MonthView::build(self.month, today, &self.overrides)?)
    }

    pub fn snapshot(&self, today: NaiveDate) -> ApiResult<BookingView> {
        Ok(BookingView {
            step: self.step,
            selected: self.selected,
            calendar: self.view(today)?,
        })
    }

    pub async fn show_month(&mut self, repos: &Repositories, month: YearMonth) -> ApiResult<()> {
        self.overrides = super::month_overrides(&repos.calendar, month).await?;
        self.month = month;
        Ok(())
    }

    pub async fn next_month(&mut self, repos: &Repositories) -> ApiResult<()> {
        self.show_month(repos, self.month.next()).await
    }

    pub async fn previous_month(&mut self, repos: &Repositories) -> ApiResult<()> {
        self.show_month(repos, self.month.previous()).await
    }

    /// Pick a date of the displayed month; only available days are accepted
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> ApiResult<()> {
        if self.step != BookingStep::SelectDate {
            return Err(ApiError::Conflict(
                "A date can only be picked before filling in details".to_string(),
            ));
        }
        if YearMonth::containing(date) != self.month {
            return Err(ApiError::Validation(format!(
                "{date} is not in {} {}",
                self.month.name(),
                self.month.year
            )));
        }
        if !describe_day(date, today, &self.overrides).is_available {
            return Err(ApiError::Validation(format!(
                "{date} is not available for booking"
            )));
        }

        self.selected = Some(date);
        self.details.fields.wedding_date = date.format("%Y-%m-%d").to_string();
        self.step = BookingStep::FillDetails;
        Ok(())
    }

    /// Go back to the calendar; typed details are kept
    pub fn change_date(&mut self) -> ApiResult<()> {
        if self.step != BookingStep::FillDetails {
            return Err(ApiError::Conflict("No date has been picked yet".to_string()));
        }
        self.selected = None;
        self.details.fields.wedding_date.clear();
        self.step = BookingStep::SelectDate;
        Ok(())
    }

    pub async fn submit(&mut self, repos: &Repositories) -> ApiResult<BookingRecord> {
        let Some(date) = self.selected.filter(|_| self.step == BookingStep::FillDetails) else {
            return Err(ApiError::Conflict("Pick a date before submitting".to_string()));
        };
        self.details.fields.wedding_date = date.format("%Y-%m-%d").to_string();

        let booking = self.details.submit(&repos.bookings).await?;
        self.step = BookingStep::Confirmed;
        self.confirmed = Some(booking.clone());
        Ok(booking)
    }
}
