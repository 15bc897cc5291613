//! Admin dashboard
//!
//! Loads every table for the overview and wraps the admin operations. Status
//! changes go through the transition guards here; the repositories accept
//! any status.

use chrono::{Local, NaiveDate};
use common::{
    calendar::{DayState, MonthView, Overrides, YearMonth},
    error::BackendError,
    models::{
        BookingRecord, BookingStatus, CalendarChanges, CalendarFilter, CalendarRecord, CalendarStatus, CallbackRequest,
        CallbackStatus, ContactFormRecord, ContactStatus, VideoCategory, VideoRecord,
    },
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::forms::validation;
use crate::repositories::{Repositories, UploadBatch, VideoDeletion, VideoUpload};

/// Headline numbers at the top of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total_inquiries: usize,
    /// Contact forms created in the current calendar month
    pub inquiries_this_month: usize,
    pub new_inquiries: usize,
    pub pending_bookings: usize,
    pub pending_callbacks: usize,
    pub portfolio_count: usize,
}

impl Analytics {
    pub fn compute(
        today: NaiveDate,
        contact_forms: &[ContactFormRecord],
        bookings: &[BookingRecord],
        callbacks: &[CallbackRequest],
        portfolio: &[VideoRecord],
    ) -> Self {
        let this_month = YearMonth::containing(today);

        Self {
            total_inquiries: contact_forms.len(),
            inquiries_this_month: contact_forms
                .iter()
                .filter(|form| {
                    YearMonth::containing(form.created_at.with_timezone(&Local).date_naive())
                        == this_month
                })
                .count(),
            new_inquiries: contact_forms
                .iter()
                .filter(|form| form.status == ContactStatus::New)
                .count(),
            pending_bookings: bookings
                .iter()
                .filter(|booking| booking.status == BookingStatus::Pending)
                .count(),
            pending_callbacks: callbacks
                .iter()
                .filter(|callback| callback.status == CallbackStatus::Pending)
                .count(),
            portfolio_count: portfolio.len(),
        }
    }
}

/// Everything the dashboard shows on load
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub analytics: Analytics,
    pub hero: Option<VideoRecord>,
    pub portfolio: Vec<VideoRecord>,
    pub bookings: Vec<BookingRecord>,
    pub contact_forms: Vec<ContactFormRecord>,
    pub callbacks: Vec<CallbackRequest>,
    pub calendar: AdminMonth,
}

/// One day of the admin calendar
#[derive(Debug, Clone, Serialize)]
pub struct AdminDay {
    pub date: NaiveDate,
    pub state: DayState,
    pub notes: Option<String>,
}

/// Month grid with the admin display state of each day
#[derive(Debug, Clone, Serialize)]
pub struct AdminMonth {
    #[serde(flatten)]
    pub view: MonthView,
    pub days: Vec<AdminDay>,
}

/// Calendar editor submission: select a date, choose a status, save.
/// Blank notes keep what is stored; `clear_notes` removes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEdit {
    pub date: NaiveDate,
    pub status: CalendarStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub clear_notes: bool,
}

#[derive(Clone)]
pub struct AdminDashboard {
    repos: Repositories,
}

impl AdminDashboard {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn summary(&self, today: NaiveDate) -> ApiResult<DashboardSummary> {
        let portfolio = self.repos.videos.portfolio().await?;
        let hero = self.repos.videos.hero().await?;
        let bookings = self.repos.bookings.list_all().await?;
        let contact_forms = self.repos.contact_forms.list_all().await?;
        let callbacks = self.repos.callbacks.list_all().await?;
        let calendar = self.calendar_month(YearMonth::containing(today), today).await?;

        Ok(DashboardSummary {
            analytics: Analytics::compute(today, &contact_forms, &bookings, &callbacks, &portfolio),
            hero,
            portfolio,
            bookings,
            contact_forms,
            callbacks,
            calendar,
        })
    }

    pub async fn calendar_month(&self, month: YearMonth, today: NaiveDate) -> ApiResult<AdminMonth> {
        let records: Vec<CalendarRecord> = self
            .repos
            .calendar
            .list(&CalendarFilter::between(month.first_day()?, month.last_day()?))
            .await?;
        let overrides = Overrides::from_records(&records);
        let view = MonthView::build(month, today, &overrides)?;

        let days = view
            .days()
            .map(|cell| AdminDay {
                date: cell.date,
                state: cell.display_state(),
                notes: records
                    .iter()
                    .find(|record| record.date == cell.date)
                    .and_then(|record| record.notes.clone()),
            })
            .collect();

        Ok(AdminMonth { view, days })
    }

    pub async fn save_calendar_day(&self, edit: CalendarEdit) -> ApiResult<CalendarRecord> {
        let notes = validation::optional(edit.notes.as_deref().unwrap_or_default());
        let record = self
            .repos
            .calendar
            .set_date(edit.date, edit.status, notes)
            .await?;

        let record = if edit.clear_notes && record.notes.is_some() {
            self.repos
                .calendar
                .update(
                    record.id,
                    CalendarChanges {
                        clear_notes: true,
                        ..Default::default()
                    },
                )
                .await?
        } else {
            record
        };

        info!(date = %record.date, status = %record.status, "Calendar day saved");
        Ok(record)
    }

    pub async fn upload_portfolio(&self, files: Vec<VideoUpload>) -> UploadBatch {
        self.repos
            .videos
            .upload_many(VideoCategory::Portfolio, files)
            .await
    }

    pub async fn upload_hero(&self, file: VideoUpload) -> ApiResult<VideoRecord> {
        Ok(self.repos.videos.upload(VideoCategory::Hero, file).await?)
    }

    pub async fn rename_video(&self, id: Uuid, name: &str) -> ApiResult<VideoRecord> {
        let name = validation::required("Name", name)?;
        Ok(self.repos.videos.rename(id, name).await?)
    }

    pub async fn delete_video(&self, id: Uuid) -> ApiResult<VideoDeletion> {
        let video = self
            .repos
            .videos
            .find(id)
            .await?
            .ok_or(BackendError::NotFound { table: "videos", id })?;
        Ok(self.repos.videos.delete(&video).await?)
    }

    /// Confirm or decline a pending booking
    pub async fn set_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> ApiResult<BookingRecord> {
        let booking = self
            .repos
            .bookings
            .find(id)
            .await?
            .ok_or(BackendError::NotFound {
                table: "bookings",
                id,
            })?;

        if !booking.status.can_become(status) {
            return Err(ApiError::Conflict(format!(
                "Booking is {} and cannot become {}",
                booking.status, status
            )));
        }

        Ok(self.repos.bookings.set_status(id, status).await?)
    }

    pub async fn delete_booking(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.repos.bookings.delete(id).await?)
    }

    /// Inquiries may be moved to any status
    pub async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> ApiResult<ContactFormRecord> {
        Ok(self.repos.contact_forms.set_status(id, status).await?)
    }

    /// Move a callback one step along pending → called → completed
    pub async fn advance_callback(&self, id: Uuid) -> ApiResult<CallbackRequest> {
        let callback = self
            .repos
            .callbacks
            .find(id)
            .await?
            .ok_or(BackendError::NotFound {
                table: "callback_requests",
                id,
            })?;

        let next = callback.status.next().ok_or_else(|| {
            ApiError::Conflict("Callback request is already completed".to_string())
        })?;

        Ok(self.repos.callbacks.set_status(id, next).await?)
    }

    pub async fn delete_callback(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.repos.callbacks.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::{
        models::{NewBooking, NewCallbackRequest, NewContactForm},
        storage::MemoryStorage,
        store::Backend,
    };
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard() -> (AdminDashboard, Repositories) {
        let repos = Repositories::new(Backend::in_memory(Arc::new(MemoryStorage::new(
            "https://cdn.test/videos",
        ))));
        (AdminDashboard::new(repos.clone()), repos)
    }

    fn contact(status: ContactStatus, created_at: chrono::DateTime<Utc>) -> ContactFormRecord {
        ContactFormRecord {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            phone: "555-0101".into(),
            email: None,
            wedding_date: None,
            venue: None,
            message: None,
            status,
            created_at,
        }
    }

    async fn pending_booking(repos: &Repositories) -> BookingRecord {
        repos
            .bookings
            .create(NewBooking {
                client_name: "Ana & Ben".into(),
                email: "ana@example.com".into(),
                phone: "555-0100".into(),
                wedding_date: date(2030, 9, 14),
                message: None,
            })
            .await
            .unwrap()
    }

    #[test]
    fn analytics_counts() {
        let now = Utc::now();
        let today = now.with_timezone(&Local).date_naive();
        let forms = vec![
            contact(ContactStatus::New, now),
            contact(ContactStatus::Contacted, now),
            contact(ContactStatus::New, now - Duration::days(400)),
        ];

        let analytics = Analytics::compute(today, &forms, &[], &[], &[]);
        assert_eq!(analytics.total_inquiries, 3);
        assert_eq!(analytics.inquiries_this_month, 2);
        assert_eq!(analytics.new_inquiries, 2);
        assert_eq!(analytics.pending_bookings, 0);
    }

    #[tokio::test]
    async fn summary_reflects_tables() {
        let (dashboard, repos) = dashboard();
        pending_booking(&repos).await;
        repos
            .contact_forms
            .create(NewContactForm {
                name: "Ana".into(),
                phone: "555-0101".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        repos
            .callbacks
            .create(NewCallbackRequest {
                name: "Ben".into(),
                phone: "555-0102".into(),
                best_time: None,
            })
            .await
            .unwrap();

        let summary = dashboard.summary(Local::now().date_naive()).await.unwrap();
        assert_eq!(summary.analytics.pending_bookings, 1);
        assert_eq!(summary.analytics.pending_callbacks, 1);
        assert_eq!(summary.analytics.new_inquiries, 1);
        assert_eq!(summary.analytics.inquiries_this_month, 1);
        assert!(summary.hero.is_none());
    }

    #[tokio::test]
    async fn bookings_only_leave_pending() {
        let (dashboard, repos) = dashboard();
        let booking = pending_booking(&repos).await;

        let confirmed = dashboard
            .set_booking_status(booking.id, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        assert!(matches!(
            dashboard
                .set_booking_status(booking.id, BookingStatus::Declined)
                .await,
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            dashboard
                .set_booking_status(Uuid::new_v4(), BookingStatus::Confirmed)
                .await,
            Err(ApiError::Backend(e)) if e.is_not_found()
        ));
    }

    #[tokio::test]
    async fn callbacks_advance_one_step_at_a_time() {
        let (dashboard, repos) = dashboard();
        let callback = repos
            .callbacks
            .create(NewCallbackRequest {
                name: "Ben".into(),
                phone: "555-0102".into(),
                best_time: Some("Evenings".into()),
            })
            .await
            .unwrap();

        let called = dashboard.advance_callback(callback.id).await.unwrap();
        assert_eq!(called.status, CallbackStatus::Called);
        let completed = dashboard.advance_callback(callback.id).await.unwrap();
        assert_eq!(completed.status, CallbackStatus::Completed);
        assert!(matches!(
            dashboard.advance_callback(callback.id).await,
            Err(ApiError::Conflict(_))
        ));

        dashboard.delete_callback(callback.id).await.unwrap();
        dashboard.delete_callback(callback.id).await.unwrap();
        assert!(repos.callbacks.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn contact_status_can_move_freely() {
        let (dashboard, repos) = dashboard();
        let form = repos
            .contact_forms
            .create(NewContactForm {
                name: "Ana".into(),
                phone: "555-0101".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        for status in [ContactStatus::Converted, ContactStatus::New, ContactStatus::Declined] {
            let updated = dashboard.set_contact_status(form.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn admin_calendar_shows_states_and_notes() {
        let (dashboard, _) = dashboard();
        let today = date(2030, 6, 10);

        dashboard
            .save_calendar_day(CalendarEdit {
                date: date(2030, 6, 20),
                status: CalendarStatus::Tentative,
                notes: Some("Hold for the Smiths".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        dashboard
            .save_calendar_day(CalendarEdit {
                date: date(2030, 6, 5),
                status: CalendarStatus::Booked,
                notes: Some("  ".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let month = dashboard
            .calendar_month(YearMonth::containing(today), today)
            .await
            .unwrap();
        assert_eq!(month.days.len(), 30);

        let day = |d: u32| month.days.iter().find(|day| day.date == date(2030, 6, d)).unwrap();
        assert_eq!(day(20).state, DayState::Tentative);
        assert_eq!(day(20).notes.as_deref(), Some("Hold for the Smiths"));
        assert_eq!(day(5).state, DayState::Past);
        assert!(day(5).notes.is_none());
        assert_eq!(day(11).state, DayState::Available);
    }

    #[tokio::test]
    async fn calendar_notes_can_be_cleared() {
        let (dashboard, _) = dashboard();
        let edit = |notes: Option<&str>, clear_notes: bool| CalendarEdit {
            date: date(2030, 6, 20),
            status: CalendarStatus::Tentative,
            notes: notes.map(str::to_string),
            clear_notes,
        };

        dashboard
            .save_calendar_day(edit(Some("Hold for the Smiths"), false))
            .await
            .unwrap();
        let kept = dashboard.save_calendar_day(edit(Some(""), false)).await.unwrap();
        assert_eq!(kept.notes.as_deref(), Some("Hold for the Smiths"));

        let cleared = dashboard.save_calendar_day(edit(None, true)).await.unwrap();
        assert!(cleared.notes.is_none());
        assert_eq!(cleared.status, CalendarStatus::Tentative);
    }

    #[tokio::test]
    async fn video_admin_operations() {
        let (dashboard, repos) = dashboard();
        let upload = |name: &str| VideoUpload {
            file_name: format!("{name}.mp4"),
            content_type: "video/mp4".into(),
            bytes: vec![1, 2],
            name: None,
        };

        let batch = dashboard
            .upload_portfolio(vec![upload("first"), upload("second")])
            .await;
        assert_eq!(batch.uploaded.len(), 2);
        let hero = dashboard.upload_hero(upload("hero")).await.unwrap();
        assert_eq!(repos.videos.hero().await.unwrap(), Some(hero));

        let video = &batch.uploaded[0];
        assert!(matches!(
            dashboard.rename_video(video.id, "   ").await,
            Err(ApiError::Validation(_))
        ));
        let renamed = dashboard.rename_video(video.id, "First dance").await.unwrap();
        assert_eq!(renamed.name, "First dance");

        assert_eq!(
            dashboard.delete_video(video.id).await.unwrap(),
            VideoDeletion::Removed
        );
        assert!(dashboard.delete_video(video.id).await.is_err());
        assert_eq!(repos.videos.portfolio().await.unwrap().len(), 1);
    }
}
