//! Record access layer
//!
//! One repository per record kind, each a thin wrapper over a backend
//! [`Table`] that reports the state of its most recent call. Nothing is
//! cached: every call goes to the backend.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use common::{
    calendar::Overrides,
    error::BackendResult,
    models::{
        BookingChanges, BookingRecord, BookingStatus, CalendarFilter, CalendarRecord,
        CalendarStatus, CallbackChanges, CallbackRequest, CallbackStatus, ContactFormChanges,
        ContactFormRecord, ContactStatus, NewCalendarEntry,
    },
    store::{Backend, Record, Table},
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::error;
use uuid::Uuid;

pub mod videos;

pub use videos::{UploadBatch, VideoDeletion, VideoRepository, VideoUpload};

/// Loading / error flags of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallState {
    /// At least one call is in flight
    pub loading: bool,
    /// Calls started and not yet finished
    pub in_flight: usize,
    /// Message of the last failed call; cleared when a new call begins
    pub error: Option<String>,
}

/// Publishes the [`CallState`] of the calls run through it
#[derive(Debug, Clone)]
pub struct CallTracker {
    state: Arc<watch::Sender<CallState>>,
}

impl CallTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CallState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> CallState {
        self.state.borrow().clone()
    }

    /// Watch state changes as they happen
    pub fn subscribe(&self) -> watch::Receiver<CallState> {
        self.state.subscribe()
    }

    /// Run `call`, flagging loading until every overlapping call is done.
    /// A failure is recorded when it happens; a success leaves the error of
    /// another call alone.
    pub async fn track<T, F>(&self, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        self.state.send_modify(|state| {
            state.in_flight += 1;
            state.loading = true;
            state.error = None;
        });
        let _finished = Finished { state: &self.state };

        let result = call.await;

        if let Err(e) = &result {
            let message = e.to_string();
            self.state.send_modify(|state| state.error = Some(message));
        }

        result
    }
}

/// Closes out one tracked call, also when its future is dropped early
struct Finished<'a> {
    state: &'a watch::Sender<CallState>,
}

impl Drop for Finished<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.loading = state.in_flight > 0;
        });
    }
}

impl Default for CallTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// create / list / find / update / delete for one record kind
#[derive(Clone)]
pub struct Repository<R: Record> {
    table: Arc<dyn Table<R>>,
    tracker: CallTracker,
}

pub type CalendarRepository = Repository<CalendarRecord>;
pub type BookingRepository = Repository<BookingRecord>;
pub type ContactFormRepository = Repository<ContactFormRecord>;
pub type CallbackRepository = Repository<CallbackRequest>;

impl<R: Record> Repository<R> {
    pub fn new(table: Arc<dyn Table<R>>) -> Self {
        Self {
            table,
            tracker: CallTracker::new(),
        }
    }

    pub fn state(&self) -> CallState {
        self.tracker.snapshot()
    }

    pub fn tracker(&self) -> &CallTracker {
        &self.tracker
    }

    async fn tracked<T, F>(&self, operation: &str, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        let result = self.tracker.track(call).await;
        if let Err(e) = &result {
            error!(table = R::TABLE, "Failed to {}: {}", operation, e);
        }
        result
    }

    /// Insert and return the stored record
    pub async fn create(&self, draft: R::Draft) -> BackendResult<R> {
        self.tracked("create", self.table.insert(draft)).await
    }

    pub async fn list(&self, filter: &R::Filter) -> BackendResult<Vec<R>> {
        self.tracked("list", self.table.select(filter)).await
    }

    pub async fn list_all(&self) -> BackendResult<Vec<R>> {
        self.list(&R::Filter::default()).await
    }

    pub async fn find(&self, id: Uuid) -> BackendResult<Option<R>> {
        self.tracked("find", self.table.fetch(id)).await
    }

    pub async fn update(&self, id: Uuid, changes: R::Changes) -> BackendResult<R> {
        self.tracked("update", self.table.update(id, changes)).await
    }

    pub async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.tracked("delete", self.table.delete(id)).await
    }
}

impl Repository<CalendarRecord> {
    /// Upsert the status of one date; absent notes keep the stored ones
    pub async fn set_date(
        &self,
        date: NaiveDate,
        status: CalendarStatus,
        notes: Option<String>,
    ) -> BackendResult<CalendarRecord> {
        self.create(NewCalendarEntry {
            date,
            status,
            notes,
        })
        .await
    }

    /// Stored statuses inside `filter`, keyed by date
    pub async fn overrides(&self, filter: CalendarFilter) -> BackendResult<Overrides> {
        let records = self.list(&filter).await?;
        Ok(Overrides::from_records(&records))
    }
}

impl Repository<BookingRecord> {
    pub async fn set_status(&self, id: Uuid, status: BookingStatus) -> BackendResult<BookingRecord> {
        self.update(
            id,
            BookingChanges {
                status: Some(status),
            },
        )
        .await
    }
}

impl Repository<ContactFormRecord> {
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> BackendResult<ContactFormRecord> {
        self.update(
            id,
            ContactFormChanges {
                status: Some(status),
            },
        )
        .await
    }
}

impl Repository<CallbackRequest> {
    pub async fn set_status(
        &self,
        id: Uuid,
        status: CallbackStatus,
    ) -> BackendResult<CallbackRequest> {
        self.update(
            id,
            CallbackChanges {
                status: Some(status),
            },
        )
        .await
    }
}

/// Call state of every repository
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub videos: CallState,
    pub calendar: CallState,
    pub bookings: CallState,
    pub contact_forms: CallState,
    pub callbacks: CallState,
}

/// Every repository, built over one [`Backend`]
#[derive(Clone)]
pub struct Repositories {
    pub videos: VideoRepository,
    pub calendar: CalendarRepository,
    pub bookings: BookingRepository,
    pub contact_forms: ContactFormRepository,
    pub callbacks: CallbackRepository,
}

impl Repositories {
    pub fn new(backend: Backend) -> Self {
        Self {
            videos: VideoRepository::new(backend.videos, backend.storage),
            calendar: Repository::new(backend.calendar),
            bookings: Repository::new(backend.bookings),
            contact_forms: Repository::new(backend.contact_forms),
            callbacks: Repository::new(backend.callback_requests),
        }
    }

    pub fn activity(&self) -> Activity {
        Activity {
            videos: self.videos.state(),
            calendar: self.calendar.state(),
            bookings: self.bookings.state(),
            contact_forms: self.contact_forms.state(),
            callbacks: self.callbacks.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{
        error::BackendError,
        models::{BookingFilter, NewBooking, NewContactForm},
        storage::MemoryStorage,
    };

    fn repositories() -> Repositories {
        Repositories::new(Backend::in_memory(Arc::new(MemoryStorage::new(
            "https://cdn.test/videos",
        ))))
    }

    fn booking(name: &str) -> NewBooking {
        NewBooking {
            client_name: name.to_string(),
            email: "couple@example.com".to_string(),
            phone: "555-0100".to_string(),
            wedding_date: NaiveDate::from_ymd_opt(2030, 9, 14).unwrap(),
            message: None,
        }
    }

    /// A table whose every call fails
    struct Unreachable;

    #[async_trait]
    impl Table<BookingRecord> for Unreachable {
        async fn insert(&self, _draft: NewBooking) -> BackendResult<BookingRecord> {
            Err(BackendError::Configuration("backend unreachable".into()))
        }

        async fn select(&self, _filter: &BookingFilter) -> BackendResult<Vec<BookingRecord>> {
            Err(BackendError::Configuration("backend unreachable".into()))
        }

        async fn fetch(&self, _id: Uuid) -> BackendResult<Option<BookingRecord>> {
            Err(BackendError::Configuration("backend unreachable".into()))
        }

        async fn update(&self, _id: Uuid, _changes: BookingChanges) -> BackendResult<BookingRecord> {
            Err(BackendError::Configuration("backend unreachable".into()))
        }

        async fn delete(&self, _id: Uuid) -> BackendResult<()> {
            Err(BackendError::Configuration("backend unreachable".into()))
        }
    }

    #[tokio::test]
    async fn contact_form_defaults() {
        let repos = repositories();
        let stored = repos
            .contact_forms
            .create(NewContactForm {
                name: "Ana".to_string(),
                phone: "555-0101".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(stored.status, ContactStatus::New);
        assert!(stored.email.is_none());
        assert!(stored.wedding_date.is_none());
        assert!(stored.venue.is_none());
        assert!(stored.message.is_none());
    }

    #[tokio::test]
    async fn booking_status_update_shows_in_next_list() {
        let repos = repositories();
        let stored = repos.bookings.create(booking("Ana & Ben")).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);

        repos
            .bookings
            .set_status(stored.id, BookingStatus::Confirmed)
            .await
            .unwrap();

        let listed = repos.bookings.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn failures_are_kept_until_the_next_call() {
        let repo = BookingRepository::new(Arc::new(Unreachable));
        assert_eq!(repo.state(), CallState::default());

        let err = repo.list_all().await.unwrap_err();
        let state = repo.state();
        assert!(!state.loading);
        assert_eq!(state.error, Some(err.to_string()));

        let err = repo.create(booking("Ana")).await.unwrap_err();
        assert_eq!(repo.state().error, Some(err.to_string()));
    }

    #[tokio::test]
    async fn new_call_clears_previous_error() {
        let repos = repositories();
        let missing = repos
            .callbacks
            .set_status(Uuid::new_v4(), CallbackStatus::Called)
            .await
            .unwrap_err();
        assert!(missing.is_not_found());
        assert!(repos.callbacks.state().error.is_some());

        repos.callbacks.list_all().await.unwrap();
        assert!(repos.callbacks.state().error.is_none());
    }

    #[tokio::test]
    async fn loading_is_visible_while_in_flight() {
        let tracker = CallTracker::new();
        let mut rx = tracker.subscribe();

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let call = tokio::spawn({
            let tracker = tracker.clone();
            async move {
                tracker
                    .track(async move {
                        let _ = wait.await;
                        Ok::<_, BackendError>(())
                    })
                    .await
            }
        });

        rx.wait_for(|state| state.loading).await.unwrap();
        release.send(()).unwrap();
        call.await.unwrap().unwrap();
        assert!(!tracker.snapshot().loading);
    }

    #[tokio::test]
    async fn overlapping_calls_keep_loading_and_errors() {
        let tracker = CallTracker::new();
        let mut rx = tracker.subscribe();

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let slow = tokio::spawn({
            let tracker = tracker.clone();
            async move {
                tracker
                    .track(async move {
                        let _ = wait.await;
                        Err::<(), _>(BackendError::Storage("bucket offline".into()))
                    })
                    .await
            }
        });
        rx.wait_for(|state| state.loading).await.unwrap();

        tracker.track(async { Ok::<_, BackendError>(()) }).await.unwrap();
        let state = tracker.snapshot();
        assert!(state.loading);
        assert_eq!(state.in_flight, 1);

        release.send(()).unwrap();
        assert!(slow.await.unwrap().is_err());
        let state = tracker.snapshot();
        assert!(!state.loading);
        assert_eq!(state.in_flight, 0);
        assert_eq!(state.error.as_deref(), Some("Storage error: bucket offline"));

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let slow = tokio::spawn({
            let tracker = tracker.clone();
            async move {
                tracker
                    .track(async move {
                        let _ = wait.await;
                        Ok::<_, BackendError>(())
                    })
                    .await
            }
        });
        rx.wait_for(|state| state.in_flight == 1).await.unwrap();

        let failed = tracker
            .track(async { Err::<(), _>(BackendError::Configuration("no pool".into())) })
            .await;
        assert!(failed.is_err());

        release.send(()).unwrap();
        slow.await.unwrap().unwrap();
        assert_eq!(
            tracker.snapshot().error.as_deref(),
            Some("Backend configuration error: no pool")
        );
    }

    #[tokio::test]
    async fn dropped_call_stops_loading() {
        let tracker = CallTracker::new();
        let pending = tracker.track(std::future::pending::<BackendResult<()>>());
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(tracker.snapshot(), CallState::default());
    }

    #[tokio::test]
    async fn calendar_set_date_feeds_overrides() {
        let repos = repositories();
        let date = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        repos
            .calendar
            .set_date(date, CalendarStatus::Booked, Some("Smith wedding".into()))
            .await
            .unwrap();

        let overrides = repos
            .calendar
            .overrides(CalendarFilter::between(
                NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(overrides.get(date), Some(CalendarStatus::Booked));
        assert_eq!(overrides.len(), 1);
    }
}
