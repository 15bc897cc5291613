//! Table-oriented access to the backend
//!
//! [`Table`] is the query/insert/update/delete interface the record access
//! layer talks to. It is implemented by [`PgStore`] for the hosted
//! PostgreSQL database and by [`MemoryTable`] for local development and
//! tests. [`Backend`] bundles the five tables with the object storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::BackendResult;
use crate::models::{
    BookingChanges, BookingFilter, BookingRecord, CalendarChanges, CalendarFilter, CalendarRecord,
    CallbackChanges, CallbackFilter, CallbackRequest, ContactFormChanges, ContactFormFilter,
    ContactFormRecord, NewBooking, NewCalendarEntry, NewCallbackRequest, NewContactForm, NewVideo,
    VideoChanges, VideoFilter, VideoRecord,
};
use crate::storage::ObjectStorage;

pub mod memory;
pub mod postgres;

pub use memory::MemoryTable;
pub use postgres::PgStore;

/// A persisted record kind and the shapes used to write and query it
pub trait Record: Clone + Send + Sync + 'static {
    /// Backend table name
    const TABLE: &'static str;
    /// Whether listings come back newest first
    const NEWEST_FIRST: bool = true;

    /// Fields supplied on insert
    type Draft: Send + Sync + 'static;
    /// Partial update; `None` fields are left untouched
    type Changes: Send + Sync + 'static;
    /// Listing filter; the default matches every row
    type Filter: Default + Send + Sync + 'static;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Generic table interface: every call is a single request to the backend
#[async_trait]
pub trait Table<R: Record>: Send + Sync {
    /// Insert one row and return it as stored, with server-assigned fields
    async fn insert(&self, draft: R::Draft) -> BackendResult<R>;

    /// Rows matching `filter`
    async fn select(&self, filter: &R::Filter) -> BackendResult<Vec<R>>;

    /// Row by primary key
    async fn fetch(&self, id: Uuid) -> BackendResult<Option<R>>;

    /// Partial update by primary key; fails with `NotFound` when absent
    async fn update(&self, id: Uuid, changes: R::Changes) -> BackendResult<R>;

    /// Delete by primary key; deleting a missing row succeeds
    async fn delete(&self, id: Uuid) -> BackendResult<()>;
}

impl Record for VideoRecord {
    const TABLE: &'static str = "videos";
    type Draft = NewVideo;
    type Changes = VideoChanges;
    type Filter = VideoFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for CalendarRecord {
    const TABLE: &'static str = "calendar";
    const NEWEST_FIRST: bool = false;
    type Draft = NewCalendarEntry;
    type Changes = CalendarChanges;
    type Filter = CalendarFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for BookingRecord {
    const TABLE: &'static str = "bookings";
    type Draft = NewBooking;
    type Changes = BookingChanges;
    type Filter = BookingFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for ContactFormRecord {
    const TABLE: &'static str = "contact_forms";
    type Draft = NewContactForm;
    type Changes = ContactFormChanges;
    type Filter = ContactFormFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for CallbackRequest {
    const TABLE: &'static str = "callback_requests";
    type Draft = NewCallbackRequest;
    type Changes = CallbackChanges;
    type Filter = CallbackFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// The five record tables plus the video bucket
#[derive(Clone)]
pub struct Backend {
    pub videos: Arc<dyn Table<VideoRecord>>,
    pub calendar: Arc<dyn Table<CalendarRecord>>,
    pub bookings: Arc<dyn Table<BookingRecord>>,
    pub contact_forms: Arc<dyn Table<ContactFormRecord>>,
    pub callback_requests: Arc<dyn Table<CallbackRequest>>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl Backend {
    /// Tables backed by PostgreSQL
    pub fn postgres(pool: PgPool, storage: Arc<dyn ObjectStorage>) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            videos: store.clone(),
            calendar: store.clone(),
            bookings: store.clone(),
            contact_forms: store.clone(),
            callback_requests: store,
            storage,
        }
    }

    /// Process-local tables; contents vanish on restart
    pub fn in_memory(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            videos: Arc::new(MemoryTable::<VideoRecord>::new()),
            calendar: Arc::new(MemoryTable::<CalendarRecord>::new()),
            bookings: Arc::new(MemoryTable::<BookingRecord>::new()),
            contact_forms: Arc::new(MemoryTable::<ContactFormRecord>::new()),
            callback_requests: Arc::new(MemoryTable::<CallbackRequest>::new()),
            storage,
        }
    }
}
