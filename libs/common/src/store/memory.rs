//! In-process record tables
//!
//! Mirrors what the PostgreSQL tables do (server-assigned ids and
//! timestamps, upsert of calendar dates, newest-first listings) without a
//! database. Used by the `memory` backend and throughout the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Record, Table};
use crate::error::{BackendError, BackendResult};
use crate::models::{
    BookingRecord, BookingStatus, CalendarRecord, CallbackRequest, CallbackStatus,
    ContactFormRecord, ContactStatus, VideoRecord,
};

/// How a record kind behaves inside a [`MemoryTable`]
pub trait MemoryRecord: Record {
    /// Build the stored row for a fresh insert
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self;

    /// Apply a partial update
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Whether an insert of `draft` should update this row instead
    fn conflicts_with(&self, _draft: &Self::Draft) -> bool {
        false
    }

    /// Fold a conflicting insert into this row
    fn merge(&mut self, draft: Self::Draft, now: DateTime<Utc>) {
        let id = self.id();
        *self = Self::materialize(draft, id, now);
    }
}

/// A table kept in process memory
pub struct MemoryTable<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: MemoryRecord> MemoryTable<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R: MemoryRecord> Default for MemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: MemoryRecord> Table<R> for MemoryTable<R> {
    async fn insert(&self, draft: R::Draft) -> BackendResult<R> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;

        if let Some(existing) = rows.iter_mut().find(|row| row.conflicts_with(&draft)) {
            existing.merge(draft, now);
            return Ok(existing.clone());
        }

        let row = R::materialize(draft, Uuid::new_v4(), now);
        rows.push(row.clone());
        Ok(row)
    }

    async fn select(&self, filter: &R::Filter) -> BackendResult<Vec<R>> {
        let rows = self.rows.read().await;

        if !R::NEWEST_FIRST {
            return Ok(rows.iter().filter(|r| r.matches(filter)).cloned().collect());
        }

        // Reverse insertion order first so rows sharing a timestamp still
        // come back newest first after the stable sort.
        let mut matching: Vec<R> = rows
            .iter()
            .rev()
            .filter(|r| r.matches(filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<R>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: R::Changes) -> BackendResult<R> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(BackendError::NotFound {
                table: R::TABLE,
                id,
            })?;

        row.apply(changes, Utc::now());
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.rows.write().await.retain(|row| row.id() != id);
        Ok(())
    }
}

impl MemoryRecord for VideoRecord {
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self {
        VideoRecord {
            id,
            name: draft.name,
            file_path: draft.file_path,
            video_type: draft.video_type,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.video_type.is_none_or(|t| t == self.video_type)
    }
}

impl MemoryRecord for CalendarRecord {
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self {
        CalendarRecord {
            id,
            date: draft.date,
            status: draft.status,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>) {
        if let Some(status) = changes.status {
            self.status = status;
        }
        if changes.clear_notes {
            self.notes = None;
        } else if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.contains(self.date)
    }

    fn conflicts_with(&self, draft: &Self::Draft) -> bool {
        self.date == draft.date
    }

    fn merge(&mut self, draft: Self::Draft, now: DateTime<Utc>) {
        self.status = draft.status;
        if draft.notes.is_some() {
            self.notes = draft.notes;
        }
        self.updated_at = now;
    }
}

impl MemoryRecord for BookingRecord {
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self {
        BookingRecord {
            id,
            client_name: draft.client_name,
            email: draft.email,
            phone: draft.phone,
            wedding_date: draft.wedding_date,
            status: BookingStatus::Pending,
            message: draft.message,
            created_at: now,
        }
    }

    fn apply(&mut self, changes: Self::Changes, _now: DateTime<Utc>) {
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.status.is_none_or(|s| s == self.status)
    }
}

impl MemoryRecord for ContactFormRecord {
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self {
        ContactFormRecord {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            wedding_date: draft.wedding_date,
            venue: draft.venue,
            message: draft.message,
            status: ContactStatus::New,
            created_at: now,
        }
    }

    fn apply(&mut self, changes: Self::Changes, _now: DateTime<Utc>) {
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.status.is_none_or(|s| s == self.status)
    }
}

impl MemoryRecord for CallbackRequest {
    fn materialize(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self {
        CallbackRequest {
            id,
            name: draft.name,
            phone: draft.phone,
            best_time: draft.best_time,
            status: CallbackStatus::Pending,
            created_at: now,
        }
    }

    fn apply(&mut self, changes: Self::Changes, _now: DateTime<Utc>) {
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.status.is_none_or(|s| s == self.status)
    }
}
