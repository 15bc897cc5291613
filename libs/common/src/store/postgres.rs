//! PostgreSQL implementation of the record tables

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use super::{Record, Table};
use crate::error::{BackendError, BackendResult};
use crate::models::{
    BookingChanges, BookingFilter, BookingRecord, CalendarChanges, CalendarFilter, CalendarRecord,
    CallbackChanges, CallbackFilter, CallbackRequest, ContactFormChanges, ContactFormFilter,
    ContactFormRecord, NewBooking, NewCalendarEntry, NewCallbackRequest, NewContactForm, NewVideo,
    UnknownValue, VideoChanges, VideoFilter, VideoRecord,
};

const VIDEO_COLUMNS: &str = "id, name, file_path, video_type, created_at, updated_at";
const CALENDAR_COLUMNS: &str = "id, date, status, notes, created_at, updated_at";
const BOOKING_COLUMNS: &str =
    "id, client_name, email, phone, wedding_date, status, message, created_at";
const CONTACT_COLUMNS: &str =
    "id, name, phone, email, wedding_date, venue, message, status, created_at";
const CALLBACK_COLUMNS: &str = "id, name, phone, best_time, status, created_at";

/// Record tables stored in PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> BackendResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(BackendError::Query)?;

        if result.rows_affected() == 0 {
            debug!(table, %id, "Delete matched no rows");
        }

        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, table: &'static str, name: &str) -> BackendResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| BackendError::Decode {
        table,
        reason: e.to_string(),
    })
}

fn text_column<T>(row: &PgRow, table: &'static str, name: &str) -> BackendResult<T>
where
    T: FromStr<Err = UnknownValue>,
{
    let raw: String = column(row, table, name)?;
    raw.parse().map_err(|e: UnknownValue| BackendError::Decode {
        table,
        reason: e.to_string(),
    })
}

fn video_from_row(row: &PgRow) -> BackendResult<VideoRecord> {
    let t = VideoRecord::TABLE;
    Ok(VideoRecord {
        id: column(row, t, "id")?,
        name: column(row, t, "name")?,
        file_path: column(row, t, "file_path")?,
        video_type: text_column(row, t, "video_type")?,
        created_at: column(row, t, "created_at")?,
        updated_at: column(row, t, "updated_at")?,
    })
}

fn calendar_from_row(row: &PgRow) -> BackendResult<CalendarRecord> {
    let t = CalendarRecord::TABLE;
    Ok(CalendarRecord {
        id: column(row, t, "id")?,
        date: column(row, t, "date")?,
        status: text_column(row, t, "status")?,
        notes: column(row, t, "notes")?,
        created_at: column(row, t, "created_at")?,
        updated_at: column(row, t, "updated_at")?,
    })
}

fn booking_from_row(row: &PgRow) -> BackendResult<BookingRecord> {
    let t = BookingRecord::TABLE;
    Ok(BookingRecord {
        id: column(row, t, "id")?,
        client_name: column(row, t, "client_name")?,
        email: column(row, t, "email")?,
        phone: column(row, t, "phone")?,
        wedding_date: column(row, t, "wedding_date")?,
        status: text_column(row, t, "status")?,
        message: column(row, t, "message")?,
        created_at: column(row, t, "created_at")?,
    })
}

fn contact_from_row(row: &PgRow) -> BackendResult<ContactFormRecord> {
    let t = ContactFormRecord::TABLE;
    Ok(ContactFormRecord {
        id: column(row, t, "id")?,
        name: column(row, t, "name")?,
        phone: column(row, t, "phone")?,
        email: column(row, t, "email")?,
        wedding_date: column(row, t, "wedding_date")?,
        venue: column(row, t, "venue")?,
        message: column(row, t, "message")?,
        status: text_column(row, t, "status")?,
        created_at: column(row, t, "created_at")?,
    })
}

fn callback_from_row(row: &PgRow) -> BackendResult<CallbackRequest> {
    let t = CallbackRequest::TABLE;
    Ok(CallbackRequest {
        id: column(row, t, "id")?,
        name: column(row, t, "name")?,
        phone: column(row, t, "phone")?,
        best_time: column(row, t, "best_time")?,
        status: text_column(row, t, "status")?,
        created_at: column(row, t, "created_at")?,
    })
}

fn required<R: Record>(row: Option<R>, id: Uuid) -> BackendResult<R> {
    row.ok_or(BackendError::NotFound {
        table: R::TABLE,
        id,
    })
}

#[async_trait]
impl Table<VideoRecord> for PgStore {
    async fn insert(&self, draft: NewVideo) -> BackendResult<VideoRecord> {
        let row = sqlx::query(&format!(
            "INSERT INTO videos (name, file_path, video_type) VALUES ($1, $2, $3) \
             RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.file_path)
        .bind(draft.video_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        video_from_row(&row)
    }

    async fn select(&self, filter: &VideoFilter) -> BackendResult<Vec<VideoRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos \
             WHERE ($1::text IS NULL OR video_type = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.video_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        rows.iter().map(video_from_row).collect()
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<VideoRecord>> {
        let row = sqlx::query(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(BackendError::Query)?;

        row.as_ref().map(video_from_row).transpose()
    }

    async fn update(&self, id: Uuid, changes: VideoChanges) -> BackendResult<VideoRecord> {
        let row = sqlx::query(&format!(
            "UPDATE videos SET name = COALESCE($2, name), updated_at = NOW() \
             WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        required(row.as_ref().map(video_from_row).transpose()?, id)
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.delete_by_id(VideoRecord::TABLE, id).await
    }
}

#[async_trait]
impl Table<CalendarRecord> for PgStore {
    async fn insert(&self, draft: NewCalendarEntry) -> BackendResult<CalendarRecord> {
        let row = sqlx::query(&format!(
            "INSERT INTO calendar (date, status, notes) VALUES ($1, $2, $3) \
             ON CONFLICT (date) DO UPDATE SET \
             status = EXCLUDED.status, \
             notes = COALESCE(EXCLUDED.notes, calendar.notes), \
             updated_at = NOW() \
             RETURNING {CALENDAR_COLUMNS}"
        ))
        .bind(draft.date)
        .bind(draft.status.as_str())
        .bind(draft.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        calendar_from_row(&row)
    }

    async fn select(&self, filter: &CalendarFilter) -> BackendResult<Vec<CalendarRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {CALENDAR_COLUMNS} FROM calendar \
             WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2) \
             ORDER BY date"
        ))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        rows.iter().map(calendar_from_row).collect()
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<CalendarRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {CALENDAR_COLUMNS} FROM calendar WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        row.as_ref().map(calendar_from_row).transpose()
    }

    async fn update(&self, id: Uuid, changes: CalendarChanges) -> BackendResult<CalendarRecord> {
        let row = sqlx::query(&format!(
            "UPDATE calendar SET status = COALESCE($2, status), \
             notes = CASE WHEN $4 THEN NULL ELSE COALESCE($3, notes) END, \
             updated_at = NOW() WHERE id = $1 RETURNING {CALENDAR_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.notes)
        .bind(changes.clear_notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        required(row.as_ref().map(calendar_from_row).transpose()?, id)
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.delete_by_id(CalendarRecord::TABLE, id).await
    }
}

#[async_trait]
impl Table<BookingRecord> for PgStore {
    async fn insert(&self, draft: NewBooking) -> BackendResult<BookingRecord> {
        let row = sqlx::query(&format!(
            "INSERT INTO bookings (client_name, email, phone, wedding_date, status, message) \
             VALUES ($1, $2, $3, $4, 'pending', $5) RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(&draft.client_name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(draft.wedding_date)
        .bind(draft.message)
        .fetch_one(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        booking_from_row(&row)
    }

    async fn select(&self, filter: &BookingFilter) -> BackendResult<Vec<BookingRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<BookingRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn update(&self, id: Uuid, changes: BookingChanges) -> BackendResult<BookingRecord> {
        let row = sqlx::query(&format!(
            "UPDATE bookings SET status = COALESCE($2, status) \
             WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        required(row.as_ref().map(booking_from_row).transpose()?, id)
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.delete_by_id(BookingRecord::TABLE, id).await
    }
}

#[async_trait]
impl Table<ContactFormRecord> for PgStore {
    async fn insert(&self, draft: NewContactForm) -> BackendResult<ContactFormRecord> {
        let row = sqlx::query(&format!(
            "INSERT INTO contact_forms (name, phone, email, wedding_date, venue, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'new') RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(draft.email)
        .bind(draft.wedding_date)
        .bind(draft.venue)
        .bind(draft.message)
        .fetch_one(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        contact_from_row(&row)
    }

    async fn select(&self, filter: &ContactFormFilter) -> BackendResult<Vec<ContactFormRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_forms \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        rows.iter().map(contact_from_row).collect()
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<ContactFormRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_forms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        row.as_ref().map(contact_from_row).transpose()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ContactFormChanges,
    ) -> BackendResult<ContactFormRecord> {
        let row = sqlx::query(&format!(
            "UPDATE contact_forms SET status = COALESCE($2, status) \
             WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        required(row.as_ref().map(contact_from_row).transpose()?, id)
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.delete_by_id(ContactFormRecord::TABLE, id).await
    }
}

#[async_trait]
impl Table<CallbackRequest> for PgStore {
    async fn insert(&self, draft: NewCallbackRequest) -> BackendResult<CallbackRequest> {
        let row = sqlx::query(&format!(
            "INSERT INTO callback_requests (name, phone, best_time, status) \
             VALUES ($1, $2, $3, 'pending') RETURNING {CALLBACK_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(draft.best_time)
        .fetch_one(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        callback_from_row(&row)
    }

    async fn select(&self, filter: &CallbackFilter) -> BackendResult<Vec<CallbackRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {CALLBACK_COLUMNS} FROM callback_requests \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        rows.iter().map(callback_from_row).collect()
    }

    async fn fetch(&self, id: Uuid) -> BackendResult<Option<CallbackRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {CALLBACK_COLUMNS} FROM callback_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        row.as_ref().map(callback_from_row).transpose()
    }

    async fn update(&self, id: Uuid, changes: CallbackChanges) -> BackendResult<CallbackRequest> {
        let row = sqlx::query(&format!(
            "UPDATE callback_requests SET status = COALESCE($2, status) \
             WHERE id = $1 RETURNING {CALLBACK_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(BackendError::Query)?;

        required(row.as_ref().map(callback_from_row).transpose()?, id)
    }

    async fn delete(&self, id: Uuid) -> BackendResult<()> {
        self.delete_by_id(CallbackRequest::TABLE, id).await
    }
}
