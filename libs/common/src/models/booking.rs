//! Booking requests submitted from the public booking flow

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    BookingStatus as "booking status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Declined => "declined",
    }
}

impl BookingStatus {
    /// Transitions the admin dashboard offers: a pending request is either
    /// confirmed or declined, and decided requests stay decided.
    pub fn can_become(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Declined)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub wedding_date: NaiveDate,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; new bookings always start `pending`
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub wedding_date: NaiveDate,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChanges {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
}
