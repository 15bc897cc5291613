//! General inquiries from the contact forms

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    ContactStatus as "contact status" {
        New => "new",
        Contacted => "contacted",
        Converted => "converted",
        Declined => "declined",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFormRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub message: Option<String>,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; inquiries always start as `new`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContactForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFormChanges {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFormFilter {
    pub status: Option<ContactStatus>,
}
