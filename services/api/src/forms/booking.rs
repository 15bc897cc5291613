use common::models::{BookingRecord, NewBooking};
use serde::{Deserialize, Serialize};

use super::{Form, validation};
use crate::error::ApiResult;

/// Details step of the booking flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingFields {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub wedding_date: String,
    pub venue: String,
    pub package: String,
    pub guest_count: String,
    pub ceremony_time: String,
    pub reception_time: String,
    pub budget: String,
    pub referral_source: String,
    pub special_requests: String,
}

impl BookingFields {
    /// The extra details folded into the booking message, one labelled line
    /// each, in a fixed order
    pub fn compose_message(&self) -> String {
        [
            ("Package", &self.package),
            ("Venue", &self.venue),
            ("Guest Count", &self.guest_count),
            ("Ceremony", &self.ceremony_time),
            ("Reception", &self.reception_time),
            ("Budget", &self.budget),
            ("Referral", &self.referral_source),
            ("Special Requests", &self.special_requests),
        ]
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Form for BookingFields {
    type Record = BookingRecord;

    fn validate(&self) -> ApiResult<NewBooking> {
        let client_name = validation::required("Name", &self.client_name)?;
        let email = validation::required("Email", &self.email)?;
        validation::email(&email)?;
        let phone = validation::required("Phone", &self.phone)?;
        let wedding_date = validation::required("Wedding date", &self.wedding_date)?;

        Ok(NewBooking {
            client_name,
            email,
            phone,
            wedding_date: validation::iso_date("Wedding date", &wedding_date)?,
            message: Some(self.compose_message()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::NaiveDate;

    fn fields() -> BookingFields {
        BookingFields {
            client_name: "Ana & Ben".into(),
            email: "ana@example.com".into(),
            phone: "555-0100".into(),
            wedding_date: "2030-09-14".into(),
            ..Default::default()
        }
    }

    #[test]
    fn message_uses_fixed_labelled_layout() {
        let mut fields = fields();
        fields.package = "premium".into();
        fields.venue = "Lakeside Barn".into();
        fields.guest_count = "120".into();
        fields.ceremony_time = "15:00".into();
        fields.reception_time = "18:00".into();
        fields.budget = "$5k".into();
        fields.referral_source = "instagram".into();
        fields.special_requests = "Drone shots".into();

        assert_eq!(
            fields.compose_message(),
            "Package: premium\nVenue: Lakeside Barn\nGuest Count: 120\nCeremony: 15:00\n\
             Reception: 18:00\nBudget: $5k\nReferral: instagram\nSpecial Requests: Drone shots"
        );
    }

    #[test]
    fn empty_details_keep_their_labels() {
        let message = fields().compose_message();
        assert_eq!(message.lines().count(), 8);
        assert!(message.starts_with("Package: \nVenue: "));
    }

    #[test]
    fn validates_into_pending_booking_shape() {
        let draft = fields().validate().unwrap();
        assert_eq!(draft.wedding_date, NaiveDate::from_ymd_opt(2030, 9, 14).unwrap());
        assert!(draft.message.unwrap().contains("Guest Count: "));
    }

    #[test]
    fn every_required_field_is_checked() {
        for blank in ["client_name", "email", "phone", "wedding_date"] {
            let mut fields = fields();
            match blank {
                "client_name" => fields.client_name = " ".into(),
                "email" => fields.email = String::new(),
                "phone" => fields.phone = "\t".into(),
                _ => fields.wedding_date = String::new(),
            }
            assert!(
                matches!(fields.validate(), Err(ApiError::Validation(_))),
                "{blank} should be required"
            );
        }
    }
}
