use common::models::{ContactFormRecord, NewContactForm};
use serde::{Deserialize, Serialize};

use super::{Form, validation};
use crate::error::ApiResult;

/// The "get in touch" form on the home and contact pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub wedding_date: String,
    pub venue: String,
    pub message: String,
}

impl Form for ContactFields {
    type Record = ContactFormRecord;

    fn validate(&self) -> ApiResult<NewContactForm> {
        let name = validation::required("Name", &self.name)?;
        let phone = validation::required("Phone", &self.phone)?;

        let email = validation::optional(&self.email);
        if let Some(email) = &email {
            validation::email(email)?;
        }

        Ok(NewContactForm {
            name,
            phone,
            email,
            wedding_date: validation::optional_iso_date("Wedding date", &self.wedding_date)?,
            venue: validation::optional(&self.venue),
            message: validation::optional(&self.message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ApiError,
        forms::FormController,
        repositories::ContactFormRepository,
    };
    use chrono::NaiveDate;
    use common::{models::ContactStatus, store::MemoryTable};
    use std::sync::Arc;

    fn repository() -> ContactFormRepository {
        ContactFormRepository::new(Arc::new(MemoryTable::<ContactFormRecord>::new()))
    }

    #[test]
    fn blank_optionals_become_absent() {
        let fields = ContactFields {
            name: " Ana ".into(),
            phone: "555-0101".into(),
            email: "  ".into(),
            venue: "".into(),
            ..Default::default()
        };

        let draft = fields.validate().unwrap();
        assert_eq!(draft.name, "Ana");
        assert!(draft.email.is_none());
        assert!(draft.venue.is_none());
        assert!(draft.wedding_date.is_none());
        assert!(draft.message.is_none());
    }

    #[test]
    fn name_and_phone_are_required() {
        let fields = ContactFields {
            name: "Ana".into(),
            phone: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(fields.validate(), Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn submit_stores_and_resets() {
        let repo = repository();
        let mut form = FormController::with_fields(ContactFields {
            name: "Ana".into(),
            phone: "555-0101".into(),
            wedding_date: "2030-06-15".into(),
            venue: "Lakeside Barn".into(),
            ..Default::default()
        });

        let stored = form.submit(&repo).await.unwrap();
        assert_eq!(stored.status, ContactStatus::New);
        assert_eq!(stored.wedding_date, NaiveDate::from_ymd_opt(2030, 6, 15));
        assert_eq!(stored.venue.as_deref(), Some("Lakeside Barn"));
        assert_eq!(form.fields, ContactFields::default());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn invalid_submit_keeps_fields_and_skips_backend() {
        let repo = repository();
        let fields = ContactFields {
            name: "Ana".into(),
            phone: "555-0101".into(),
            wedding_date: "next june".into(),
            ..Default::default()
        };
        let mut form = FormController::with_fields(fields.clone());

        assert!(matches!(form.submit(&repo).await, Err(ApiError::Validation(_))));
        assert_eq!(form.fields, fields);
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
