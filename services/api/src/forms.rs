//! Form controllers
//!
//! A form holds the raw text fields a visitor typed. Submitting validates
//! them into a create shape, inserts it through the matching repository and
//! clears the fields once the insert succeeds. Failed submissions keep the
//! fields so they can be corrected.

use common::store::Record;

use crate::error::ApiResult;
use crate::repositories::Repository;

pub mod booking;
pub mod callback;
pub mod contact;
pub mod validation;

pub use booking::BookingFields;
pub use callback::CallbackFields;
pub use contact::ContactFields;

/// Raw fields of one form
pub trait Form: Default {
    type Record: Record;

    /// Check the fields and build the create shape; no backend call happens
    /// when this fails
    fn validate(&self) -> ApiResult<<Self::Record as Record>::Draft>;
}

/// Submit / reset handling shared by every form
#[derive(Debug, Clone, Default)]
pub struct FormController<F: Form> {
    pub fields: F,
    submitting: bool,
}

impl<F: Form> FormController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(fields: F) -> Self {
        Self {
            fields,
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn reset(&mut self) {
        self.fields = F::default();
    }

    pub async fn submit(&mut self, repository: &Repository<F::Record>) -> ApiResult<F::Record> {
        let draft = self.fields.validate()?;

        self.submitting = true;
        let result = repository.create(draft).await;
        self.submitting = false;

        let record = result?;
        self.reset();
        Ok(record)
    }
}
