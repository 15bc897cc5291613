use common::models::{CallbackRequest, NewCallbackRequest};
use serde::{Deserialize, Serialize};

use super::{Form, validation};
use crate::error::ApiResult;

/// "Request a callback" panel on the contact page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackFields {
    pub name: String,
    pub phone: String,
    pub best_time: String,
}

impl Form for CallbackFields {
    type Record = CallbackRequest;

    fn validate(&self) -> ApiResult<NewCallbackRequest> {
        Ok(NewCallbackRequest {
            name: validation::required("Name", &self.name)?,
            phone: validation::required("Phone", &self.phone)?,
            best_time: validation::optional(&self.best_time),
        })
    }
}
