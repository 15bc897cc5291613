//! "Call me back" requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    CallbackStatus as "callback status" {
        Pending => "pending",
        Called => "called",
        Completed => "completed",
    }
}

impl CallbackStatus {
    /// Next step of `pending → called → completed`, if any
    pub fn next(&self) -> Option<CallbackStatus> {
        match self {
            CallbackStatus::Pending => Some(CallbackStatus::Called),
            CallbackStatus::Called => Some(CallbackStatus::Completed),
            CallbackStatus::Completed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackRequest {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub best_time: Option<String>,
    pub status: CallbackStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; requests always start `pending`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCallbackRequest {
    pub name: String,
    pub phone: String,
    pub best_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackChanges {
    pub status: Option<CallbackStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackFilter {
    pub status: Option<CallbackStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_steps_forward_once_at_a_time() {
        assert_eq!(CallbackStatus::Pending.next(), Some(CallbackStatus::Called));
        assert_eq!(CallbackStatus::Called.next(), Some(CallbackStatus::Completed));
        assert_eq!(CallbackStatus::Completed.next(), None);
    }
}
