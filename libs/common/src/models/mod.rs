//! Record types persisted by the backend
//!
//! Each record kind lives in its own module together with its status
//! enumeration and the shapes used to create, partially update and filter
//! rows of that kind.

use thiserror::Error;

pub mod booking;
pub mod calendar;
pub mod callback;
pub mod contact;
pub mod video;

pub use booking::{BookingChanges, BookingFilter, BookingRecord, BookingStatus, NewBooking};
pub use calendar::{
    CalendarChanges, CalendarFilter, CalendarRecord, CalendarStatus, NewCalendarEntry,
};
pub use callback::{
    CallbackChanges, CallbackFilter, CallbackRequest, CallbackStatus, NewCallbackRequest,
};
pub use contact::{
    ContactFormChanges, ContactFormFilter, ContactFormRecord, ContactStatus, NewContactForm,
};
pub use video::{NewVideo, VideoCategory, VideoChanges, VideoFilter, VideoRecord};

/// A stored text value that is not part of its enumeration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a lowercase text enumeration stored as `TEXT` in the database.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::models::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

/// Maps blank strings to `None`, trimming the rest.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_their_own_text() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), *status);
        }
        for status in CalendarStatus::ALL {
            assert_eq!(status.to_string().parse::<CalendarStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "archived".parse::<ContactStatus>().unwrap_err();
        assert_eq!(err.kind, "contact status");
        assert_eq!(err.to_string(), "unknown contact status 'archived'");
    }

    #[test]
    fn non_blank_drops_whitespace_only_values() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(
            non_blank(Some(" Lakeside Barn ".to_string())),
            Some("Lakeside Barn".to_string())
        );
    }
}
