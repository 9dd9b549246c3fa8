//! Request validation helpers shared by the HTTP handlers.
//!
//! Handlers validate every field of a payload before calling a service and
//! report all failures at once: the messages are joined with `", "` into a
//! single `400` error, the same shape clients get for any other bad input.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::domain::Error;

/// Accepted timestamp layouts besides RFC 3339; interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Accumulates field-level validation messages.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    /// Keep the value or record the error message.
    pub(crate) fn check<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.messages.push(error.to_string());
                None
            }
        }
    }

    /// Validate an optional field; absent stays absent.
    pub(crate) fn check_opt<T, E: Display>(
        &mut self,
        result: Option<Result<T, E>>,
    ) -> Option<Option<T>> {
        match result {
            None => Some(None),
            Some(inner) => self.check(inner).map(Some),
        }
    }

    /// Record a failure that is not tied to a parser result.
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Fail with every recorded message, or hand back the checked values.
    pub(crate) fn finish<V: AllPresent>(self, values: V) -> Result<V::Output, Error> {
        if !self.messages.is_empty() {
            return Err(Error::invalid_request(self.messages.join(", ")));
        }
        values
            .all_present()
            .ok_or_else(|| Error::invalid_request("invalid request"))
    }
}

/// A tuple of checked fields that is complete only when every field is.
pub(crate) trait AllPresent {
    type Output;

    fn all_present(self) -> Option<Self::Output>;
}

macro_rules! impl_all_present {
    ($($name:ident),+) => {
        impl<$($name),+> AllPresent for ($(Option<$name>,)+) {
            type Output = ($($name,)+);

            #[expect(non_snake_case, reason = "bindings reuse the type parameter names")]
            fn all_present(self) -> Option<Self::Output> {
                let ($($name,)+) = self;
                Some(($($name?,)+))
            }
        }
    };
}

impl_all_present!(A);
impl_all_present!(A, B);
impl_all_present!(A, B, C);
impl_all_present!(A, B, C, D);
impl_all_present!(A, B, C, D, E);

/// Parse an RFC 3339 timestamp or a zone-less `YYYY-MM-DDTHH:MM[:SS]`.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("{field} must be an RFC 3339 timestamp or YYYY-MM-DDTHH:MM"))
}

/// Treat blank optional text as absent and trim the rest.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Deserialise a field that distinguishes "absent" from `null`.
///
/// Pair with `#[serde(default)]`: an absent field stays `None`, while a
/// present one (including `null`) becomes `Some`.
pub(crate) fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Turn a present-or-null text field into a change: blank and `null` clear.
pub(crate) fn clearable(raw: Option<Option<String>>) -> Option<Option<String>> {
    raw.map(non_blank)
}
