//! User accounts and their validated attributes.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Validation errors raised while building user attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email missing or malformed.
    #[error("invalid email")]
    InvalidEmail,
    /// Name blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Name longer than [`NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// National identifier does not have 11 digits.
    #[error("CPF must contain 11 digits")]
    InvalidNationalId,
    /// Role string not recognised.
    #[error("role must be one of ADMIN, GESTOR, PARTICIPANTE")]
    UnknownRole,
}

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Full access to every resource.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Runs communities and sessions.
    #[serde(rename = "GESTOR")]
    Manager,
    /// Joins communities and votes.
    #[serde(rename = "PARTICIPANTE")]
    Participant,
}

impl Role {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "GESTOR",
            Self::Participant => "PARTICIPANTE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "GESTOR" => Ok(Self::Manager),
            "PARTICIPANTE" => Ok(Self::Participant),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Brazilian individual taxpayer number (CPF), stored as 11 digits.
///
/// Punctuation is stripped on input so `123.456.789-01` and `12345678901`
/// refer to the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NationalId(String);

impl NationalId {
    /// Length of a CPF in digits.
    pub const DIGITS: usize = 11;

    /// Validate a CPF, accepting common punctuation.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let digits: String = raw
            .as_ref()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() != Self::DIGITS {
            return Err(UserValidationError::InvalidNationalId);
        }
        Ok(Self(digits))
    }

    /// The bare digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maximum length of a person's name.
pub const NAME_MAX: usize = 100;

/// Trimmed, non-empty display name of a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque password hash produced by a [`super::ports::PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash (PHC string).
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: Email,
    /// Credential hash.
    pub password_hash: PasswordHash,
    /// Access level.
    pub role: Role,
    /// Optional display name.
    pub name: Option<PersonName>,
    /// Optional CPF, unique when present.
    pub national_id: Option<NationalId>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Time of the most recent successful login.
    pub last_access: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Ana@Example.COM ", "ana@example.com")]
    #[case("x@y.io", "x@y.io")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Email::new(raw).expect("valid email").as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("plainaddress")]
    #[case("a@b")]
    #[case("two words@example.com")]
    fn email_rejects_malformed(#[case] raw: &str) {
        assert_eq!(Email::new(raw), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    #[case("123.456.789-01")]
    #[case("12345678901")]
    fn national_id_strips_punctuation(#[case] raw: &str) {
        assert_eq!(NationalId::new(raw).expect("valid cpf").as_str(), "12345678901");
    }

    #[rstest]
    #[case("1234567890")]
    #[case("123456789012")]
    #[case("abc")]
    fn national_id_requires_eleven_digits(#[case] raw: &str) {
        assert_eq!(NationalId::new(raw), Err(UserValidationError::InvalidNationalId));
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Manager)]
    #[case(Role::Participant)]
    fn role_string_round_trips(#[case] role: Role) {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }

    #[rstest]
    fn role_serializes_with_portuguese_names() {
        let json = serde_json::to_value(Role::Manager).expect("serialize");
        assert_eq!(json, serde_json::json!("GESTOR"));
    }

    #[rstest]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(PersonName::new("  Ana  ").expect("valid").as_str(), "Ana");
        assert_eq!(PersonName::new(" "), Err(UserValidationError::EmptyName));
        assert_eq!(
            PersonName::new("a".repeat(NAME_MAX + 1)),
            Err(UserValidationError::NameTooLong { max: NAME_MAX })
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
