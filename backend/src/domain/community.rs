//! Communities, their invite codes and memberships.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{CommunityId, UserId};

/// Minimum length of a community name.
pub const COMMUNITY_NAME_MIN: usize = 3;
/// Maximum length of a community name.
pub const COMMUNITY_NAME_MAX: usize = 100;
/// Shortest code accepted when joining.
pub const INVITE_CODE_MIN: usize = 6;

/// Validation errors for community attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommunityValidationError {
    /// Name shorter than [`COMMUNITY_NAME_MIN`].
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Lower bound in characters.
        min: usize,
    },
    /// Name longer than [`COMMUNITY_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// Code too short or contains non-alphanumeric characters.
    #[error("invite code must have at least {min} letters or digits")]
    InvalidInviteCode {
        /// Lower bound in characters.
        min: usize,
    },
}

/// Trimmed community name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityName(String);

impl CommunityName {
    /// Validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CommunityValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < COMMUNITY_NAME_MIN {
            return Err(CommunityValidationError::NameTooShort {
                min: COMMUNITY_NAME_MIN,
            });
        }
        if length > COMMUNITY_NAME_MAX {
            return Err(CommunityValidationError::NameTooLong {
                max: COMMUNITY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Code that grants membership of a community.
///
/// Issued codes are eight upper-case hexadecimal characters. Codes typed by
/// people are trimmed and upper-cased before lookup.
///
/// # Examples
/// ```
/// use votecerto::domain::InviteCode;
///
/// assert_eq!(InviteCode::from_bytes([0xde, 0xad, 0xbe, 0xef]).as_str(), "DEADBEEF");
/// assert_eq!(InviteCode::parse(" deadbeef ").unwrap().as_str(), "DEADBEEF");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InviteCode(String);

impl InviteCode {
    /// Encode four random bytes as a fresh code.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    /// Normalise a code entered by a person.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CommunityValidationError> {
        let normalised = raw.as_ref().trim().to_uppercase();
        let valid = normalised.chars().count() >= INVITE_CODE_MIN
            && normalised.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(CommunityValidationError::InvalidInviteCode {
                min: INVITE_CODE_MIN,
            });
        }
        Ok(Self(normalised))
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named group of users sharing sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// Identifier.
    pub id: CommunityId,
    /// Unique name.
    pub name: CommunityName,
    /// Free-form description.
    pub description: Option<String>,
    /// Unique invite code.
    pub invite_code: InviteCode,
    /// Manager or admin who created it.
    pub creator_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A community with its aggregate counters, as listed to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunitySummary {
    /// The community itself.
    pub community: Community,
    /// Number of members.
    pub member_count: u64,
    /// Number of sessions scoped to it.
    pub session_count: u64,
}

/// Membership of a user in a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Member.
    pub user_id: UserId,
    /// Community joined.
    pub community_id: CommunityId,
    /// Join time.
    pub joined_at: DateTime<Utc>,
}

/// Member as shown in a community detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member id.
    pub user_id: UserId,
    /// Member name, if set.
    pub name: Option<String>,
    /// Member email.
    pub email: String,
    /// Join time.
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([0, 0, 0, 0], "00000000")]
    #[case([0x0a, 0xbc, 0x12, 0xff], "0ABC12FF")]
    fn issued_codes_are_eight_upper_hex(#[case] bytes: [u8; 4], #[case] expected: &str) {
        let code = InviteCode::from_bytes(bytes);
        assert_eq!(code.as_str(), expected);
        assert_eq!(code.as_str().len(), 8);
    }

    #[rstest]
    #[case("abc12")]
    #[case("      ")]
    #[case("AB-CD-EF")]
    fn parse_rejects_short_or_symbolic_codes(#[case] raw: &str) {
        assert_eq!(
            InviteCode::parse(raw),
            Err(CommunityValidationError::InvalidInviteCode {
                min: INVITE_CODE_MIN
            })
        );
    }

    #[rstest]
    #[case("ab", Err(CommunityValidationError::NameTooShort { min: COMMUNITY_NAME_MIN }))]
    #[case("  Bairro Novo ", Ok("Bairro Novo"))]
    fn name_bounds(
        #[case] raw: &str,
        #[case] expected: Result<&str, CommunityValidationError>,
    ) {
        let result = CommunityName::new(raw);
        assert_eq!(result.as_ref().map(CommunityName::as_str), expected.as_ref().copied());
    }

    #[rstest]
    fn name_upper_bound() {
        let raw = "x".repeat(COMMUNITY_NAME_MAX + 1);
        assert_eq!(
            CommunityName::new(raw),
            Err(CommunityValidationError::NameTooLong {
                max: COMMUNITY_NAME_MAX
            })
        );
    }
}
