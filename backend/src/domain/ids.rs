//! UUID-backed identifiers for the domain aggregates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $kind })
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId => "user id"
);
define_id!(
    /// Identifier of a community.
    CommunityId => "community id"
);
define_id!(
    /// Identifier of a voting session.
    SessionId => "session id"
);
define_id!(
    /// Identifier of a project competing within a session.
    ProjectId => "project id"
);
define_id!(
    /// Identifier of a cast vote.
    VoteId => "vote id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_and_displays_the_same_uuid() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: SessionId = raw.parse().expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("42")]
    fn rejects_malformed_values(#[case] raw: &str) {
        let err = raw.parse::<VoteId>().expect_err("invalid id");
        assert_eq!(err.to_string(), "vote id must be a valid UUID");
    }

    #[rstest]
    fn serializes_as_plain_string() {
        let id = ProjectId::from_uuid(Uuid::nil());
        let json = serde_json::to_value(id).expect("serialize");
        assert_eq!(json, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
