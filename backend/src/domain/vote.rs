//! Votes and the denormalised views returned to callers.

use chrono::{DateTime, Utc};

use super::{NationalId, ProjectId, SessionId, UserId, VoteId};

/// Maximum comment length, in characters.
pub const COMMENT_MAX: usize = 500;

/// Validation errors for vote attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteValidationError {
    /// Comment longer than [`COMMENT_MAX`].
    #[error("comment must be at most {max} characters")]
    CommentTooLong {
        /// Upper bound in characters.
        max: usize,
    },
}

/// Normalise an optional comment: blank becomes `None`.
pub fn normalise_comment(raw: Option<&str>) -> Result<Option<String>, VoteValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > COMMENT_MAX {
        return Err(VoteValidationError::CommentTooLong { max: COMMENT_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}

/// One participant's choice within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Identifier.
    pub id: VoteId,
    /// Voter.
    pub user_id: UserId,
    /// Session voted in; at most one vote per (user, session).
    pub session_id: SessionId,
    /// Chosen project.
    pub project_id: ProjectId,
    /// Optional remark.
    pub comment: Option<String>,
    /// When the vote was cast or last changed.
    pub cast_at: DateTime<Utc>,
}

/// A vote joined with the voter, project and session it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteView {
    /// The vote.
    pub vote: Vote,
    /// Voter's name, if set.
    pub voter_name: Option<String>,
    /// Voter's email.
    pub voter_email: String,
    /// Voter's CPF, if set.
    pub voter_national_id: Option<NationalId>,
    /// Title of the chosen project.
    pub project_title: String,
    /// Title of the session.
    pub session_title: String,
}
