//! Voting sessions and their live window.

use chrono::{DateTime, Utc};

use super::{CommunityId, SessionId, UserId};

/// Maximum length of session and project titles.
pub const TITLE_MAX: usize = 200;

/// Validation errors for session attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionValidationError {
    /// Title blank after trimming.
    #[error("title is required")]
    EmptyTitle,
    /// Title longer than [`TITLE_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// End precedes start.
    #[error("end date must not be before start date")]
    EndBeforeStart,
}

/// Trimmed, bounded title shared by sessions and projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Validate a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SessionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SessionValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(SessionValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Closed interval during which a session may accept votes.
///
/// ## Invariants
/// - `ends_at >= starts_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingWindow {
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl VotingWindow {
    /// Build a window, rejecting an end before the start.
    pub fn new(
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, SessionValidationError> {
        if ends_at < starts_at {
            return Err(SessionValidationError::EndBeforeStart);
        }
        Ok(Self { starts_at, ends_at })
    }

    /// Inclusive start.
    #[must_use]
    pub const fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Inclusive end.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Whether `now` falls within the window, bounds included.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}

/// A time-boxed voting event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingSession {
    /// Identifier.
    pub id: SessionId,
    /// Title shown to voters.
    pub title: Title,
    /// Free-form description.
    pub description: Option<String>,
    /// When votes are accepted.
    pub window: VotingWindow,
    /// Manual switch; a paused session accepts no votes.
    pub active: bool,
    /// Owning community; `None` for a global session.
    pub community_id: Option<CommunityId>,
    /// Manager or admin who created the session.
    pub creator_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl VotingSession {
    /// A session is live when it is active and `now` lies in its window.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use votecerto::domain::{SessionId, Title, UserId, VotingSession, VotingWindow};
    ///
    /// let now = Utc::now();
    /// let session = VotingSession {
    ///     id: SessionId::random(),
    ///     title: Title::new("Orçamento 2026").unwrap(),
    ///     description: None,
    ///     window: VotingWindow::new(now - Duration::hours(1), now + Duration::hours(1)).unwrap(),
    ///     active: true,
    ///     community_id: None,
    ///     creator_id: UserId::random(),
    ///     created_at: now,
    /// };
    /// assert!(session.is_live(now));
    /// ```
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.window.contains(now)
    }
}
