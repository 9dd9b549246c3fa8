//! Aggregate figures for the dashboard screen.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{Project, ProjectId, SessionId, VoteView, VotingSession};

/// A visible session with its counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The session.
    pub session: VotingSession,
    /// Whether it is accepting votes right now.
    pub live: bool,
    /// Number of projects.
    pub project_count: usize,
    /// Number of visible votes.
    pub vote_count: usize,
}

/// A visible project with its vote count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    /// The project.
    pub project: Project,
    /// Number of visible votes.
    pub vote_count: usize,
}

/// Role-scoped dashboard aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Registered accounts; only reported to admins.
    pub user_count: Option<usize>,
    /// Visible sessions, most recent start first.
    pub sessions: Vec<SessionStats>,
    /// Visible projects.
    pub projects: Vec<ProjectStats>,
    /// Sessions live at the time of the query.
    pub live_sessions: usize,
    /// Visible votes.
    pub total_votes: usize,
}

/// Assemble dashboard figures from the caller's visible data.
#[must_use]
pub fn build_dashboard(
    now: DateTime<Utc>,
    user_count: Option<usize>,
    mut sessions: Vec<VotingSession>,
    projects: Vec<Project>,
    votes: &[VoteView],
) -> DashboardStats {
    let mut votes_per_session: HashMap<SessionId, usize> = HashMap::new();
    let mut votes_per_project: HashMap<ProjectId, usize> = HashMap::new();
    for view in votes {
        *votes_per_session.entry(view.vote.session_id).or_default() += 1;
        *votes_per_project.entry(view.vote.project_id).or_default() += 1;
    }
    let mut projects_per_session: HashMap<SessionId, usize> = HashMap::new();
    for project in &projects {
        *projects_per_session.entry(project.session_id).or_default() += 1;
    }

    sessions.sort_by(|a, b| b.window.starts_at().cmp(&a.window.starts_at()));
    let sessions: Vec<SessionStats> = sessions
        .into_iter()
        .map(|session| SessionStats {
            live: session.is_live(now),
            project_count: projects_per_session.get(&session.id).copied().unwrap_or(0),
            vote_count: votes_per_session.get(&session.id).copied().unwrap_or(0),
            session,
        })
        .collect();
    let projects = projects
        .into_iter()
        .map(|project| ProjectStats {
            vote_count: votes_per_project.get(&project.id).copied().unwrap_or(0),
            project,
        })
        .collect();

    DashboardStats {
        user_count,
        live_sessions: sessions.iter().filter(|s| s.live).count(),
        sessions,
        projects,
        total_votes: votes.len(),
    }
}
