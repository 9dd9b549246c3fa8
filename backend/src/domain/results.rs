//! Per-session results aggregation.

use std::collections::HashMap;

use super::{Project, ProjectId, SessionId};

/// Vote count and share for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectResult {
    /// Project id.
    pub project_id: ProjectId,
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: Option<String>,
    /// Project proposer.
    pub author: Option<String>,
    /// Votes received.
    pub votes: u64,
    /// Share of the session's votes, rounded to one decimal place.
    pub percentage: f64,
}

/// Results for a whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    /// Session id.
    pub session_id: SessionId,
    /// Session title.
    pub session_title: String,
    /// Votes cast in the session.
    pub total_votes: u64,
    /// Every project, most voted first.
    pub projects: Vec<ProjectResult>,
}

/// Percentage of `count` over `total`, rounded to one decimal place; 0 when
/// nothing has been cast.
///
/// # Examples
/// ```
/// use votecerto::domain::vote_percentage;
///
/// assert_eq!(vote_percentage(3, 4), 75.0);
/// assert_eq!(vote_percentage(1, 3), 33.3);
/// assert_eq!(vote_percentage(0, 0), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "vote counts stay far below 2^52"
)]
pub fn vote_percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Combine a session's projects with its per-project tallies.
///
/// `projects` must be in creation order; that order breaks ties. Projects
/// without votes are included with a zero count.
#[must_use]
pub fn aggregate_results(
    session_id: SessionId,
    session_title: &str,
    projects: &[Project],
    tallies: &[(ProjectId, u64)],
) -> SessionResults {
    let counts: HashMap<ProjectId, u64> = tallies.iter().copied().collect();
    let total_votes = tallies.iter().map(|(_, count)| count).sum();

    let mut results: Vec<ProjectResult> = projects
        .iter()
        .map(|project| {
            let votes = counts.get(&project.id).copied().unwrap_or_default();
            ProjectResult {
                project_id: project.id,
                title: project.title.as_str().to_owned(),
                description: project.description.clone(),
                author: project.author.clone(),
                votes,
                percentage: vote_percentage(votes, total_votes),
            }
        })
        .collect();
    // `sort_by` is stable, so equal counts keep creation order.
    results.sort_by(|a, b| b.votes.cmp(&a.votes));

    SessionResults {
        session_id,
        session_title: session_title.to_owned(),
        total_votes,
        projects: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Title;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn session_id() -> SessionId {
        SessionId::random()
    }

    fn projects(session_id: SessionId, titles: &[&str]) -> Vec<Project> {
        let base = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        titles
            .iter()
            .zip(0_i64..)
            .map(|(title, offset)| Project {
                id: ProjectId::random(),
                session_id,
                title: Title::new(title).expect("title"),
                description: None,
                author: None,
                created_at: base + Duration::minutes(offset),
            })
            .collect()
    }

    #[rstest]
    fn three_to_one_split(session_id: SessionId) {
        let projects = projects(session_id, &["P1", "P2"]);
        let tallies = [(projects[1].id, 1), (projects[0].id, 3)];

        let results = aggregate_results(session_id, "S", &projects, &tallies);

        assert_eq!(results.total_votes, 4);
        let shares: Vec<(&str, u64, f64)> = results
            .projects
            .iter()
            .map(|r| (r.title.as_str(), r.votes, r.percentage))
            .collect();
        assert_eq!(shares, vec![("P1", 3, 75.0), ("P2", 1, 25.0)]);
    }

    #[rstest]
    fn zero_votes_give_zero_percent(session_id: SessionId) {
        let projects = projects(session_id, &["A", "B", "C"]);

        let results = aggregate_results(session_id, "S", &projects, &[]);

        assert_eq!(results.total_votes, 0);
        assert_eq!(results.projects.len(), 3);
        assert!(results.projects.iter().all(|r| r.votes == 0 && r.percentage == 0.0));
    }

    #[rstest]
    fn ties_keep_creation_order(session_id: SessionId) {
        let projects = projects(session_id, &["first", "second", "third"]);
        let tallies = [(projects[2].id, 2), (projects[1].id, 1), (projects[0].id, 1)];

        let results = aggregate_results(session_id, "S", &projects, &tallies);

        let order: Vec<&str> = results.projects.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["third", "first", "second"]);
    }

    #[rstest]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    #[case(1, 8, 12.5)]
    #[case(5, 5, 100.0)]
    fn rounding_to_one_decimal(#[case] count: u64, #[case] total: u64, #[case] expected: f64) {
        assert!((vote_percentage(count, total) - expected).abs() < f64::EPSILON);
    }
}
