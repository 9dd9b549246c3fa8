//! Vote reports with masked personal data.

use chrono::{DateTime, Utc};

use super::{Project, ProjectId, SessionId, VoteId, VoteView, VotingSession};

/// Placeholder shown when a voter has no name.
pub const ANONYMOUS: &str = "Anônimo";

/// Mask a CPF for display: `12345678901` becomes `123.456.789-**`.
///
/// Non-digits are ignored. Inputs that do not hold exactly 11 digits are
/// returned unchanged, and a missing value renders as `-`.
///
/// # Examples
/// ```
/// use votecerto::domain::mask_national_id;
///
/// assert_eq!(mask_national_id(Some("12345678901")), "123.456.789-**");
/// assert_eq!(mask_national_id(Some("123.456.789-01")), "123.456.789-**");
/// assert_eq!(mask_national_id(Some("123")), "123");
/// assert_eq!(mask_national_id(None), "-");
/// ```
#[must_use]
pub fn mask_national_id(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "-".to_owned();
    };
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.as_slice() {
        [a, b, c, d, e, f, g, h, i, _, _] => format!("{a}{b}{c}.{d}{e}{f}.{g}{h}{i}-**"),
        _ => raw.to_owned(),
    }
}

/// A single vote as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedVote {
    /// Vote id.
    pub vote_id: VoteId,
    /// Voter name or [`ANONYMOUS`].
    pub participant_name: String,
    /// Masked CPF.
    pub masked_national_id: String,
    /// When the vote was cast.
    pub cast_at: DateTime<Utc>,
    /// Voter's remark.
    pub comment: Option<String>,
}

/// Votes received by one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    /// Project id.
    pub project_id: ProjectId,
    /// Project title.
    pub title: String,
    /// Number of votes.
    pub total_votes: usize,
    /// Votes, newest first.
    pub votes: Vec<ReportedVote>,
}

/// Votes of one session, grouped by project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Session id.
    pub session_id: SessionId,
    /// Session title.
    pub title: String,
    /// Session start.
    pub starts_at: DateTime<Utc>,
    /// Session end.
    pub ends_at: DateTime<Utc>,
    /// Votes across all projects.
    pub total_votes: usize,
    /// Projects in creation order.
    pub projects: Vec<ProjectReport>,
}

/// Build the report for `sessions`, most recent start first.
///
/// Projects and votes that do not belong to one of `sessions` are ignored.
#[must_use]
pub fn build_vote_report(
    mut sessions: Vec<VotingSession>,
    projects: &[Project],
    votes: &[VoteView],
) -> Vec<SessionReport> {
    sessions.sort_by(|a, b| b.window.starts_at().cmp(&a.window.starts_at()));
    sessions
        .into_iter()
        .map(|session| {
            let projects: Vec<ProjectReport> = projects
                .iter()
                .filter(|project| project.session_id == session.id)
                .map(|project| project_report(project, votes))
                .collect();
            SessionReport {
                session_id: session.id,
                title: session.title.as_str().to_owned(),
                starts_at: session.window.starts_at(),
                ends_at: session.window.ends_at(),
                total_votes: projects.iter().map(|p| p.total_votes).sum(),
                projects,
            }
        })
        .collect()
}

fn project_report(project: &Project, votes: &[VoteView]) -> ProjectReport {
    let mut reported: Vec<ReportedVote> = votes
        .iter()
        .filter(|view| view.vote.project_id == project.id)
        .map(|view| ReportedVote {
            vote_id: view.vote.id,
            participant_name: view
                .voter_name
                .clone()
                .unwrap_or_else(|| ANONYMOUS.to_owned()),
            masked_national_id: mask_national_id(
                view.voter_national_id.as_ref().map(|id| id.as_str()),
            ),
            cast_at: view.vote.cast_at,
            comment: view.vote.comment.clone(),
        })
        .collect();
    reported.sort_by(|a, b| b.cast_at.cmp(&a.cast_at));
    ProjectReport {
        project_id: project.id,
        title: project.title.as_str().to_owned(),
        total_votes: reported.len(),
        votes: reported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NationalId, Title, UserId, Vote, VotingWindow};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn session(title: &str, start_day: u32) -> VotingSession {
        VotingSession {
            id: SessionId::random(),
            title: Title::new(title).expect("title"),
            description: None,
            window: VotingWindow::new(at(start_day), at(start_day) + Duration::days(1))
                .expect("window"),
            active: true,
            community_id: None,
            creator_id: UserId::random(),
            created_at: at(1),
        }
    }

    fn project(session: &VotingSession, title: &str) -> Project {
        Project {
            id: ProjectId::random(),
            session_id: session.id,
            title: Title::new(title).expect("title"),
            description: None,
            author: None,
            created_at: at(1),
        }
    }

    fn vote(project: &Project, name: Option<&str>, cpf: Option<&str>, day: u32) -> VoteView {
        VoteView {
            vote: Vote {
                id: VoteId::random(),
                user_id: UserId::random(),
                session_id: project.session_id,
                project_id: project.id,
                comment: Some("ok".to_owned()),
                cast_at: at(day),
            },
            voter_name: name.map(str::to_owned),
            voter_email: "v@example.com".to_owned(),
            voter_national_id: cpf.map(|raw| NationalId::new(raw).expect("cpf")),
            project_title: project.title.as_str().to_owned(),
            session_title: String::new(),
        }
    }

    #[rstest]
    #[case(Some("12345678901"), "123.456.789-**")]
    #[case(Some("987.654.321-00"), "987.654.321-**")]
    #[case(Some("1234567890"), "1234567890")]
    #[case(Some(""), "")]
    #[case(None, "-")]
    fn masking(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(mask_national_id(raw), expected);
    }

    #[rstest]
    fn report_groups_votes_and_masks_pii() {
        let older = session("Older", 2);
        let newer = session("Newer", 9);
        let park = project(&newer, "Park");
        let library = project(&newer, "Library");
        let votes = vec![
            vote(&park, Some("Ana"), Some("12345678901"), 10),
            vote(&park, None, None, 11),
        ];

        let report = build_vote_report(
            vec![older.clone(), newer.clone()],
            &[park.clone(), library],
            &votes,
        );

        assert_eq!(report.len(), 2);
        let first = &report[0];
        assert_eq!(first.session_id, newer.id);
        assert_eq!(first.total_votes, 2);
        let park_report = &first.projects[0];
        assert_eq!(park_report.total_votes, 2);
        assert_eq!(park_report.votes[0].participant_name, ANONYMOUS);
        assert_eq!(park_report.votes[0].masked_national_id, "-");
        assert_eq!(park_report.votes[1].participant_name, "Ana");
        assert_eq!(park_report.votes[1].masked_national_id, "123.456.789-**");
        assert_eq!(first.projects[1].total_votes, 0);
        assert_eq!(report[1].session_id, older.id);
        assert!(report[1].projects.is_empty());
    }
}
