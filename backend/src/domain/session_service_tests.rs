//! Tests for the session service.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockCommunityRepository, MockSessionRepository};
use crate::domain::test_fixtures::{clock, community, identity, live_session, now};
use crate::domain::{CommunityId, ErrorCode, Role, Title, UserId};

fn service(sessions: MockSessionRepository, communities: MockCommunityRepository) -> SessionService {
    SessionService::new(Arc::new(sessions), Arc::new(communities), clock())
}

fn new_session(community_id: Option<CommunityId>) -> NewSession {
    NewSession {
        title: Title::new("Prioridades 2026").expect("title"),
        description: None,
        window: VotingWindow::new(now(), now() + Duration::days(3)).expect("window"),
        active: true,
        community_id,
    }
}

#[rstest]
#[tokio::test]
async fn participants_cannot_open_sessions() {
    let err = service(MockSessionRepository::new(), MockCommunityRepository::new())
        .create_session(identity(Role::Participant), new_session(None))
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn managers_cannot_open_global_sessions() {
    let mut sessions = MockSessionRepository::new();
    sessions.expect_insert().times(0);
    let err = service(sessions, MockCommunityRepository::new())
        .create_session(identity(Role::Manager), new_session(None))
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(true, true)]
#[case(false, false)]
#[tokio::test]
async fn manager_needs_membership_in_foreign_community(
    #[case] member: bool,
    #[case] allowed: bool,
) {
    let caller = identity(Role::Manager);
    let owned_elsewhere = community(identity(Role::Manager).user_id);
    let community_id = owned_elsewhere.id;
    let mut communities = MockCommunityRepository::new();
    communities
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(owned_elsewhere)));
    communities
        .expect_is_member()
        .return_once(move |_, _| Ok(member));
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_insert()
        .times(usize::from(allowed))
        .returning(|_| Ok(()));

    let result = service(sessions, communities)
        .create_session(caller, new_session(Some(community_id)))
        .await;

    assert_eq!(result.is_ok(), allowed);
}

#[rstest]
#[tokio::test]
async fn created_session_reports_live_state() {
    let caller = identity(Role::Admin);
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_insert()
        .withf(move |s| s.creator_id == caller.user_id)
        .return_once(|_| Ok(()));

    let created = service(sessions, MockCommunityRepository::new())
        .create_session(caller, new_session(None))
        .await
        .expect("created");

    assert!(created.live);
    assert_eq!(created.session.created_at, now());
}

#[rstest]
#[tokio::test]
async fn update_rejects_end_before_start() {
    let caller = identity(Role::Manager);
    let existing = live_session(caller.user_id, None);
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    sessions.expect_update().times(0);

    let changes = SessionChanges {
        ends_at: Some(now() - Duration::days(10)),
        ..SessionChanges::default()
    };
    let err = service(sessions, MockCommunityRepository::new())
        .update_session(caller, SessionId::random(), changes)
        .await
        .expect_err("window rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(None, Some("Primeira fase"))]
#[case(Some(None), None)]
#[case(Some(Some("Segunda fase")), Some("Segunda fase"))]
#[tokio::test]
async fn description_is_kept_replaced_or_cleared(
    #[case] change: Option<Option<&'static str>>,
    #[case] expected: Option<&'static str>,
) {
    let caller = identity(Role::Manager);
    let mut existing = live_session(caller.user_id, None);
    existing.description = Some("Primeira fase".to_owned());
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    sessions
        .expect_update()
        .withf(move |s| s.description.as_deref() == expected)
        .return_once(|_| Ok(()));

    let changes = SessionChanges {
        description: change.map(|inner| inner.map(str::to_owned)),
        ..SessionChanges::default()
    };
    let updated = service(sessions, MockCommunityRepository::new())
        .update_session(caller, SessionId::random(), changes)
        .await
        .expect("updated");
    assert_eq!(updated.session.description.as_deref(), expected);
}

#[rstest]
#[tokio::test]
async fn deactivating_a_session_ends_its_live_state() {
    let caller = identity(Role::Manager);
    let existing = live_session(caller.user_id, None);
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    sessions
        .expect_update()
        .withf(|s| !s.active)
        .return_once(|_| Ok(()));

    let changes = SessionChanges {
        active: Some(false),
        ..SessionChanges::default()
    };
    let updated = service(sessions, MockCommunityRepository::new())
        .update_session(caller, SessionId::random(), changes)
        .await
        .expect("updated");
    assert!(!updated.live);
}

#[rstest]
#[case(Role::Manager)]
#[case(Role::Participant)]
#[tokio::test]
async fn only_creator_or_admin_deletes(#[case] role: Role) {
    let existing = live_session(identity(Role::Manager).user_id, None);
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    sessions.expect_delete().times(0);

    let err = service(sessions, MockCommunityRepository::new())
        .delete_session(identity(role), SessionId::random())
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Manager)]
#[case(Role::Participant)]
#[tokio::test]
async fn listing_uses_the_role_scope(#[case] role: Role) {
    let caller = identity(role);
    let expected = Capabilities::for_identity(caller).sessions;
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_list()
        .withf(move |query| query.scope == expected && query.active == Some(true))
        .return_once(|_| Ok(Vec::new()));

    let filter = SessionFilter {
        active: Some(true),
        community_id: None,
    };
    service(sessions, MockCommunityRepository::new())
        .list_sessions(caller, filter)
        .await
        .expect("listing");
}

#[rstest]
#[tokio::test]
async fn hidden_session_is_forbidden() {
    let existing = live_session(UserId::random(), Some(CommunityId::random()));
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    let mut communities = MockCommunityRepository::new();
    communities.expect_is_member().return_once(|_, _| Ok(false));

    let err = service(sessions, communities)
        .get_session(identity(Role::Participant), SessionId::random())
        .await
        .expect_err("hidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
