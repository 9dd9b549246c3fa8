//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
use crate::domain::test_fixtures::{clock, identity, now, user};
use crate::domain::{Email, ErrorCode, Password, PasswordHash};

fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AccountService {
    AccountService::new(Arc::new(users), Arc::new(hasher), clock())
}

fn signup(role: Option<Role>) -> NewAccount {
    NewAccount {
        email: Email::new("nova@example.com").expect("email"),
        password: Password::new("segredo1").expect("password"),
        name: None,
        national_id: None,
        role,
    }
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{}", password.expose()))));
    hasher
}

#[rstest]
#[tokio::test]
async fn authenticate_records_access_time() {
    let id = UserId::random();
    let stored = user(id, Role::Participant, "hash");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored)));
    users
        .expect_record_access()
        .withf(move |user_id, at| *user_id == id && *at == now())
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(true));

    let credentials = LoginCredentials::try_from_parts("x@example.com", "pw").expect("creds");
    let logged_in = service(users, hasher)
        .authenticate(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(logged_in.id, id);
    assert_eq!(logged_in.last_access, Some(now()));
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn authenticate_hides_which_part_was_wrong(#[case] account_exists: bool) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(move |_| {
        Ok(account_exists.then(|| user(UserId::random(), Role::Admin, "hash")))
    });
    users.expect_record_access().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(false));

    let credentials = LoginCredentials::try_from_parts("x@example.com", "pw").expect("creds");
    let err = service(users, hasher)
        .authenticate(&credentials)
        .await
        .expect_err("login fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn sign_up_defaults_to_participant() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| user.role == Role::Participant && user.password_hash.as_str() == "hashed:segredo1")
        .times(1)
        .return_once(|_| Ok(()));

    let created = service(users, hashing_hasher())
        .sign_up(None, signup(None))
        .await
        .expect("signup succeeds");

    assert_eq!(created.role, Role::Participant);
    assert_eq!(created.created_at, now());
}

#[rstest]
#[case(None)]
#[case(Some(Role::Manager))]
#[case(Some(Role::Participant))]
#[tokio::test]
async fn only_admins_assign_privileged_roles(#[case] caller_role: Option<Role>) {
    let mut users = MockUserRepository::new();
    users.expect_insert().times(0);

    let err = service(users, MockPasswordHasher::new())
        .sign_up(caller_role.map(identity), signup(Some(Role::Manager)))
        .await
        .expect_err("role assignment rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_can_create_managers() {
    let mut users = MockUserRepository::new();
    users.expect_insert().times(1).return_once(|_| Ok(()));

    let created = service(users, hashing_hasher())
        .sign_up(Some(identity(Role::Admin)), signup(Some(Role::Manager)))
        .await
        .expect("signup succeeds");

    assert_eq!(created.role, Role::Manager);
}

#[rstest]
#[tokio::test]
async fn bootstrap_admin_ignores_requested_role() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| user.role == Role::Admin)
        .times(1)
        .return_once(|_| Ok(()));

    let created = service(users, hashing_hasher())
        .bootstrap_admin(signup(Some(Role::Participant)))
        .await
        .expect("bootstrap succeeds");

    assert_eq!(created.role, Role::Admin);
}

#[rstest]
#[case(constraints::USER_EMAIL, "email already registered")]
#[case(constraints::USER_NATIONAL_ID, "CPF already registered")]
#[tokio::test]
async fn duplicate_accounts_conflict(#[case] constraint: &'static str, #[case] message: &str) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(move |_| Err(PersistenceError::unique_violation(constraint)));

    let err = service(users, hashing_hasher())
        .sign_up(None, signup(None))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn own_password_change_requires_current_password() {
    let caller = identity(Role::Participant);
    let stored = user(caller.user_id, Role::Participant, "hash");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    users.expect_update().times(0);

    let changes = AccountChanges {
        new_password: Some(Password::new("novasenha").expect("password")),
        ..AccountChanges::default()
    };
    let err = service(users, MockPasswordHasher::new())
        .update_user(caller, caller.user_id, changes)
        .await
        .expect_err("missing current password");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn own_password_change_with_current_password_rehashes() {
    let caller = identity(Role::Participant);
    let stored = user(caller.user_id, Role::Participant, "old");
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    users
        .expect_update()
        .withf(|user| user.password_hash.as_str() == "hashed:novasenha")
        .times(1)
        .return_once(|_| Ok(()));
    let mut hasher = hashing_hasher();
    hasher.expect_verify().return_once(|_, _| Ok(true));

    let changes = AccountChanges {
        new_password: Some(Password::new("novasenha").expect("password")),
        current_password: Some(Password::for_verification("velha").expect("password")),
        ..AccountChanges::default()
    };
    service(users, hasher)
        .update_user(caller, caller.user_id, changes)
        .await
        .expect("password changed");
}

#[rstest]
#[tokio::test]
async fn users_cannot_promote_themselves() {
    let caller = identity(Role::Participant);
    let changes = AccountChanges {
        role: Some(Role::Admin),
        ..AccountChanges::default()
    };
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .update_user(caller, caller.user_id, changes)
        .await
        .expect_err("promotion rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn users_cannot_edit_other_accounts() {
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .update_user(
            identity(Role::Manager),
            UserId::random(),
            AccountChanges::default(),
        )
        .await
        .expect_err("edit rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_delete_of_missing_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_delete().return_once(|_| Ok(false));

    let err = service(users, MockPasswordHasher::new())
        .delete_user(identity(Role::Admin), UserId::random())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn admin_cannot_delete_themselves() {
    let admin = identity(Role::Admin);
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .delete_user(admin, admin.user_id)
        .await
        .expect_err("self delete rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(Role::Manager)]
#[case(Role::Participant)]
#[tokio::test]
async fn only_admins_list_users(#[case] role: Role) {
    let err = service(MockUserRepository::new(), MockPasswordHasher::new())
        .list_users(identity(role))
        .await
        .expect_err("listing rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn current_user_for_deleted_account_is_unauthorised() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(users, MockPasswordHasher::new())
        .current_user(identity(Role::Participant))
        .await
        .expect_err("stale session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn repository_failures_surface_as_internal_errors() {
    let mut users = MockUserRepository::new();
    users
        .expect_list()
        .return_once(|| Err(PersistenceError::connection("refused")));

    let err = service(users, MockPasswordHasher::new())
        .list_users(identity(Role::Admin))
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
