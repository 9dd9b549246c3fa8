//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When the
//! migrations change, regenerate with `diesel print-schema` or edit by hand.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Lowercased; unique (`users_email_key`).
        email -> Varchar,
        password_hash -> Text,
        /// `ADMIN`, `GESTOR` or `PARTICIPANTE`.
        role -> Varchar,
        name -> Nullable<Varchar>,
        /// Eleven digits; unique when present (`users_national_id_key`).
        national_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        last_access -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Communities and their invite codes.
    communities (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        invite_code -> Varchar,
        creator_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership join table; the primary key is the uniqueness guard.
    community_members (community_id, user_id) {
        community_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Voting sessions. `community_id` is null for global sessions.
    voting_sessions (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        active -> Bool,
        community_id -> Nullable<Uuid>,
        creator_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Candidate projects of a session.
    projects (id) {
        id -> Uuid,
        session_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        author -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cast votes; one per (user, session).
    votes (id) {
        id -> Uuid,
        user_id -> Uuid,
        session_id -> Uuid,
        project_id -> Uuid,
        comment -> Nullable<Varchar>,
        cast_at -> Timestamptz,
    }
}

diesel::joinable!(communities -> users (creator_id));
diesel::joinable!(community_members -> communities (community_id));
diesel::joinable!(community_members -> users (user_id));
diesel::joinable!(voting_sessions -> communities (community_id));
diesel::joinable!(projects -> voting_sessions (session_id));
diesel::joinable!(votes -> users (user_id));
diesel::joinable!(votes -> voting_sessions (session_id));
diesel::joinable!(votes -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    communities,
    community_members,
    voting_sessions,
    projects,
    votes,
);
