//! Driving ports for reports and the dashboard.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error, Identity, SessionId, SessionReport};

/// Domain use-case port for PII reports.
#[async_trait]
pub trait ReportsQuery: Send + Sync {
    /// Votes per project per visible session, with masked CPFs.
    async fn vote_report(
        &self,
        caller: Identity,
        session_id: Option<SessionId>,
    ) -> Result<Vec<SessionReport>, Error>;
}

/// Domain use-case port for the dashboard aggregate.
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Role-scoped counters.
    async fn dashboard(&self, caller: Identity) -> Result<DashboardStats, Error>;
}
