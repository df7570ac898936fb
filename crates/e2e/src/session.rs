//! Typestate model of one table's check session
//!
//! A session moves `Unauthenticated -> Authenticated -> Open` through
//! transitions that only [`OrderClient`](crate::client::OrderClient) can
//! perform. Operations that need a transaction GUID only accept an open
//! session, so fetching details before the check is open does not compile:
//!
//! ```compile_fail
//! # async fn demo(client: dorder_e2e::OrderClient) {
//! let session = client.session(10);
//! let authenticated = client.authenticate(session).await.unwrap();
//! // needs TableSession<Open>
//! client.check_details(&authenticated).await.unwrap();
//! # }
//! ```
//!
//! Closing is tracked on [`OpenCheck`](crate::check::OpenCheck) rather than
//! here, because a closed check can still be queried.

use serde::Serialize;

use dorder_common::types::CheckScope;
use dorder_common::ApiConfig;

use crate::error::{OrderError, OrderResult};

/// Venue and table a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableContext {
    pub table_number: u32,
    pub property_id: String,
    pub revenue_center_id: String,
    pub client_id: String,
}

impl TableContext {
    pub fn from_config(config: &ApiConfig, table_number: u32) -> Self {
        Self {
            table_number,
            property_id: config.venue.property_id.clone(),
            revenue_center_id: config.venue.revenue_center_id.clone(),
            client_id: config.credentials.client_id.clone(),
        }
    }
}

/// Transaction identifiers of an open check; both are always present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIds {
    transaction_guid: String,
    transaction_number: String,
}

impl CheckIds {
    /// Build from response fields; `None` unless both are non-empty
    pub fn new(
        transaction_guid: Option<String>,
        transaction_number: Option<String>,
    ) -> Option<Self> {
        let transaction_guid = transaction_guid.filter(|g| !g.trim().is_empty())?;
        let transaction_number = transaction_number.filter(|n| !n.trim().is_empty())?;
        Some(Self {
            transaction_guid,
            transaction_number,
        })
    }

    pub fn transaction_guid(&self) -> &str {
        &self.transaction_guid
    }

    pub fn transaction_number(&self) -> &str {
        &self.transaction_number
    }
}

/// Outcome of trying to get hold of a table's check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResolution {
    /// A new check was opened
    Created(CheckIds),
    /// The table already had an open check and it was picked up
    Recovered(CheckIds),
    /// Neither create nor lookup produced both identifiers
    Failed(String),
}

/// How an open check was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenedVia {
    Created,
    Recovered,
}

impl std::fmt::Display for OpenedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenedVia::Created => write!(f, "created"),
            OpenedVia::Recovered => write!(f, "recovered"),
        }
    }
}

impl CheckResolution {
    /// Turn a failed resolution into a setup error for `table`
    pub fn into_result(self, table: u32) -> OrderResult<(CheckIds, OpenedVia)> {
        match self {
            CheckResolution::Created(ids) => Ok((ids, OpenedVia::Created)),
            CheckResolution::Recovered(ids) => Ok((ids, OpenedVia::Recovered)),
            CheckResolution::Failed(reason) => Err(OrderError::Setup { table, reason }),
        }
    }
}

/// No session id yet
#[derive(Debug, Clone)]
pub struct Unauthenticated;

/// Holds a session id, no check yet
#[derive(Debug, Clone)]
pub struct Authenticated {
    session_id: String,
}

/// Holds a session id and the check's transaction identifiers
#[derive(Debug, Clone)]
pub struct Open {
    session_id: String,
    check: CheckIds,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Authenticated {}
    impl Sealed for super::Open {}
}

/// States that carry a session id
pub trait HasSession: sealed::Sealed {
    fn session_id(&self) -> &str;
}

impl HasSession for Authenticated {
    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl HasSession for Open {
    fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// One table's session in state `S`
#[derive(Debug, Clone)]
pub struct TableSession<S> {
    context: TableContext,
    state: S,
}

impl<S> TableSession<S> {
    pub fn context(&self) -> &TableContext {
        &self.context
    }

    pub fn table_number(&self) -> u32 {
        self.context.table_number
    }
}

impl TableSession<Unauthenticated> {
    pub fn new(context: TableContext) -> Self {
        Self {
            context,
            state: Unauthenticated,
        }
    }

    pub(crate) fn authenticated(self, session_id: String) -> TableSession<Authenticated> {
        TableSession {
            context: self.context,
            state: Authenticated { session_id },
        }
    }
}

impl TableSession<Authenticated> {
    pub(crate) fn opened(self, check: CheckIds) -> TableSession<Open> {
        TableSession {
            context: self.context,
            state: Open {
                session_id: self.state.session_id,
                check,
            },
        }
    }
}

impl TableSession<Open> {
    pub fn check_ids(&self) -> &CheckIds {
        &self.state.check
    }

    pub fn transaction_guid(&self) -> &str {
        self.state.check.transaction_guid()
    }

    pub fn transaction_number(&self) -> &str {
        self.state.check.transaction_number()
    }
}

impl<S: HasSession> TableSession<S> {
    pub fn session_id(&self) -> &str {
        self.state.session_id()
    }

    /// Scope block sent with every order request
    pub fn scope(&self) -> CheckScope {
        CheckScope {
            property_id: self.context.property_id.clone(),
            revenue_center_id: self.context.revenue_center_id.clone(),
            client_id: self.context.client_id.clone(),
            session_id: self.session_id().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TableContext {
        TableContext::from_config(&ApiConfig::default(), 10)
    }

    #[test]
    fn test_check_ids_need_both_values() {
        assert!(CheckIds::new(Some("g".into()), Some("1".into())).is_some());
        assert!(CheckIds::new(Some("g".into()), None).is_none());
        assert!(CheckIds::new(None, Some("1".into())).is_none());
        assert!(CheckIds::new(Some("  ".into()), Some("1".into())).is_none());
        assert!(CheckIds::new(Some("g".into()), Some(String::new())).is_none());
    }

    #[test]
    fn test_transitions_carry_identifiers() {
        let ids = CheckIds::new(Some("guid-1".into()), Some("42".into())).unwrap();
        let open = TableSession::new(context())
            .authenticated("sess".to_string())
            .opened(ids.clone());

        assert_eq!(open.table_number(), 10);
        assert_eq!(open.session_id(), "sess");
        assert_eq!(open.transaction_guid(), "guid-1");
        assert_eq!(open.transaction_number(), "42");
        assert_eq!(open.check_ids(), &ids);
    }

    #[test]
    fn test_scope_uses_venue_and_session() {
        let session = TableSession::new(context()).authenticated("sess".to_string());
        let scope = session.scope();
        assert_eq!(scope.property_id, "33");
        assert_eq!(scope.revenue_center_id, "810");
        assert_eq!(scope.session_id, "sess");
    }

    #[test]
    fn test_failed_resolution_is_setup_error() {
        let err = CheckResolution::Failed("no check".to_string())
            .into_result(7)
            .unwrap_err();
        match err {
            OrderError::Setup { table, reason } => {
                assert_eq!(table, 7);
                assert_eq!(reason, "no check");
            }
            other => panic!("expected Setup, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_reports_path() {
        let ids = CheckIds::new(Some("g".into()), Some("1".into())).unwrap();
        let (_, via) = CheckResolution::Recovered(ids.clone()).into_result(1).unwrap();
        assert_eq!(via, OpenedVia::Recovered);
        let (created, via) = CheckResolution::Created(ids.clone()).into_result(1).unwrap();
        assert_eq!(via, OpenedVia::Created);
        assert_eq!(created, ids);
    }
}
