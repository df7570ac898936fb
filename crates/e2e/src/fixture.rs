//! Per-test table fixture
//!
//! Setup opens (or recovers) the table's check and binds it into a session
//! registry; teardown closes it. Setup failures are returned because there
//! is nothing to salvage. Teardown failures are only logged, so a failed
//! close never hides the test's own failure.
//!
//! [`with_table`] tears down even when the body panics, then re-raises the
//! panic. A [`TableFixture`] dropped without [`TableFixture::teardown`]
//! still releases its registry slot.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, warn};

use dorder_common::DEFAULT_TABLE_NUMBER;

use crate::check::{CloseOutcome, OpenCheck};
use crate::client::OrderClient;
use crate::error::OrderResult;
use crate::registry::{self, SessionRegistry};

/// Environment variable selecting the table for a test run
pub const TABLE_ENV: &str = "DORDER_TABLE";

/// An open check bound into a registry for the duration of a test
pub struct TableFixture<'r> {
    check: Arc<OpenCheck>,
    registry: &'r SessionRegistry,
}

impl TableFixture<'static> {
    /// Open `table` and bind it into the process-wide registry
    pub async fn open(client: &OrderClient, table: u32) -> OrderResult<Self> {
        Self::open_in(registry::global(), client, table).await
    }
}

impl<'r> TableFixture<'r> {
    /// Open `table` and bind it into `registry`
    pub async fn open_in(
        registry: &'r SessionRegistry,
        client: &OrderClient,
        table: u32,
    ) -> OrderResult<TableFixture<'r>> {
        info!("Test setup: initializing table {}", table);

        let check = Arc::new(client.setup_table(table).await?);
        registry.bind(Arc::clone(&check));

        info!(
            "Table {} bound (TransactionGuid: {}, session: {})",
            check.table_number(),
            check.transaction_guid(),
            check.session_id()
        );
        Ok(TableFixture { check, registry })
    }

    pub fn check(&self) -> &Arc<OpenCheck> {
        &self.check
    }

    /// Close the check and release the registry slot
    ///
    /// Returns whether the check ended up closed.
    pub async fn teardown(self) -> bool {
        let table = self.check.table_number();
        info!("Test teardown: closing table {}", table);

        let closed = match self.check.close().await {
            Ok(CloseOutcome::Closed { amount }) => {
                info!("Table {} closed, paid {:.2}", table, amount);
                true
            }
            Ok(CloseOutcome::AlreadyClosed) => true,
            Err(e) => {
                error!("Error closing table {}: {}", table, e);
                false
            }
        };

        self.registry.unbind_if(&self.check);
        closed
    }
}

impl Drop for TableFixture<'_> {
    fn drop(&mut self) {
        let _ = self.registry.unbind_if(&self.check);
    }
}

/// Run `body` with `table` open, always tearing down afterwards
///
/// A panic in `body` is caught long enough to close the check, then
/// resumed.
pub async fn with_table<F, Fut, T>(client: &OrderClient, table: u32, body: F) -> OrderResult<T>
where
    F: FnOnce(Arc<OpenCheck>) -> Fut,
    Fut: Future<Output = T>,
{
    with_table_in(registry::global(), client, table, body).await
}

/// [`with_table`] against a specific registry
pub async fn with_table_in<F, Fut, T>(
    registry: &SessionRegistry,
    client: &OrderClient,
    table: u32,
    body: F,
) -> OrderResult<T>
where
    F: FnOnce(Arc<OpenCheck>) -> Fut,
    Fut: Future<Output = T>,
{
    let fixture = TableFixture::open_in(registry, client, table).await?;
    let output = AssertUnwindSafe(body(Arc::clone(fixture.check())))
        .catch_unwind()
        .await;

    if output.is_err() {
        warn!("Test body for table {} panicked, tearing down", table);
    }
    fixture.teardown().await;

    match output {
        Ok(output) => Ok(output),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Table for this run: `DORDER_TABLE` if set, else the default table
pub fn resolve_table_number() -> OrderResult<u32> {
    resolve_table_number_from(std::env::var(TABLE_ENV).ok())
}

pub fn resolve_table_number_from(value: Option<String>) -> OrderResult<u32> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| {
            let reason = format!("{} is not a table number: {:?}", TABLE_ENV, raw);
            dorder_common::Error::InvalidConfig(reason).into()
        }),
        None => Ok(DEFAULT_TABLE_NUMBER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::test_support::{scripted_client, Reply};
    use crate::transport::paths;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_binds_and_teardown_unbinds() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");

        let fixture = TableFixture::open_in(&registry, &client, 10).await.unwrap();
        assert!(Arc::ptr_eq(&registry.current().unwrap(), fixture.check()));

        transport.json(paths::CHECK_GET, json!({ "Status": "SUCCESS", "AmountDueTotal": 2.0 }));
        transport.json(paths::CHECK_CLOSE, json!({ "Status": "SUCCESS" }));
        assert!(fixture.teardown().await);
        assert!(!registry.is_bound());
    }

    #[tokio::test]
    async fn test_setup_failure_binds_nothing() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.reply(paths::SESSION_BEGIN, Reply::Status(401));

        let err = TableFixture::open_in(&registry, &client, 10).await.err().unwrap();
        assert!(matches!(err, OrderError::Authentication(_)));
        assert!(!registry.is_bound());
    }

    #[tokio::test]
    async fn test_teardown_swallows_close_errors() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");
        let fixture = TableFixture::open_in(&registry, &client, 10).await.unwrap();

        transport.json(paths::CHECK_GET, json!({ "Status": "SUCCESS", "AmountDueTotal": 2.0 }));
        transport.reply(paths::CHECK_CLOSE, Reply::Status(500));
        assert!(!fixture.teardown().await);
        assert!(!registry.is_bound());
    }

    #[tokio::test]
    async fn test_teardown_after_body_closed_sends_no_second_close() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");
        transport.json(paths::CHECK_GET, json!({ "Status": "SUCCESS", "AmountDueTotal": 2.0 }));
        transport.json(paths::CHECK_CLOSE, json!({ "Status": "SUCCESS" }));

        let outcome = with_table_in(&registry, &client, 10, |check| async move {
            check.close().await.unwrap()
        })
        .await
        .unwrap();

        assert!(matches!(outcome, CloseOutcome::Closed { .. }));
        assert_eq!(transport.count(paths::CHECK_CLOSE), 1);
        assert!(!registry.is_bound());
    }

    #[tokio::test]
    async fn test_teardown_leaves_newer_binding_alone() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");
        transport.script_open("g-2", "2");

        let older = TableFixture::open_in(&registry, &client, 10).await.unwrap();
        let newer = TableFixture::open_in(&registry, &client, 11).await.unwrap();

        transport.json(paths::CHECK_GET, json!({ "Status": "SUCCESS", "AmountDueTotal": 2.0 }));
        transport.json(paths::CHECK_CLOSE, json!({ "Status": "SUCCESS" }));
        older.teardown().await;

        assert!(Arc::ptr_eq(&registry.current().unwrap(), newer.check()));
    }

    #[tokio::test]
    async fn test_panicking_body_still_tears_down() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");
        transport.json(paths::CHECK_GET, json!({ "Status": "SUCCESS", "AmountDueTotal": 2.0 }));
        transport.json(paths::CHECK_CLOSE, json!({ "Status": "SUCCESS" }));

        let run = with_table_in(&registry, &client, 10, |_check| async {
            assert_eq!(1, 2, "failing test body");
        });
        let result = AssertUnwindSafe(run).catch_unwind().await;

        assert!(result.is_err());
        assert_eq!(transport.count(paths::CHECK_CLOSE), 1);
        assert!(!registry.is_bound());
        assert!(registry.check_details().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropped_fixture_releases_slot() {
        let registry = SessionRegistry::new();
        let (client, transport) = scripted_client();
        transport.script_open("g-1", "1");

        let fixture = TableFixture::open_in(&registry, &client, 10).await.unwrap();
        assert!(registry.is_bound());
        drop(fixture);

        assert!(!registry.is_bound());
        assert_eq!(transport.count(paths::CHECK_CLOSE), 0);
    }

    #[test]
    fn test_resolve_table_number() {
        assert_eq!(resolve_table_number_from(None).unwrap(), DEFAULT_TABLE_NUMBER);
        assert_eq!(resolve_table_number_from(Some(" 5 ".to_string())).unwrap(), 5);
        assert!(matches!(
            resolve_table_number_from(Some("five".to_string())),
            Err(OrderError::Config(_))
        ));
    }
}
