//! Handle on a table's open check
//!
//! This is what fixtures bind into the session registry and what page-level
//! helpers read from. It is shared behind an `Arc`; the only state it
//! mutates is the close state.

use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use dorder_common::tables::table_url;
use dorder_common::types::{CartItem, CheckDetails, Menu};

use crate::client::OrderClient;
use crate::error::{OrderError, OrderResult};
use crate::session::{Open, OpenedVia, TableSession};

const OPEN: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// What a close call did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CloseOutcome {
    /// The close request was sent and accepted
    Closed { amount: f64 },
    /// The check was already closed; nothing was sent
    AlreadyClosed,
}

/// Serializable view of an open check
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub table_number: u32,
    pub session_id: String,
    pub transaction_guid: String,
    pub transaction_number: String,
    pub opened_via: OpenedVia,
    pub opened_at: DateTime<Utc>,
    pub closed: bool,
}

/// A check opened by [`OrderClient::setup_table`]
pub struct OpenCheck {
    client: OrderClient,
    session: TableSession<Open>,
    opened_via: OpenedVia,
    opened_at: DateTime<Utc>,
    state: AtomicU8,
}

impl std::fmt::Debug for OpenCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCheck")
            .field("table_number", &self.table_number())
            .field("transaction_guid", &self.transaction_guid())
            .field("opened_via", &self.opened_via)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl OpenCheck {
    pub(crate) fn new(
        client: OrderClient,
        session: TableSession<Open>,
        opened_via: OpenedVia,
    ) -> Self {
        Self {
            client,
            session,
            opened_via,
            opened_at: Utc::now(),
            state: AtomicU8::new(OPEN),
        }
    }

    pub fn session(&self) -> &TableSession<Open> {
        &self.session
    }

    pub fn table_number(&self) -> u32 {
        self.session.table_number()
    }

    pub fn session_id(&self) -> &str {
        self.session.session_id()
    }

    pub fn transaction_guid(&self) -> &str {
        self.session.transaction_guid()
    }

    pub fn transaction_number(&self) -> &str {
        self.session.transaction_number()
    }

    pub fn opened_via(&self) -> OpenedVia {
        self.opened_via
    }

    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == CLOSED
    }

    /// Ordering frontend URL for this check's table
    pub fn table_url(&self) -> OrderResult<String> {
        Ok(table_url(
            &self.client.config().frontend_base_url,
            self.table_number(),
        )?)
    }

    /// Current contents and totals, fetched by transaction GUID
    ///
    /// Still works after the check is closed.
    pub async fn check_details(&self) -> OrderResult<CheckDetails> {
        self.client.check_details(&self.session).await
    }

    pub async fn add_items(&self, items: Vec<CartItem>) -> OrderResult<()> {
        self.client.add_items(&self.session, items).await
    }

    pub async fn full_menu(&self) -> OrderResult<Menu> {
        self.client.full_menu(&self.session).await
    }

    /// Pay off and close the check
    ///
    /// Closing an already closed check succeeds without any request. A
    /// failed close leaves the check open so it can be retried. Only one
    /// close is in flight at a time; a concurrent call fails instead of
    /// paying twice.
    pub async fn close(&self) -> OrderResult<CloseOutcome> {
        let table = self.table_number();
        match self
            .state
            .compare_exchange(OPEN, CLOSING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(CLOSED) => {
                info!("Table {} already closed, skipping", table);
                return Ok(CloseOutcome::AlreadyClosed);
            }
            Err(_) => {
                return Err(OrderError::Close(format!(
                    "a close for table {} is already in progress",
                    table
                )));
            }
        }

        match self.client.pay_and_close(&self.session).await {
            Ok(amount) => {
                self.state.store(CLOSED, Ordering::Release);
                info!("Closed table {}", table);
                Ok(CloseOutcome::Closed { amount })
            }
            Err(e) => {
                self.state.store(OPEN, Ordering::Release);
                Err(e)
            }
        }
    }

    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            table_number: self.table_number(),
            session_id: self.session_id().to_string(),
            transaction_guid: self.transaction_guid().to_string(),
            transaction_number: self.transaction_number().to_string(),
            opened_via: self.opened_via,
            opened_at: self.opened_at,
            closed: self.is_closed(),
        }
    }
}
