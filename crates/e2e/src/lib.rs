//! Digital Order E2E support
//!
//! Test setup and teardown for the QR-code ordering app. Tests get a real
//! check on a real table from the Digital Order API, drive the UI against
//! it, and compare what the UI shows with what the server holds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TableFixture (per test)                    │
//! │    ├── open()     -> OrderClient::setup_table + bind        │
//! │    └── teardown() -> OpenCheck::close (logged) + unbind     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  OrderClient                                                │
//! │    ├── authenticate(Unauthenticated) -> Authenticated       │
//! │    ├── resolve_check(&Authenticated)                        │
//! │    │     create ── ok ──────────────> Created(ids)          │
//! │    │       └─ fails ─> get by table ─> Recovered(ids)       │
//! │    │                        └─ fails ─> Failed(reason)      │
//! │    ├── check_details(&Open)        (by TransactionGuid)     │
//! │    ├── add_items(&Open, items)                              │
//! │    └── pay_and_close(&Open)                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SessionRegistry                                            │
//! │    ├── bind / unbind / current -> Arc<OpenCheck>            │
//! │    └── accessors: get_check_details(), close_table()        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod accessors;
pub mod check;
pub mod client;
pub mod error;
pub mod fixture;
pub mod menu;
pub mod registry;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use accessors::{close_table, current_table_url, get_check_details};
pub use check::{CheckSummary, CloseOutcome, OpenCheck};
pub use client::{OrderClient, FALLBACK_PAYMENT_AMOUNT};
pub use error::{OrderError, OrderResult, TransportError};
pub use fixture::{resolve_table_number, with_table, TableFixture};
pub use registry::{get_current, set_current, SessionRegistry};
pub use session::{CheckIds, CheckResolution, OpenedVia, TableSession};
pub use transport::{HttpTransport, Transport};
