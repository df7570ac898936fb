//! Session registry
//!
//! Lets code that does not hold the check handle (page helpers, free
//! functions) reach "the current open check". One slot per registry, last
//! writer wins. Parallel test workers are separate processes, so each gets
//! its own process-wide [`global`] registry; tests inside one process that
//! need isolation bind into their own [`SessionRegistry`] instead.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use dorder_common::types::CheckDetails;

use crate::check::{CloseOutcome, OpenCheck};
use crate::error::{OrderError, OrderResult};

static GLOBAL: Lazy<SessionRegistry> = Lazy::new(SessionRegistry::new);

/// Slot holding the current open check
#[derive(Default)]
pub struct SessionRegistry {
    slot: RwLock<Option<Arc<OpenCheck>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `check` current, returning whatever was current before
    pub fn bind(&self, check: Arc<OpenCheck>) -> Option<Arc<OpenCheck>> {
        debug!(
            "Binding table {} (TransactionGuid: {})",
            check.table_number(),
            check.transaction_guid()
        );
        self.slot.write().replace(check)
    }

    /// The current check; fails if nothing has been bound
    pub fn current(&self) -> OrderResult<Arc<OpenCheck>> {
        self.slot.read().clone().ok_or(OrderError::NotInitialized)
    }

    pub fn is_bound(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Empty the slot
    pub fn unbind(&self) -> Option<Arc<OpenCheck>> {
        self.slot.write().take()
    }

    /// Empty the slot only if it still holds `check`
    pub fn unbind_if(&self, check: &Arc<OpenCheck>) -> bool {
        let mut slot = self.slot.write();
        match slot.as_ref() {
            Some(current) if Arc::ptr_eq(current, check) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Details of the current check; `Ok(None)` when nothing is bound yet
    pub async fn check_details(&self) -> OrderResult<Option<CheckDetails>> {
        match self.current() {
            Ok(check) => check.check_details().await.map(Some),
            Err(OrderError::NotInitialized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Close the current check; `Ok(None)` when nothing is bound yet
    pub async fn close_table(&self) -> OrderResult<Option<CloseOutcome>> {
        match self.current() {
            Ok(check) => check.close().await.map(Some),
            Err(OrderError::NotInitialized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Frontend URL of the current check's table; `Ok(None)` when unbound
    pub fn table_url(&self) -> OrderResult<Option<String>> {
        match self.current() {
            Ok(check) => check.table_url().map(Some),
            Err(OrderError::NotInitialized) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// The process-wide registry
pub fn global() -> &'static SessionRegistry {
    &GLOBAL
}

/// Make `check` current in the process-wide registry
pub fn set_current(check: Arc<OpenCheck>) -> Option<Arc<OpenCheck>> {
    global().bind(check)
}

/// The current check in the process-wide registry
pub fn get_current() -> OrderResult<Arc<OpenCheck>> {
    global().current()
}

/// Empty the process-wide registry
pub fn clear_current() -> Option<Arc<OpenCheck>> {
    global().unbind()
}
