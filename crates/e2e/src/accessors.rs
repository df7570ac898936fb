//! Free functions over the process-wide session registry
//!
//! For call sites that cannot be handed the check, such as helpers that run
//! before any fixture exists. "Nothing bound yet" is `Ok(None)`, not an
//! error; failures of a bound check still come back as `Err`.

use dorder_common::types::CheckDetails;

use crate::check::CloseOutcome;
use crate::error::OrderResult;
use crate::registry;

/// Details of the current check
pub async fn get_check_details() -> OrderResult<Option<CheckDetails>> {
    registry::global().check_details().await
}

/// Close the current check; a second call is a no-op success
pub async fn close_table() -> OrderResult<Option<CloseOutcome>> {
    registry::global().close_table().await
}

/// Frontend URL of the current check's table
pub fn current_table_url() -> OrderResult<Option<String>> {
    registry::global().table_url()
}
