//! Process-wide registry and the free accessor functions
//!
//! Everything touching the global registry lives in one test so the
//! steps cannot interleave with another test in this binary.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use dorder_common::ApiConfig;
use dorder_e2e::registry::clear_current;
use dorder_e2e::transport::paths;
use dorder_e2e::{
    close_table, current_table_url, get_check_details, get_current, set_current, with_table,
    CloseOutcome, OrderClient, OrderError, TableFixture,
};

const GUID: &str = "7F0C2B1E-0D7A-4E55-9B8E-3C1D2A4F6B10";

async fn mock_api(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(POST).path(paths::SESSION_BEGIN);
            then.status(200).json_body(json!({ "SessionID": "session-global" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(paths::CHECK_CREATE);
            then.status(200).json_body(json!({
                "Status": "SUCCESS",
                "Order": { "TransactionGuid": GUID, "TransactionNumber": "42" }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(paths::CHECK_GET);
            then.status(200).json_body(json!({
                "Status": "SUCCESS",
                "TransactionGuid": GUID,
                "TransactionNumber": "42",
                "AmountDueTotal": 8.5
            }));
        })
        .await;
}

#[tokio::test]
async fn accessors_follow_the_global_binding() {
    let server = MockServer::start_async().await;
    mock_api(&server).await;
    let close = server
        .mock_async(|when, then| {
            when.method(POST).path(paths::CHECK_CLOSE);
            then.status(200).json_body(json!({ "Status": "SUCCESS" }));
        })
        .await;

    let mut config = ApiConfig::default();
    config.base_url = server.base_url();
    config.subscription_key = "global-key".to_string();
    config.credentials.passkey = "pass".to_string();
    let client = OrderClient::new(config).unwrap();

    // Nothing bound yet
    assert!(matches!(get_current(), Err(OrderError::NotInitialized)));
    assert!(get_check_details().await.unwrap().is_none());
    assert!(close_table().await.unwrap().is_none());
    assert!(current_table_url().unwrap().is_none());
    close.assert_hits_async(0).await;

    // Fixture binds into the global registry
    let fixture = TableFixture::open(&client, 10).await.unwrap();
    assert!(Arc::ptr_eq(&get_current().unwrap(), fixture.check()));

    let details = get_check_details().await.unwrap().unwrap();
    assert_eq!(details.transaction_guid.as_deref(), Some(GUID));
    assert!(current_table_url()
        .unwrap()
        .unwrap()
        .ends_with("/38A31859-CA10-452C-BF40-ED361D7F6749"));

    assert_eq!(
        close_table().await.unwrap(),
        Some(CloseOutcome::Closed { amount: 8.5 })
    );
    assert_eq!(close_table().await.unwrap(), Some(CloseOutcome::AlreadyClosed));

    // Teardown finds the check closed and only unbinds
    assert!(fixture.teardown().await);
    close.assert_hits_async(1).await;
    assert!(get_check_details().await.unwrap().is_none());

    // Manual binding works the same way
    let check = Arc::new(client.setup_table(10).await.unwrap());
    assert!(set_current(Arc::clone(&check)).is_none());
    assert_eq!(get_current().unwrap().transaction_number(), "42");
    assert!(clear_current().is_some());
    assert!(matches!(get_current(), Err(OrderError::NotInitialized)));

    // with_table tears down even when the body leaves the check open
    let table = with_table(&client, 10, |check| async move {
        assert!(!check.is_closed());
        check.table_number()
    })
    .await
    .unwrap();
    assert_eq!(table, 10);
    close.assert_hits_async(2).await;
    assert!(close_table().await.unwrap().is_none());
}
