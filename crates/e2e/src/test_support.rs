//! Scripted transport for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use dorder_common::ApiConfig;

use crate::client::OrderClient;
use crate::error::TransportError;
use crate::transport::{paths, Transport};

pub enum Reply {
    Json(Value),
    Status(u16),
}

/// Replays queued replies per path and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn json(&self, path: &str, body: Value) {
        self.reply(path, Reply::Json(body));
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|(p, _)| p == path).count()
    }

    /// Script a successful auth plus create for `guid`
    pub fn script_open(&self, guid: &str, number: &str) {
        self.json(paths::SESSION_BEGIN, json!({ "SessionID": "session-1" }));
        self.json(
            paths::CHECK_CREATE,
            json!({
                "Status": "SUCCESS",
                "Order": { "TransactionGuid": guid, "TransactionNumber": number }
            }),
        );
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.requests.lock().push((path.to_string(), body));
        let reply = self
            .replies
            .lock()
            .get_mut(path)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(TransportError::Status {
                status,
                body: String::new(),
            }),
            None => Err(TransportError::Status {
                status: 404,
                body: format!("no scripted reply for {}", path),
            }),
        }
    }
}

pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.base_url = "http://scripted.invalid".to_string();
    config.subscription_key = "test-key".to_string();
    config.credentials.passkey = "test-pass".to_string();
    config
}

pub fn scripted_client() -> (OrderClient, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new();
    let client = OrderClient::with_transport(test_config(), transport.clone());
    (client, transport)
}
