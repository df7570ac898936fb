//! HTTP transport for the Digital Order API
//!
//! Every API call is a JSON `POST` carrying the subscription key header.
//! Anything other than `200 OK` is a transport failure; API-level `Status`
//! checks happen one layer up, in the client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use dorder_common::ApiConfig;

use crate::error::TransportError;

/// Header carrying the API gateway subscription key
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Endpoint paths, relative to the API base URL
pub mod paths {
    pub const SESSION_BEGIN: &str = "/v2/catalog/session/begin";
    pub const CHECK_CREATE: &str = "/v2/order/fullcart/opencheck/create";
    pub const CHECK_GET: &str = "/v2/order/fullcart/opencheck/get";
    pub const CHECK_ADD: &str = "/v2/order/fullcart/opencheck/add";
    pub const CHECK_CLOSE: &str = "/v2/order/fullcart/opencheck/close";
    pub const MENU: &str = "/v2/catalog/menuitems/modifiergroups/byrevenuecenter";
}

/// A way of sending one JSON request and getting one JSON response back
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError>;
}

/// Transport backed by `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    subscription_key: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            subscription_key: config.subscription_key.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Send a typed request and decode a typed response
pub async fn call<Req, Resp>(
    transport: &dyn Transport,
    path: &str,
    request: &Req,
) -> Result<Resp, TransportError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let body = serde_json::to_value(request)?;
    let value = transport.post(path, body).await?;
    Ok(serde_json::from_value(value)?)
}
