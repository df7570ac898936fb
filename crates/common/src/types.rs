//! Wire types for the Digital Order REST API
//!
//! Field names follow the API's PascalCase convention, with the odd
//! lower-case keys (`username`, `passkey`, `cart`, `items`) it also uses.
//! Responses keep unknown fields in `extra` so callers can inspect anything
//! the typed view does not model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `Status` value the API uses for a successful call
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Responses that carry an API-level `Status`
pub trait ApiStatus {
    fn status(&self) -> Option<&str>;

    fn is_success(&self) -> bool {
        self.status() == Some(STATUS_SUCCESS)
    }
}

/// Body of `/v2/catalog/session/begin`
#[derive(Debug, Clone, Serialize)]
pub struct SessionBeginRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub username: String,
    pub passkey: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionBeginResponse {
    #[serde(rename = "SessionID", default)]
    pub session_id: Option<String>,
}

/// Property / revenue center / client / session scope sent with every
/// order call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckScope {
    #[serde(rename = "PropertyID")]
    pub property_id: String,
    #[serde(rename = "RevenueCenterID")]
    pub revenue_center_id: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "SessionID")]
    pub session_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

/// One line item in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartItem {
    #[serde(rename = "ID")]
    pub id: String,
    pub price: f64,
    pub quantity: u32,
    pub free_text: Option<String>,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Value>,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            price,
            quantity: 1,
            free_text: None,
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Body of `/v2/order/fullcart/opencheck/create`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCheckRequest {
    #[serde(flatten)]
    pub scope: CheckScope,
    pub table_number: u32,
    pub order_type_id_ref: u32,
    pub employee_number: u32,
    pub guest_check_ref: String,
    #[serde(rename = "cart")]
    pub cart: Cart,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCheckResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order: Option<OrderRef>,
}

impl ApiStatus for CreateCheckResponse {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Transaction identifiers nested under `Order` in a create response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderRef {
    #[serde(default)]
    pub transaction_guid: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub transaction_number: Option<String>,
}

/// Key used to look an open check up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKey {
    /// Slow path, used once while discovering an already-open check
    Table(u32),
    /// Fast path, used for everything after the check is known
    Guid(String),
}

/// Body of `/v2/order/fullcart/opencheck/get`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCheckRequest {
    #[serde(flatten)]
    pub scope: CheckScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_guid: Option<String>,
}

impl GetCheckRequest {
    pub fn new(scope: CheckScope, key: CheckKey) -> Self {
        let (table_number, transaction_guid) = match key {
            CheckKey::Table(number) => (Some(number), None),
            CheckKey::Guid(guid) => (None, Some(guid)),
        };
        Self {
            scope,
            table_number,
            transaction_guid,
        }
    }
}

/// Check contents and totals as returned by `opencheck/get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckDetails {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_guid: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub transaction_number: Option<String>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub amount_due_total: Option<f64>,
    #[serde(default)]
    pub total_tax: Option<f64>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiStatus for CheckDetails {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Payment block of a close request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub amount: f64,
    pub card_number: String,
    pub tender_type: String,
    pub auth_code: String,
    pub payment_token: String,
}

/// Body of `/v2/order/fullcart/opencheck/close`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloseCheckRequest {
    #[serde(flatten)]
    pub scope: CheckScope,
    pub table_number: u32,
    pub transaction_guid: String,
    pub tip: f64,
    pub payment: Payment,
}

/// Body of `/v2/order/fullcart/opencheck/add`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddItemsRequest {
    #[serde(flatten)]
    pub scope: CheckScope,
    pub table_number: u32,
    pub transaction_guid: String,
    #[serde(rename = "cart")]
    pub cart: Cart,
}

/// Response that is only inspected for its `Status`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiStatus for StatusResponse {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Full menu for a revenue center
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Menu {
    pub items: Vec<MenuItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuItem {
    #[serde(rename = "ID", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub is_out_of_stock: bool,
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuCategory {
    #[serde(rename = "ID", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub is_alcohol: bool,
    #[serde(default)]
    pub active: bool,
}

/// The API is not consistent about quoting identifiers
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope() -> CheckScope {
        CheckScope {
            property_id: "33".to_string(),
            revenue_center_id: "810".to_string(),
            client_id: "client".to_string(),
            session_id: "sess".to_string(),
        }
    }

    #[test]
    fn test_get_request_by_table_omits_guid() {
        let request = GetCheckRequest::new(scope(), CheckKey::Table(10));
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["TableNumber"], 10);
        assert_eq!(body["PropertyID"], "33");
        assert_eq!(body["SessionID"], "sess");
        assert!(body.get("TransactionGuid").is_none());
    }

    #[test]
    fn test_get_request_by_guid_omits_table() {
        let body = serde_json::to_value(GetCheckRequest::new(
            scope(),
            CheckKey::Guid("abc".to_string()),
        ))
        .unwrap();
        assert_eq!(body["TransactionGuid"], "abc");
        assert!(body.get("TableNumber").is_none());
    }

    #[test]
    fn test_create_request_shape() {
        let request = CreateCheckRequest {
            scope: scope(),
            table_number: 10,
            order_type_id_ref: 1,
            employee_number: 90004,
            guest_check_ref: String::new(),
            cart: Cart::default(),
        };
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["OrderTypeIdRef"], 1);
        assert_eq!(body["EmployeeNumber"], 90004);
        assert_eq!(body["GuestCheckRef"], "");
        assert_eq!(body["cart"], json!({ "items": [] }));
    }

    #[test]
    fn test_create_response_with_numeric_transaction_number() {
        let response: CreateCheckResponse = serde_json::from_value(json!({
            "Status": "SUCCESS",
            "Order": { "TransactionGuid": "g-1", "TransactionNumber": 4711 }
        }))
        .unwrap();
        assert!(response.is_success());
        let order = response.order.unwrap();
        assert_eq!(order.transaction_guid.as_deref(), Some("g-1"));
        assert_eq!(order.transaction_number.as_deref(), Some("4711"));
    }

    #[test]
    fn test_check_details_keeps_unknown_fields() {
        let details: CheckDetails = serde_json::from_value(json!({
            "Status": "SUCCESS",
            "TransactionGuid": "g-1",
            "TransactionNumber": "12",
            "Subtotal": 14.99,
            "AmountDueTotal": 16.2,
            "TotalTax": 1.21,
            "Items": [{ "Name": "Just Bacon Burger" }]
        }))
        .unwrap();
        assert!(details.is_success());
        assert_eq!(details.amount_due_total, Some(16.2));
        assert_eq!(details.total_price, None);
        assert!(details.extra.contains_key("Items"));
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let response: StatusResponse =
            serde_json::from_value(json!({ "Status": "success" })).unwrap();
        assert!(!response.is_success());
    }

    #[test]
    fn test_cart_item_wire_names() {
        let item = CartItem::new("811705004-1", "Just Bacon Burger", 14.99);
        let body = serde_json::to_value(item).unwrap();
        assert_eq!(
            body,
            json!({
                "ID": "811705004-1",
                "Price": 14.99,
                "Quantity": 1,
                "FreeText": null,
                "Name": "Just Bacon Burger",
                "Modifiers": []
            })
        );
    }

    #[test]
    fn test_menu_requires_items() {
        assert!(serde_json::from_value::<Menu>(json!({ "Categories": [] })).is_err());
        let menu: Menu = serde_json::from_value(json!({
            "Items": [{
                "ID": 7,
                "Name": "Fries",
                "Active": true,
                "Categories": [{ "ID": "c1", "Name": "Sides", "DisplayOrder": 3 }]
            }]
        }))
        .unwrap();
        assert_eq!(menu.items[0].id, "7");
        assert_eq!(menu.items[0].categories[0].display_order, Some(3));
        assert!(!menu.items[0].is_out_of_stock);
    }
}
