//! Digital Order API client
//!
//! Drives one table's check through authenticate → open → details → close.
//! The table number is only used to open (or rediscover) the check; every
//! call after that is keyed by transaction GUID.

use std::sync::Arc;

use tracing::{debug, info, warn};

use dorder_common::types::{
    AddItemsRequest, ApiStatus, Cart, CartItem, CheckDetails, CheckKey, CloseCheckRequest,
    CreateCheckRequest, CreateCheckResponse, GetCheckRequest, Menu, Payment,
    SessionBeginRequest, SessionBeginResponse, StatusResponse,
};
use dorder_common::ApiConfig;

use crate::check::OpenCheck;
use crate::error::{OrderError, OrderResult, TransportError};
use crate::session::{
    Authenticated, CheckIds, CheckResolution, HasSession, Open, OpenedVia, TableContext,
    TableSession, Unauthenticated,
};
use crate::transport::{call, paths, HttpTransport, Transport};

/// Amount paid when the check total cannot be determined
pub const FALLBACK_PAYMENT_AMOUNT: f64 = 10_000.0;

/// Order type sent when opening a check
const ORDER_TYPE_DINE_IN: u32 = 1;

/// Client for the Digital Order API
#[derive(Clone)]
pub struct OrderClient {
    config: Arc<ApiConfig>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for OrderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderClient")
            .field("base_url", &self.config.base_url)
            .field("property_id", &self.config.venue.property_id)
            .field("revenue_center_id", &self.config.venue.revenue_center_id)
            .finish_non_exhaustive()
    }
}

impl OrderClient {
    /// Create a client that talks HTTP to `config.base_url`
    pub fn new(config: ApiConfig) -> OrderResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config).map_err(|e| {
            dorder_common::Error::InvalidConfig(format!("cannot build HTTP client: {}", e))
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fresh, unauthenticated session for a table
    pub fn session(&self, table_number: u32) -> TableSession<Unauthenticated> {
        TableSession::new(TableContext::from_config(&self.config, table_number))
    }

    /// Begin an API session
    pub async fn authenticate(
        &self,
        session: TableSession<Unauthenticated>,
    ) -> OrderResult<TableSession<Authenticated>> {
        let request = SessionBeginRequest {
            client_id: self.config.credentials.client_id.clone(),
            username: self.config.credentials.username.clone(),
            passkey: self.config.credentials.passkey.clone(),
        };

        info!("Authenticating with API for table {}", session.table_number());
        let response: SessionBeginResponse =
            call(self.transport.as_ref(), paths::SESSION_BEGIN, &request)
                .await
                .map_err(|e| OrderError::Authentication(e.to_string()))?;

        let session_id = response
            .session_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| OrderError::Authentication("response has no SessionID".to_string()))?;

        debug!("Authenticated, session {}", session_id);
        Ok(session.authenticated(session_id))
    }

    /// Open a check for the table, picking up an existing one if the table
    /// is already open
    pub async fn resolve_check(&self, session: &TableSession<Authenticated>) -> CheckResolution {
        let table = session.table_number();

        match self.create_check(session).await {
            Ok(ids) => {
                info!(
                    "Created check for table {} (TransactionGuid: {})",
                    table,
                    ids.transaction_guid()
                );
                return CheckResolution::Created(ids);
            }
            Err(reason) => {
                warn!(
                    "Create did not return a check for table {} ({}); \
                     table may already be open, looking it up",
                    table, reason
                );
            }
        }

        let lookup = self
            .find_check(session, CheckKey::Table(table))
            .await
            .map_err(|e| e.to_string())
            .and_then(|details| {
                CheckIds::new(details.transaction_guid, details.transaction_number).ok_or_else(|| {
                    "lookup response lacks TransactionGuid or TransactionNumber".to_string()
                })
            });

        match lookup {
            Ok(ids) => {
                info!(
                    "Recovered open check for table {} (TransactionGuid: {})",
                    table,
                    ids.transaction_guid()
                );
                CheckResolution::Recovered(ids)
            }
            Err(reason) => CheckResolution::Failed(reason),
        }
    }

    /// Advance an authenticated session to an open one
    pub async fn open_check(
        &self,
        session: TableSession<Authenticated>,
    ) -> OrderResult<(TableSession<Open>, OpenedVia)> {
        let (ids, via) = self
            .resolve_check(&session)
            .await
            .into_result(session.table_number())?;
        Ok((session.opened(ids), via))
    }

    /// Authenticate and open a check for `table_number`
    pub async fn setup_table(&self, table_number: u32) -> OrderResult<OpenCheck> {
        let session = self.authenticate(self.session(table_number)).await?;
        let (session, via) = self.open_check(session).await?;
        info!(
            "Table {} setup complete ({}, TransactionNumber: {})",
            table_number,
            via,
            session.transaction_number()
        );
        Ok(OpenCheck::new(self.clone(), session, via))
    }

    /// Pick up the check already open on `table_number` without creating one
    ///
    /// `Ok(None)` when the lookup finds no open check on the table.
    pub async fn recover_table(&self, table_number: u32) -> OrderResult<Option<OpenCheck>> {
        let session = self.authenticate(self.session(table_number)).await?;

        let details = match self.find_check(&session, CheckKey::Table(table_number)).await {
            Ok(details) => details,
            Err(LookupFailure::Status(status)) => {
                info!("No open check on table {} (status {:?})", table_number, status);
                return Ok(None);
            }
            Err(e) => return Err(OrderError::Fetch(e.to_string())),
        };

        match CheckIds::new(details.transaction_guid, details.transaction_number) {
            Some(ids) => {
                info!(
                    "Recovered open check for table {} (TransactionGuid: {})",
                    table_number,
                    ids.transaction_guid()
                );
                let session = session.opened(ids);
                Ok(Some(OpenCheck::new(self.clone(), session, OpenedVia::Recovered)))
            }
            None => {
                info!("No open check on table {}", table_number);
                Ok(None)
            }
        }
    }

    /// Current contents and totals of an open check
    pub async fn check_details(&self, session: &TableSession<Open>) -> OrderResult<CheckDetails> {
        let key = CheckKey::Guid(session.transaction_guid().to_string());
        self.find_check(session, key)
            .await
            .map_err(|e| OrderError::Fetch(e.to_string()))
    }

    /// Add items to an open check
    pub async fn add_items(
        &self,
        session: &TableSession<Open>,
        items: Vec<CartItem>,
    ) -> OrderResult<()> {
        let count = items.len();
        let request = AddItemsRequest {
            scope: session.scope(),
            table_number: session.table_number(),
            transaction_guid: session.transaction_guid().to_string(),
            cart: Cart { items },
        };

        let response: StatusResponse = call(self.transport.as_ref(), paths::CHECK_ADD, &request)
            .await
            .map_err(|e| OrderError::AddItems(e.to_string()))?;

        // The add endpoint does not always send a Status; only an explicit
        // non-SUCCESS is a failure.
        if response.status.is_some() && !response.is_success() {
            return Err(OrderError::AddItems(format!(
                "API returned status {:?}",
                response.status
            )));
        }

        info!("Added {} item(s) to table {}", count, session.table_number());
        Ok(())
    }

    /// Pay the check off with the configured test tender and close it
    ///
    /// Returns the amount paid. Does not track whether the check was
    /// already closed; [`OpenCheck::close`] does.
    pub async fn pay_and_close(&self, session: &TableSession<Open>) -> OrderResult<f64> {
        let table = session.table_number();

        debug!("Getting check details before closing table {}", table);
        let details = match self.check_details(session).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!("Could not get check details for table {}: {}", table, e);
                None
            }
        };
        let amount = match details.as_ref().and_then(check_total) {
            Some(total) => total,
            None => {
                warn!(
                    "No usable total for table {}, paying fallback amount {:.2}",
                    table, FALLBACK_PAYMENT_AMOUNT
                );
                FALLBACK_PAYMENT_AMOUNT
            }
        };

        let tender = &self.config.tender;
        let request = CloseCheckRequest {
            scope: session.scope(),
            table_number: table,
            transaction_guid: session.transaction_guid().to_string(),
            tip: 0.0,
            payment: Payment {
                amount,
                card_number: tender.card_number.clone(),
                tender_type: tender.tender_type.clone(),
                auth_code: tender.auth_code.clone(),
                payment_token: tender.payment_token.clone(),
            },
        };

        info!(
            "Closing table {} (TransactionGuid: {}), paying {:.2}",
            table,
            session.transaction_guid(),
            amount
        );
        let response: StatusResponse = call(self.transport.as_ref(), paths::CHECK_CLOSE, &request)
            .await
            .map_err(|e| OrderError::Close(e.to_string()))?;

        if !response.is_success() {
            return Err(OrderError::Close(format!(
                "API returned status {:?}",
                response.status
            )));
        }

        Ok(amount)
    }

    /// Full menu for the configured revenue center
    pub async fn full_menu<S: HasSession>(&self, session: &TableSession<S>) -> OrderResult<Menu> {
        info!(
            "Fetching full menu for property {}, revenue center {}",
            session.context().property_id,
            session.context().revenue_center_id
        );
        let menu: Menu = call(self.transport.as_ref(), paths::MENU, &session.scope())
            .await
            .map_err(|e| OrderError::Menu(e.to_string()))?;

        debug!("Menu has {} item(s)", menu.items.len());
        Ok(menu)
    }

    async fn create_check(
        &self,
        session: &TableSession<Authenticated>,
    ) -> Result<CheckIds, String> {
        let request = CreateCheckRequest {
            scope: session.scope(),
            table_number: session.table_number(),
            order_type_id_ref: ORDER_TYPE_DINE_IN,
            employee_number: self.config.venue.employee_number,
            guest_check_ref: String::new(),
            cart: Cart::default(),
        };

        let response: CreateCheckResponse =
            call(self.transport.as_ref(), paths::CHECK_CREATE, &request)
                .await
                .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("status {:?}", response.status));
        }

        let order = response
            .order
            .ok_or_else(|| "response has no Order".to_string())?;
        CheckIds::new(order.transaction_guid, order.transaction_number)
            .ok_or_else(|| "Order lacks TransactionGuid or TransactionNumber".to_string())
    }

    async fn find_check<S: HasSession>(
        &self,
        session: &TableSession<S>,
        key: CheckKey,
    ) -> Result<CheckDetails, LookupFailure> {
        let request = GetCheckRequest::new(session.scope(), key);
        let details: CheckDetails =
            call(self.transport.as_ref(), paths::CHECK_GET, &request).await?;

        if !details.is_success() {
            return Err(LookupFailure::Status(details.status));
        }
        Ok(details)
    }
}

/// Why an `opencheck/get` call did not produce a check
#[derive(Debug)]
enum LookupFailure {
    Transport(TransportError),
    Status(Option<String>),
}

impl From<TransportError> for LookupFailure {
    fn from(e: TransportError) -> Self {
        LookupFailure::Transport(e)
    }
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::Transport(e) => write!(f, "{}", e),
            LookupFailure::Status(status) => write!(f, "API returned status {:?}", status),
        }
    }
}

/// Amount to pay on close: the first non-zero of amount due and total price
fn check_total(details: &CheckDetails) -> Option<f64> {
    [details.amount_due_total, details.total_price]
        .into_iter()
        .flatten()
        .find(|amount| *amount != 0.0)
}
