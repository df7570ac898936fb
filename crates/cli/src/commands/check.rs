//! Check Commands
//!
//! Each invocation authenticates on its own. `open` and `add-item` open
//! the table's check, recovering one that is already open; `details` and
//! `close` only look up an open check and never create one. Nothing is
//! remembered between runs; the API is the only state.

use anyhow::{bail, Result};
use chrono::Local;
use clap::Args;
use tracing::debug;

use dorder_common::types::{CartItem, CheckDetails};
use dorder_e2e::{
    close_table, get_check_details, resolve_table_number, CheckSummary, CloseOutcome, OrderClient,
    TableFixture,
};

use crate::output::{
    amount, print_info, print_item, print_success, print_warning, OutputFormat, TableDisplay,
};

#[derive(Args)]
pub struct TableArgs {
    /// Table number (defaults to $DORDER_TABLE, then table 10)
    #[arg(short, long)]
    pub table: Option<u32>,
}

impl TableArgs {
    pub fn resolve(&self) -> Result<u32> {
        let table = match self.table {
            Some(table) => table,
            None => resolve_table_number()?,
        };
        debug!("Using table {}", table);
        Ok(table)
    }
}

#[derive(Args)]
pub struct AddItemArgs {
    /// Table number
    #[arg(short, long)]
    pub table: u32,

    /// Menu item ID
    #[arg(long)]
    pub id: String,

    /// Menu item name
    #[arg(long)]
    pub name: String,

    /// Unit price
    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
}

impl TableDisplay for CheckSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Table", "Transaction GUID", "Number", "Session", "Opened", "Via", "Closed"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.table_number.to_string(),
            self.transaction_guid.clone(),
            self.transaction_number.clone(),
            self.session_id.clone(),
            self.opened_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            self.opened_via.to_string(),
            self.closed.to_string(),
        ]
    }
}

impl TableDisplay for CheckDetails {
    fn headers() -> Vec<&'static str> {
        vec!["Transaction GUID", "Number", "Status", "Subtotal", "Tax", "Total", "Amount Due"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.transaction_guid.clone().unwrap_or_default(),
            self.transaction_number.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
            amount(self.subtotal),
            amount(self.total_tax),
            amount(self.total_price),
            amount(self.amount_due_total),
        ]
    }
}

impl TableDisplay for CloseOutcome {
    fn headers() -> Vec<&'static str> {
        vec!["Outcome", "Paid"]
    }

    fn row(&self) -> Vec<String> {
        match self {
            CloseOutcome::Closed { amount: paid } => {
                vec!["closed".to_string(), amount(Some(*paid))]
            }
            CloseOutcome::AlreadyClosed => vec!["already closed".to_string(), amount(None)],
        }
    }
}

/// `dorder open`
pub async fn open(args: TableArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    let table = args.resolve()?;
    let check = client.setup_table(table).await?;

    print_success(&format!("Table {} has an open check ({})", table, check.opened_via()));
    print_item(&check.summary(), format);
    if let Ok(url) = check.table_url() {
        print_info(&format!("Order at {}", url));
    }
    Ok(())
}

fn nothing_open(table: u32) {
    print_info(&format!("Nothing open on table {}", table));
}

/// `dorder details`
pub async fn details(args: TableArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    let table = args.resolve()?;
    let Some(check) = client.recover_table(table).await? else {
        nothing_open(table);
        return Ok(());
    };

    let details = check.check_details().await?;
    print_item(&details, format);
    Ok(())
}

/// `dorder add-item`
pub async fn add_item(args: AddItemArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    if args.quantity == 0 {
        bail!("Quantity must be at least 1");
    }

    let check = client.setup_table(args.table).await?;
    let item = CartItem::new(args.id, args.name.clone(), args.price).with_quantity(args.quantity);
    debug!("Adding {:?} to check {}", item, check.transaction_guid());
    check.add_items(vec![item]).await?;

    print_success(&format!(
        "Added {} x {} to table {}",
        args.quantity, args.name, args.table
    ));
    print_item(&check.check_details().await?, format);
    Ok(())
}

/// `dorder close`
pub async fn close(args: TableArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    let table = args.resolve()?;
    let Some(check) = client.recover_table(table).await? else {
        nothing_open(table);
        return Ok(());
    };

    debug!("Closing check {} on table {}", check.transaction_guid(), table);
    let outcome = check.close().await?;

    print_success(&format!("Table {} closed", table));
    print_item(&outcome, format);
    Ok(())
}

/// `dorder smoke`
///
/// Runs the lifecycle a test would: fixture setup, reads through the
/// global accessors, a close, and fixture teardown.
pub async fn smoke(args: TableArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    let table = args.resolve()?;

    print_info(&format!("Setting up table {}", table));
    let fixture = TableFixture::open(client, table).await?;
    print_item(&fixture.check().summary(), format);

    match get_check_details().await? {
        Some(details) => print_item(&details, format),
        None => bail!("Fixture did not bind table {}", table),
    }

    let outcome = close_table().await?;
    debug!("Close through the registry returned {:?}", outcome);
    if let Some(outcome) = &outcome {
        print_item(outcome, format);
    }

    // Teardown must find the check already closed
    if !fixture.teardown().await {
        bail!("Teardown could not close table {}", table);
    }
    if close_table().await?.is_some() {
        print_warning("Registry still bound after teardown");
    }

    print_success(&format!("Lifecycle for table {} completed", table));
    Ok(())
}
