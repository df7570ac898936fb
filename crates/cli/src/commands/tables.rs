//! Table Commands
//!
//! Offline lookups against the built-in table mapping.

use anyhow::{Context, Result};
use serde::Serialize;

use dorder_common::{table_url, ApiConfig, TableIdentity};

use crate::output::{print_list, OutputFormat, TableDisplay};

/// Table display wrapper for serialization
#[derive(Serialize)]
pub struct TableRow {
    pub table_number: u32,
    pub table_guid: String,
    pub url: String,
}

impl TableRow {
    fn new(identity: TableIdentity, frontend_base_url: &str) -> Self {
        Self {
            table_number: identity.table_number,
            table_guid: identity.table_guid.to_string(),
            url: identity.url_on(frontend_base_url),
        }
    }
}

impl TableDisplay for TableRow {
    fn headers() -> Vec<&'static str> {
        vec!["Table", "GUID", "URL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.table_number.to_string(),
            self.table_guid.clone(),
            self.url.clone(),
        ]
    }
}

/// `dorder tables`
pub fn list(config: &ApiConfig, format: OutputFormat) {
    let rows: Vec<TableRow> = TableIdentity::all()
        .map(|identity| TableRow::new(identity, &config.frontend_base_url))
        .collect();
    print_list(&rows, format);
}

/// `dorder url <TABLE>`
pub fn url(config: &ApiConfig, table: u32, format: OutputFormat) -> Result<()> {
    let url = table_url(&config.frontend_base_url, table)
        .with_context(|| format!("No frontend URL for table {}", table))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "table_number": table, "url": url }))
        }
        _ => println!("{}", url),
    }
    Ok(())
}
