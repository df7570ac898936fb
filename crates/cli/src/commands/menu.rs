//! Menu Commands

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dorder_common::types::{Menu, MenuItem};
use dorder_common::DEFAULT_TABLE_NUMBER;
use dorder_e2e::menu::{categories, is_orderable, items_in_category, sparsest_category};
use dorder_e2e::OrderClient;

use crate::output::{amount, print_info, print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct MenuArgs {
    /// List categories instead of items
    #[arg(long)]
    pub categories: bool,
}

/// Menu item display wrapper for serialization
#[derive(Serialize)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub price: Option<f64>,
    pub orderable: bool,
    pub categories: Vec<String>,
}

impl From<&MenuItem> for ItemRow {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            orderable: is_orderable(item),
            categories: item.categories.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

impl TableDisplay for ItemRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Price", "Orderable", "Categories"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            amount(self.price),
            self.orderable.to_string(),
            self.categories.join(", "),
        ]
    }
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub display_order: Option<i64>,
    pub items: usize,
    pub alcohol: bool,
}

impl TableDisplay for CategoryRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Order", "Items", "Alcohol"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.display_order
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.items.to_string(),
            self.alcohol.to_string(),
        ]
    }
}

fn category_rows(menu: &Menu) -> Vec<CategoryRow> {
    categories(menu)
        .into_iter()
        .map(|category| CategoryRow {
            items: items_in_category(menu, &category.id).len(),
            id: category.id,
            name: category.name,
            display_order: category.display_order,
            alcohol: category.is_alcohol,
        })
        .collect()
}

/// `dorder menu`
///
/// The menu only needs a session, so no check is opened.
pub async fn execute(args: MenuArgs, client: &OrderClient, format: OutputFormat) -> Result<()> {
    let session = client.authenticate(client.session(DEFAULT_TABLE_NUMBER)).await?;
    let menu = client.full_menu(&session).await?;

    if args.categories {
        print_list(&category_rows(&menu), format);
        if let Some(sparsest) = sparsest_category(&menu, true) {
            print_info(&format!(
                "Smallest non-alcohol category: {} ({} orderable item(s))",
                sparsest.category.name,
                sparsest.items.len()
            ));
        }
    } else {
        let rows: Vec<ItemRow> = menu.items.iter().map(ItemRow::from).collect();
        print_list(&rows, format);
    }
    Ok(())
}
