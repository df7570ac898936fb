//! Queries over a fetched menu

use std::collections::HashSet;

use serde::Serialize;

use dorder_common::types::{Menu, MenuCategory, MenuItem};

/// Display order assumed for categories that do not declare one
const UNORDERED: i64 = 999;

/// A category together with the orderable items in it
#[derive(Debug, Clone, Serialize)]
pub struct CategoryItems {
    pub category: MenuCategory,
    pub items: Vec<MenuItem>,
}

/// Unique categories across all items, in display order
pub fn categories(menu: &Menu) -> Vec<MenuCategory> {
    let mut seen = HashSet::new();
    let mut categories: Vec<MenuCategory> = menu
        .items
        .iter()
        .flat_map(|item| item.categories.iter())
        .filter(|category| !category.id.is_empty() && seen.insert(category.id.clone()))
        .cloned()
        .collect();

    categories.sort_by_key(|c| c.display_order.unwrap_or(UNORDERED));
    categories
}

/// Items listed under a category
pub fn items_in_category<'a>(menu: &'a Menu, category_id: &str) -> Vec<&'a MenuItem> {
    menu.items
        .iter()
        .filter(|item| item.categories.iter().any(|c| c.id == category_id))
        .collect()
}

/// Item by name, ignoring case and surrounding whitespace
pub fn find_item<'a>(menu: &'a Menu, name: &str) -> Option<&'a MenuItem> {
    let wanted = name.trim();
    menu.items
        .iter()
        .find(|item| item.name.trim().eq_ignore_ascii_case(wanted))
}

/// Orderable means active and in stock
pub fn is_orderable(item: &MenuItem) -> bool {
    item.active && !item.is_out_of_stock
}

/// The active category with the fewest orderable items (at least one)
///
/// Ties go to the category shown first.
pub fn sparsest_category(menu: &Menu, exclude_alcohol: bool) -> Option<CategoryItems> {
    categories(menu)
        .into_iter()
        .filter(|c| c.active && !(exclude_alcohol && c.is_alcohol))
        .map(|category| {
            let items = items_in_category(menu, &category.id)
                .into_iter()
                .filter(|item| is_orderable(item))
                .cloned()
                .collect::<Vec<_>>();
            CategoryItems { category, items }
        })
        .filter(|c| !c.items.is_empty())
        .min_by_key(|c| c.items.len())
}
