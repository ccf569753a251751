//! # Catalog
//!
//! Read-only view over one snapshot of categories, products and groups.
//!
//! The external data layer replaces the whole snapshot whenever the backend
//! pushes a change; nothing here mutates it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Category, Product, ProductGroup};

/// Catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub groups: Vec<ProductGroup>,
}

/// `display_order` first (unset sorts last), then by label.
fn by_display_order(a: (Option<i32>, &str), b: (Option<i32>, &str)) -> Ordering {
    match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(b.1),
    }
}

impl Catalog {
    pub fn new(categories: Vec<Category>, products: Vec<Product>, groups: Vec<ProductGroup>) -> Self {
        Catalog {
            categories,
            products,
            groups,
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&ProductGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Groups a customer configures for `product`: attached, active, in
    /// `group_ids` order, each restricted to its active options. Dangling
    /// ids are skipped.
    pub fn attached_groups(&self, product: &Product) -> Vec<ProductGroup> {
        product
            .group_ids
            .iter()
            .filter_map(|gid| self.group(gid))
            .filter(|g| g.active)
            .map(ProductGroup::selectable)
            .collect()
    }

    /// Active categories in menu order.
    pub fn visible_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().filter(|c| c.active).collect();
        categories.sort_by(|a, b| {
            by_display_order((a.display_order, &a.title), (b.display_order, &b.title))
        });
        categories
    }

    /// Active products of a category in menu order.
    pub fn products_in_category(&self, category_id: &str) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.active && p.category_id == category_id)
            .collect();
        products.sort_by(|a, b| by_display_order((a.display_order, &a.name), (b.display_order, &b.name)));
        products
    }

    /// Name of an option in any group, for order messages.
    pub fn option_name(&self, option_id: &str) -> Option<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.options.iter())
            .find(|o| o.id == option_id)
            .map(|o| o.name.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
