//! # Store Commands
//!
//! Header status and the menu listing.

use serde::Serialize;
use storefront_core::{Category, Product};
use tracing::debug;

use crate::state::{CatalogState, StatusState, StoreStatus};

/// Current open/closed status with its banner text.
pub fn get_store_status(status: &StatusState) -> StoreStatus {
    debug!("get_store_status command");
    status.current()
}

/// One category and its products, as laid out on the menu page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Active categories in menu order, each with its active products.
///
/// Categories with no active product are left out.
pub fn get_menu(catalog: &CatalogState) -> Vec<MenuSection> {
    debug!("get_menu command");
    catalog.with_snapshot(|s| {
        s.catalog
            .visible_categories()
            .into_iter()
            .filter_map(|category| {
                let products: Vec<Product> = s
                    .catalog
                    .products_in_category(&category.id)
                    .into_iter()
                    .cloned()
                    .collect();
                (!products.is_empty()).then(|| MenuSection {
                    category: category.clone(),
                    products,
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::fixture;
    use storefront_core::StoreStatusMode;

    #[test]
    fn test_get_store_status() {
        let f = fixture(StoreStatusMode::Closed);
        let status = get_store_status(&f.status);
        assert!(!status.is_open);
        assert_eq!(status.message, "🔴 Loja Fechada");

        let f = fixture(StoreStatusMode::Auto);
        assert!(get_store_status(&f.status).is_open);
    }

    #[test]
    fn test_get_menu_hides_inactive_products() {
        let f = fixture(StoreStatusMode::Open);
        let menu = get_menu(&f.catalog);

        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].category.title, "Açaís");
        let names: Vec<&str> = menu[0].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Açaí 300ml", "Açaí 500ml"]);
    }

    #[test]
    fn test_get_menu_serializes_camel_case() {
        let f = fixture(StoreStatusMode::Open);
        let json = serde_json::to_value(get_menu(&f.catalog)).unwrap();
        assert_eq!(json[0]["products"][0]["categoryId"], "c1");
    }
}
