use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money;

pub const DEFAULT_MIN_STOCK: u32 = 5;

/// An inventory item tracked by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub initial_stock: u32,
    pub current_stock: u32,
    pub cost_price: f64,
    pub sale_price: f64,
    #[serde(default = "Product::min_stock_default")]
    pub min_stock: u32,
    /// Derived from `cost_price`/`sale_price`; recomputed on every write.
    pub margin_percent: f64,
}

impl Product {
    pub fn new(draft: ProductDraft) -> Self {
        let margin = money::margin_percent(draft.cost_price, draft.sale_price);
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            initial_stock: draft.initial_stock,
            current_stock: draft.current_stock,
            cost_price: draft.cost_price,
            sale_price: draft.sale_price,
            min_stock: draft.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            margin_percent: margin,
        }
    }

    /// True when the stock level has reached the alert threshold.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    pub fn min_stock_default() -> u32 {
        DEFAULT_MIN_STOCK
    }
}

/// Input for creating a product. Validation happens in the registry service.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub initial_stock: u32,
    pub current_stock: u32,
    pub cost_price: f64,
    pub sale_price: f64,
    pub min_stock: Option<u32>,
}

/// Partial update applied to an existing product. Unset fields keep their
/// current value; the merged result is validated before anything commits.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub initial_stock: Option<u32>,
    pub current_stock: Option<u32>,
    pub cost_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub min_stock: Option<u32>,
}
