use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{movement::CashMovement, product::Product, trade::TradeRecord};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Root state of the whole system: the product registry, both trade
/// ledgers, and the cash movement log. Owned by a single context and
/// mutated only through the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<TradeRecord>,
    #[serde(default)]
    pub purchases: Vec<TradeRecord>,
    #[serde(default)]
    pub movements: Vec<CashMovement>,
    pub last_updated: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            sales: Vec::new(),
            purchases: Vec::new(),
            movements: Vec::new(),
            last_updated: Utc::now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    pub fn sale(&self, id: Uuid) -> Option<&TradeRecord> {
        self.sales.iter().find(|record| record.id == id)
    }

    pub fn purchase(&self, id: Uuid) -> Option<&TradeRecord> {
        self.purchases.iter().find(|record| record.id == id)
    }

    pub fn movement(&self, id: Uuid) -> Option<&CashMovement> {
        self.movements.iter().find(|movement| movement.id == id)
    }

    /// True while any non-voided sale or purchase still references `id`.
    pub fn has_active_records_for(&self, id: Uuid) -> bool {
        self.sales
            .iter()
            .chain(self.purchases.iter())
            .any(|record| record.product_id == id && record.is_active())
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
