use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money;

/// A sale or purchase written against a product. The product's name and
/// price are snapshotted at creation so history survives later edits or
/// removal of the product itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub payment_method: PaymentMethod,
    pub unit_price: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

impl TradeRecord {
    pub fn new(
        date: NaiveDate,
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: u32,
        payment_method: PaymentMethod,
        unit_price: f64,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            product_id,
            product_name: product_name.into(),
            quantity,
            payment_method,
            unit_price,
            total: money::line_total(quantity, unit_price),
            note,
            status: RecordStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, RecordStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

/// Records move `Active -> Voided` once and never back; voided records stay
/// in the ledger as history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Voided,
}
