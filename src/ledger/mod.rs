//! Ledger domain models, persistence-friendly types, and helpers.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod movement;
pub mod product;
pub mod trade;

pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use movement::{CashMovement, MovementKind, MovementOrigin};
pub use product::{Product, ProductDraft, ProductPatch};
pub use trade::{PaymentMethod, RecordStatus, TradeRecord};
