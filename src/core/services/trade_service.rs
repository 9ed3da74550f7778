use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{
    CashMovement, Ledger, MovementKind, MovementOrigin, PaymentMethod, RecordStatus, TradeRecord,
};

use super::ProductService;

#[derive(Clone, Copy)]
enum TradeKind {
    Sale,
    Purchase,
}

/// Sale and purchase operations. Every register has an exact inverse in the
/// matching void: the stock delta is reversed through the registry and the
/// generated cash movement is withdrawn. All checks run before the first
/// mutation, so a failed call changes nothing.
pub struct TradeService;

impl TradeService {
    /// Registers a sale: snapshots the product's name and sale price, takes
    /// the quantity out of stock, and writes the linked income movement.
    pub fn register_sale(
        ledger: &mut Ledger,
        date: NaiveDate,
        product_id: Uuid,
        quantity: u32,
        payment_method: PaymentMethod,
        note: Option<String>,
    ) -> Result<Uuid> {
        Self::register(
            ledger,
            TradeKind::Sale,
            date,
            product_id,
            quantity,
            payment_method,
            note,
        )
    }

    /// Registers a purchase. Unlike sales there is no ceiling on quantity;
    /// the unit price snapshots the product's cost price.
    pub fn register_purchase(
        ledger: &mut Ledger,
        date: NaiveDate,
        product_id: Uuid,
        quantity: u32,
        payment_method: PaymentMethod,
        note: Option<String>,
    ) -> Result<Uuid> {
        Self::register(
            ledger,
            TradeKind::Purchase,
            date,
            product_id,
            quantity,
            payment_method,
            note,
        )
    }

    /// Voids a sale: returns its quantity to stock, marks the record, and
    /// removes the movement it generated. Voiding is terminal; an already
    /// voided record reads as not found.
    pub fn void_sale(ledger: &mut Ledger, id: Uuid) -> Result<()> {
        Self::void(ledger, TradeKind::Sale, id)
    }

    /// Voids a purchase, taking its quantity back out of stock (floored at
    /// zero, since the stock may have been sold on in the meantime).
    pub fn void_purchase(ledger: &mut Ledger, id: Uuid) -> Result<()> {
        Self::void(ledger, TradeKind::Purchase, id)
    }

    pub fn find_sale(ledger: &Ledger, id: Uuid) -> Option<&TradeRecord> {
        ledger.sale(id)
    }

    pub fn find_purchase(ledger: &Ledger, id: Uuid) -> Option<&TradeRecord> {
        ledger.purchase(id)
    }

    fn register(
        ledger: &mut Ledger,
        kind: TradeKind,
        date: NaiveDate,
        product_id: Uuid,
        quantity: u32,
        payment_method: PaymentMethod,
        note: Option<String>,
    ) -> Result<Uuid> {
        if quantity == 0 {
            return Err(LedgerError::InvalidInput(
                "quantity must be positive".into(),
            ));
        }
        let (product_name, unit_price, available) = {
            let product = ledger
                .product(product_id)
                .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))?;
            let unit_price = match kind {
                TradeKind::Sale => product.sale_price,
                TradeKind::Purchase => product.cost_price,
            };
            (product.name.clone(), unit_price, product.current_stock)
        };
        if matches!(kind, TradeKind::Sale) && quantity > available {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        let record = TradeRecord::new(
            date,
            product_id,
            product_name.clone(),
            quantity,
            payment_method,
            unit_price,
            note,
        );
        let id = record.id;
        let movement = CashMovement::linked(
            date,
            Self::movement_description(kind, &product_name),
            Self::movement_kind(kind, payment_method),
            record.total,
            Self::movement_origin(kind),
            id,
        );

        let delta = match kind {
            TradeKind::Sale => -(quantity as i64),
            TradeKind::Purchase => quantity as i64,
        };
        match kind {
            TradeKind::Sale => ledger.sales.push(record),
            TradeKind::Purchase => ledger.purchases.push(record),
        }
        ProductService::adjust_stock(ledger, product_id, delta)?;
        ledger.movements.push(movement);
        ledger.touch();
        tracing::debug!(%id, quantity, "registered trade record");
        Ok(id)
    }

    fn void(ledger: &mut Ledger, kind: TradeKind, id: Uuid) -> Result<()> {
        let (product_id, quantity) = {
            let records = match kind {
                TradeKind::Sale => &ledger.sales,
                TradeKind::Purchase => &ledger.purchases,
            };
            let record = records
                .iter()
                .find(|record| record.id == id && record.is_active())
                .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))?;
            (record.product_id, record.quantity)
        };

        let delta = match kind {
            TradeKind::Sale => quantity as i64,
            TradeKind::Purchase => -(quantity as i64),
        };
        ProductService::adjust_stock(ledger, product_id, delta)?;

        let records = match kind {
            TradeKind::Sale => &mut ledger.sales,
            TradeKind::Purchase => &mut ledger.purchases,
        };
        if let Some(record) = records.iter_mut().find(|record| record.id == id) {
            record.status = RecordStatus::Voided;
        }
        ledger
            .movements
            .retain(|movement| movement.linked_record_id != Some(id));
        ledger.touch();
        tracing::debug!(%id, "voided trade record");
        Ok(())
    }

    fn movement_kind(kind: TradeKind, payment_method: PaymentMethod) -> MovementKind {
        match (kind, payment_method) {
            (TradeKind::Sale, PaymentMethod::Cash) => MovementKind::IncomeCash,
            (TradeKind::Sale, PaymentMethod::Transfer) => MovementKind::IncomeTransfer,
            (TradeKind::Purchase, PaymentMethod::Cash) => MovementKind::ExpenseCash,
            (TradeKind::Purchase, PaymentMethod::Transfer) => MovementKind::ExpenseTransfer,
        }
    }

    fn movement_origin(kind: TradeKind) -> MovementOrigin {
        match kind {
            TradeKind::Sale => MovementOrigin::FromSale,
            TradeKind::Purchase => MovementOrigin::FromPurchase,
        }
    }

    fn movement_description(kind: TradeKind, product_name: &str) -> String {
        match kind {
            TradeKind::Sale => format!("Sale: {product_name}"),
            TradeKind::Purchase => format!("Purchase: {product_name}"),
        }
    }
}
