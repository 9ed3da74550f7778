use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{CashMovement, Ledger, MovementKind, MovementOrigin};
use crate::money;

/// Manual entries in the cash movement log. Movements generated from a sale
/// or purchase never pass through here; they live and die with their record.
pub struct MovementService;

impl MovementService {
    pub fn add_manual(
        ledger: &mut Ledger,
        date: NaiveDate,
        description: &str,
        kind: MovementKind,
        amount: f64,
    ) -> Result<Uuid> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::InvalidInput(
                "movement description is required".into(),
            ));
        }
        if amount <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "movement amount must be positive".into(),
            ));
        }
        let movement = CashMovement::manual(date, description, kind, money::round2(amount));
        let id = movement.id;
        ledger.movements.push(movement);
        ledger.touch();
        Ok(id)
    }

    /// Removes a manual movement. Generated movements are refused: the only
    /// way to undo them is voiding the linked record.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<()> {
        let movement = ledger
            .movement(id)
            .ok_or_else(|| LedgerError::MovementNotFound(id.to_string()))?;
        if movement.origin != MovementOrigin::Manual {
            return Err(LedgerError::InvalidInput(
                "movement was generated from a record; void the record instead".into(),
            ));
        }
        ledger.movements.retain(|movement| movement.id != id);
        ledger.touch();
        Ok(())
    }

    pub fn list(ledger: &Ledger) -> Vec<&CashMovement> {
        ledger.movements.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{ProductService, TradeService};
    use crate::ledger::{PaymentMethod, ProductDraft};

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn manual_movement_roundtrip() {
        let mut ledger = Ledger::new();
        let id = MovementService::add_manual(
            &mut ledger,
            sample_date(),
            "Rent",
            MovementKind::ExpenseTransfer,
            1200.0,
        )
        .unwrap();
        assert_eq!(ledger.movements.len(), 1);

        MovementService::remove(&mut ledger, id).unwrap();
        assert!(ledger.movements.is_empty());
    }

    #[test]
    fn generated_movements_refuse_direct_removal() {
        let mut ledger = Ledger::new();
        let product_id = ProductService::add(
            &mut ledger,
            ProductDraft {
                name: "Widget".into(),
                initial_stock: 10,
                current_stock: 10,
                cost_price: 5.0,
                sale_price: 8.0,
                min_stock: None,
            },
        )
        .unwrap();
        TradeService::register_sale(
            &mut ledger,
            sample_date(),
            product_id,
            1,
            PaymentMethod::Cash,
            None,
        )
        .unwrap();

        let generated = ledger.movements[0].id;
        let err = MovementService::remove(&mut ledger, generated).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(ledger.movements.len(), 1);
    }

    #[test]
    fn blank_description_and_zero_amount_are_rejected() {
        let mut ledger = Ledger::new();
        let err = MovementService::add_manual(
            &mut ledger,
            sample_date(),
            "  ",
            MovementKind::IncomeCash,
            10.0,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));

        let err = MovementService::add_manual(
            &mut ledger,
            sample_date(),
            "Tip jar",
            MovementKind::IncomeCash,
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }
}
