use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded cash inflow or outflow. Movements are either entered by hand
/// or generated when a sale/purchase is registered; generated movements are
/// only ever removed by voiding the record they are linked to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub kind: MovementKind,
    pub amount: f64,
    #[serde(default)]
    pub origin: MovementOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_record_id: Option<Uuid>,
}

impl CashMovement {
    pub fn manual(
        date: NaiveDate,
        description: impl Into<String>,
        kind: MovementKind,
        amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: description.into(),
            kind,
            amount,
            origin: MovementOrigin::Manual,
            linked_record_id: None,
        }
    }

    pub fn linked(
        date: NaiveDate,
        description: impl Into<String>,
        kind: MovementKind,
        amount: f64,
        origin: MovementOrigin,
        record_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: description.into(),
            kind,
            amount,
            origin,
            linked_record_id: Some(record_id),
        }
    }

    /// Signed effect on the running cash balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            MovementKind::IncomeCash | MovementKind::IncomeTransfer => self.amount,
            MovementKind::ExpenseCash | MovementKind::ExpenseTransfer => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    IncomeCash,
    IncomeTransfer,
    ExpenseCash,
    ExpenseTransfer,
}

impl MovementKind {
    pub fn is_income(self) -> bool {
        matches!(self, MovementKind::IncomeCash | MovementKind::IncomeTransfer)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementOrigin {
    #[default]
    Manual,
    FromSale,
    FromPurchase,
}
