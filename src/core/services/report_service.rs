use chrono::NaiveDate;

use crate::ledger::{CashMovement, Ledger, PaymentMethod, TradeRecord};
use crate::money;

/// Inclusive date filter applied to record dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStats {
    pub product_count: usize,
    pub total_units: u64,
    pub low_stock_count: usize,
    pub max_stock: u32,
    pub min_stock: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceBreakdown {
    pub cash: f64,
    pub transfer: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSales {
    pub product_name: String,
    pub quantity: u64,
    pub cash_total: f64,
    pub transfer_total: f64,
    pub grand_total: f64,
}

/// A movement paired with the running balance up to and including it.
#[derive(Debug, Clone)]
pub struct MovementLine<'a> {
    pub movement: &'a CashMovement,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Derived statistics over the current ledger. Every function is a fresh
/// scan of the raw records; nothing here is cached or invalidated.
pub struct ReportService;

impl ReportService {
    pub fn inventory_stats(ledger: &Ledger) -> InventoryStats {
        let stocks = ledger.products.iter().map(|product| product.current_stock);
        InventoryStats {
            product_count: ledger.products.len(),
            total_units: stocks.clone().map(u64::from).sum(),
            low_stock_count: ledger
                .products
                .iter()
                .filter(|product| product.is_low_stock())
                .count(),
            max_stock: stocks.clone().max().unwrap_or(0),
            min_stock: stocks.min().unwrap_or(0),
        }
    }

    pub fn sales_balance(ledger: &Ledger, filter: Option<DateRange>) -> BalanceBreakdown {
        Self::balance_of(&ledger.sales, filter)
    }

    pub fn purchases_balance(ledger: &Ledger, filter: Option<DateRange>) -> BalanceBreakdown {
        Self::balance_of(&ledger.purchases, filter)
    }

    /// Active sales grouped by the snapshotted product name, in the order
    /// each name first appears. Safe after the product itself is gone.
    pub fn product_sales_summary(ledger: &Ledger, filter: Option<DateRange>) -> Vec<ProductSales> {
        let mut groups: Vec<ProductSales> = Vec::new();
        for record in Self::active(&ledger.sales, filter) {
            let idx = match groups
                .iter()
                .position(|group| group.product_name == record.product_name)
            {
                Some(idx) => idx,
                None => {
                    groups.push(ProductSales {
                        product_name: record.product_name.clone(),
                        ..ProductSales::default()
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];
            group.quantity += u64::from(record.quantity);
            match record.payment_method {
                PaymentMethod::Cash => group.cash_total += record.total,
                PaymentMethod::Transfer => group.transfer_total += record.total,
            }
        }
        for group in &mut groups {
            group.cash_total = money::round2(group.cash_total);
            group.transfer_total = money::round2(group.transfer_total);
            group.grand_total = money::round2(group.cash_total + group.transfer_total);
        }
        groups
    }

    pub fn net_balance(ledger: &Ledger, filter: Option<DateRange>) -> f64 {
        let sales: f64 = Self::active(&ledger.sales, filter)
            .map(|record| record.total)
            .sum();
        let purchases: f64 = Self::active(&ledger.purchases, filter)
            .map(|record| record.total)
            .sum();
        money::round2(sales - purchases)
    }

    /// Movement log with its running balance, recomputed from the start in
    /// insertion order.
    pub fn cash_ledger(ledger: &Ledger) -> Vec<MovementLine<'_>> {
        let mut balance = 0.0;
        ledger
            .movements
            .iter()
            .map(|movement| {
                balance = money::round2(balance + movement.signed_amount());
                MovementLine { movement, balance }
            })
            .collect()
    }

    pub fn movement_totals(ledger: &Ledger) -> MovementTotals {
        let mut income = 0.0;
        let mut expense = 0.0;
        for movement in &ledger.movements {
            if movement.kind.is_income() {
                income += movement.amount;
            } else {
                expense += movement.amount;
            }
        }
        MovementTotals {
            income: money::round2(income),
            expense: money::round2(expense),
            balance: money::round2(income - expense),
        }
    }

    fn active<'a>(
        records: &'a [TradeRecord],
        filter: Option<DateRange>,
    ) -> impl Iterator<Item = &'a TradeRecord> + 'a {
        records.iter().filter(move |record| {
            record.is_active() && filter.map_or(true, |range| range.contains(record.date))
        })
    }

    fn balance_of(records: &[TradeRecord], filter: Option<DateRange>) -> BalanceBreakdown {
        let mut cash = 0.0;
        let mut transfer = 0.0;
        for record in Self::active(records, filter) {
            match record.payment_method {
                PaymentMethod::Cash => cash += record.total,
                PaymentMethod::Transfer => transfer += record.total,
            }
        }
        BalanceBreakdown {
            cash: money::round2(cash),
            transfer: money::round2(transfer),
            total: money::round2(cash + transfer),
        }
    }
}
