use colored::Colorize;

use crate::core::services::{
    BalanceBreakdown, InventoryStats, MovementLine, MovementTotals, ProductSales,
};
use crate::ledger::Product;

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_usage() {
    eprintln!("Usage: stockbook_cli <command> [...]");
    eprintln!();
    eprintln!("  product add <name> <stock> <cost> <sale> [min-stock]");
    eprintln!("  product list");
    eprintln!("  product search <text>");
    eprintln!("  product remove <id>");
    eprintln!("  sell <product-id> <qty> <cash|transfer> [note...]");
    eprintln!("  buy <product-id> <qty> <cash|transfer> [note...]");
    eprintln!("  void-sale <record-id>");
    eprintln!("  void-purchase <record-id>");
    eprintln!("  movement add <kind> <amount> <description...>");
    eprintln!("      kinds: income_cash income_transfer expense_cash expense_transfer");
    eprintln!("  movement remove <id>");
    eprintln!("  movement list");
    eprintln!("  report [from] [to]          dates as YYYY-MM-DD, inclusive");
    eprintln!("  export <path>");
    eprintln!("  import <path> [--yes]");
    eprintln!("  ledgers");
}

pub fn print_products(products: &[&Product], currency: &str) {
    if products.is_empty() {
        warn("No products registered.");
        return;
    }
    println!(
        "{:<36}  {:<20} {:>7} {:>10} {:>10} {:>9}",
        "ID", "NAME", "STOCK", "COST", "SALE", "MARGIN"
    );
    for product in products {
        let stock = if product.is_low_stock() {
            format!("{}", product.current_stock).red().to_string()
        } else {
            product.current_stock.to_string()
        };
        println!(
            "{:<36}  {:<20} {:>7} {:>10} {:>10} {:>8}%",
            product.id,
            product.name,
            stock,
            format!("{currency}{:.2}", product.cost_price),
            format!("{currency}{:.2}", product.sale_price),
            format!("{:.2}", product.margin_percent),
        );
    }
}

pub fn print_movements(lines: &[MovementLine<'_>], currency: &str) {
    if lines.is_empty() {
        warn("No movements recorded.");
        return;
    }
    println!(
        "{:<36}  {:<10} {:<18} {:>10} {:>10}  {}",
        "ID", "DATE", "KIND", "AMOUNT", "BALANCE", "DESCRIPTION"
    );
    for line in lines {
        let movement = line.movement;
        println!(
            "{:<36}  {:<10} {:<18} {:>10} {:>10}  {}",
            movement.id,
            movement.date,
            format!("{:?}", movement.kind),
            format!("{currency}{:.2}", movement.amount),
            format!("{currency}{:.2}", line.balance),
            movement.description,
        );
    }
}

pub fn print_inventory_stats(stats: &InventoryStats) {
    println!("{}", "Inventory".bold());
    println!("  products:   {}", stats.product_count);
    println!("  units:      {}", stats.total_units);
    println!("  max stock:  {}", stats.max_stock);
    println!("  min stock:  {}", stats.min_stock);
    if stats.low_stock_count > 0 {
        println!(
            "  low stock:  {}",
            format!("{} product(s) at or below threshold", stats.low_stock_count).red()
        );
    }
}

pub fn print_balance(title: &str, balance: &BalanceBreakdown, currency: &str) {
    println!("{}", title.bold());
    println!("  cash:       {currency}{:.2}", balance.cash);
    println!("  transfer:   {currency}{:.2}", balance.transfer);
    println!("  total:      {currency}{:.2}", balance.total);
}

pub fn print_product_summary(groups: &[ProductSales], currency: &str) {
    if groups.is_empty() {
        return;
    }
    println!("{}", "Sales by product".bold());
    println!(
        "  {:<20} {:>6} {:>10} {:>10} {:>10}",
        "PRODUCT", "QTY", "CASH", "TRANSFER", "TOTAL"
    );
    for group in groups {
        println!(
            "  {:<20} {:>6} {:>10} {:>10} {:>10}",
            group.product_name,
            group.quantity,
            format!("{currency}{:.2}", group.cash_total),
            format!("{currency}{:.2}", group.transfer_total),
            format!("{currency}{:.2}", group.grand_total),
        );
    }
}

pub fn print_movement_totals(totals: &MovementTotals, currency: &str) {
    println!("{}", "Cash movements".bold());
    println!("  income:     {currency}{:.2}", totals.income);
    println!("  expense:    {currency}{:.2}", totals.expense);
    println!("  balance:    {currency}{:.2}", totals.balance);
}
