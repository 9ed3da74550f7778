//! Thin command-line host over the core services. All mutation flows
//! through the service layer and every successful change is saved back to
//! the snapshot before the process exits.

pub mod output;

use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use dialoguer::Confirm;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::ledger_manager::LedgerManager;
use crate::core::services::{
    DateRange, MovementService, ProductService, ReportService, TradeService,
};
use crate::errors::LedgerError;
use crate::ledger::{MovementKind, PaymentMethod, ProductDraft};
use crate::storage::JsonStorage;

const DEFAULT_LEDGER: &str = "main";

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
}

pub fn run(args: Vec<String>) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let command = match args.next() {
        Some(command) => command,
        None => {
            output::print_usage();
            return Err(CliError::Input("missing command".into()));
        }
    };

    let base = env::var_os("STOCKBOOK_DIR").map(PathBuf::from);
    let config_manager = ConfigManager::new(base.clone())?;
    let config = config_manager.load()?;
    let ledger_name = env::var("STOCKBOOK_LEDGER")
        .ok()
        .or_else(|| config.last_opened_ledger.clone())
        .unwrap_or_else(|| DEFAULT_LEDGER.to_string());

    let storage = JsonStorage::new(base, config.backup_retention)?;
    let mut manager = LedgerManager::new(Box::new(storage));
    manager.load_or_create(&ledger_name)?;

    let rest: Vec<String> = args.collect();
    match command.as_str() {
        "product" => product_command(&mut manager, &config, rest)?,
        "sell" => trade_command(&mut manager, rest, true)?,
        "buy" => trade_command(&mut manager, rest, false)?,
        "void-sale" => void_command(&mut manager, rest, true)?,
        "void-purchase" => void_command(&mut manager, rest, false)?,
        "movement" => movement_command(&mut manager, &config, rest)?,
        "report" => report_command(&manager, &config, rest)?,
        "export" => export_command(&manager, rest)?,
        "import" => import_command(&mut manager, &ledger_name, rest)?,
        "ledgers" => {
            for name in manager.storage().list_ledgers()? {
                println!("{name}");
            }
        }
        other => {
            output::print_usage();
            return Err(CliError::Input(format!("unknown command `{other}`")));
        }
    }

    if config.last_opened_ledger.as_deref() != Some(ledger_name.as_str()) {
        let updated = Config {
            last_opened_ledger: Some(ledger_name),
            ..config
        };
        config_manager.save(&updated)?;
    }
    Ok(())
}

fn product_command(
    manager: &mut LedgerManager,
    config: &Config,
    args: Vec<String>,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    match next_arg(&mut args, "product subcommand")?.as_str() {
        "add" => {
            let name = next_arg(&mut args, "name")?;
            let stock = parse_quantity(&next_arg(&mut args, "stock")?)?;
            let cost_price = parse_amount(&next_arg(&mut args, "cost price")?)?;
            let sale_price = parse_amount(&next_arg(&mut args, "sale price")?)?;
            let min_stock = args.next().map(|raw| parse_quantity(&raw)).transpose()?;
            let id = ProductService::add(
                manager.current_mut()?,
                ProductDraft {
                    name,
                    initial_stock: stock,
                    current_stock: stock,
                    cost_price,
                    sale_price,
                    min_stock,
                },
            )?;
            manager.save()?;
            output::success(&format!("Added product {id}"));
        }
        "list" => {
            let ledger = manager.current()?;
            let products: Vec<_> = ledger.products.iter().collect();
            output::print_products(&products, &config.currency_symbol);
        }
        "search" => {
            let needle = next_arg(&mut args, "search text")?;
            let ledger = manager.current()?;
            let found = ProductService::search(ledger, &needle);
            if found.is_empty() {
                output::warn(&format!("No products match `{needle}`."));
                if let Some(suggestion) = closest_product_name(manager, &needle) {
                    println!("Did you mean `{suggestion}`?");
                }
            } else {
                output::print_products(&found, &config.currency_symbol);
            }
        }
        "remove" => {
            let id = parse_id(&next_arg(&mut args, "product id")?)?;
            ProductService::remove(manager.current_mut()?, id)?;
            manager.save()?;
            output::success("Product removed.");
        }
        other => {
            return Err(CliError::Input(format!(
                "unknown product subcommand `{other}`"
            )))
        }
    }
    Ok(())
}

fn trade_command(
    manager: &mut LedgerManager,
    args: Vec<String>,
    is_sale: bool,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let product_id = parse_id(&next_arg(&mut args, "product id")?)?;
    let quantity = parse_quantity(&next_arg(&mut args, "quantity")?)?;
    let payment_method = parse_payment(&next_arg(&mut args, "payment method")?)?;
    let note = remainder_note(args);
    let date = Local::now().date_naive();

    let ledger = manager.current_mut()?;
    let id = if is_sale {
        TradeService::register_sale(ledger, date, product_id, quantity, payment_method, note)?
    } else {
        TradeService::register_purchase(ledger, date, product_id, quantity, payment_method, note)?
    };
    manager.save()?;
    let kind = if is_sale { "sale" } else { "purchase" };
    output::success(&format!("Registered {kind} {id}"));
    Ok(())
}

fn void_command(
    manager: &mut LedgerManager,
    args: Vec<String>,
    is_sale: bool,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let id = parse_id(&next_arg(&mut args, "record id")?)?;
    let ledger = manager.current_mut()?;
    if is_sale {
        TradeService::void_sale(ledger, id)?;
    } else {
        TradeService::void_purchase(ledger, id)?;
    }
    manager.save()?;
    output::success("Record voided; stock and movements restored.");
    Ok(())
}

fn movement_command(
    manager: &mut LedgerManager,
    config: &Config,
    args: Vec<String>,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    match next_arg(&mut args, "movement subcommand")?.as_str() {
        "add" => {
            let kind = parse_movement_kind(&next_arg(&mut args, "movement kind")?)?;
            let amount = parse_amount(&next_arg(&mut args, "amount")?)?;
            let description = remainder_note(args)
                .ok_or_else(|| CliError::Input("missing movement description".into()))?;
            let date = Local::now().date_naive();
            let id = MovementService::add_manual(
                manager.current_mut()?,
                date,
                &description,
                kind,
                amount,
            )?;
            manager.save()?;
            output::success(&format!("Recorded movement {id}"));
        }
        "remove" => {
            let id = parse_id(&next_arg(&mut args, "movement id")?)?;
            MovementService::remove(manager.current_mut()?, id)?;
            manager.save()?;
            output::success("Movement removed.");
        }
        "list" => {
            let ledger = manager.current()?;
            let lines = ReportService::cash_ledger(ledger);
            output::print_movements(&lines, &config.currency_symbol);
        }
        other => {
            return Err(CliError::Input(format!(
                "unknown movement subcommand `{other}`"
            )))
        }
    }
    Ok(())
}

fn report_command(
    manager: &LedgerManager,
    config: &Config,
    args: Vec<String>,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let from = args.next().map(|raw| parse_date(&raw)).transpose()?;
    let to = args.next().map(|raw| parse_date(&raw)).transpose()?;
    let filter = if from.is_some() || to.is_some() {
        Some(DateRange::new(from, to))
    } else {
        None
    };

    let ledger = manager.current()?;
    let currency = &config.currency_symbol;
    output::print_inventory_stats(&ReportService::inventory_stats(ledger));
    output::print_balance("Sales", &ReportService::sales_balance(ledger, filter), currency);
    output::print_balance(
        "Purchases",
        &ReportService::purchases_balance(ledger, filter),
        currency,
    );
    println!(
        "{}: {currency}{:.2}",
        "Net balance",
        ReportService::net_balance(ledger, filter)
    );
    output::print_product_summary(&ReportService::product_sales_summary(ledger, filter), currency);
    output::print_movement_totals(&ReportService::movement_totals(ledger), currency);
    Ok(())
}

fn export_command(manager: &LedgerManager, args: Vec<String>) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let path = PathBuf::from(next_arg(&mut args, "export path")?);
    manager.export(&path)?;
    output::success(&format!("Exported snapshot to {}", path.display()));
    Ok(())
}

fn import_command(
    manager: &mut LedgerManager,
    ledger_name: &str,
    args: Vec<String>,
) -> Result<(), CliError> {
    let mut args = args.into_iter();
    let path = PathBuf::from(next_arg(&mut args, "import path")?);
    let assume_yes = args.any(|flag| flag == "--yes");

    if !assume_yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace ledger `{ledger_name}` with the snapshot from {}? This discards all current data",
                path.display()
            ))
            .default(false)
            .interact()
            .map_err(|err| CliError::Input(err.to_string()))?;
        if !confirmed {
            output::warn("Import cancelled.");
            return Ok(());
        }
    }

    manager.import(&path)?;
    manager.save()?;
    output::success("Snapshot imported.");
    Ok(())
}

fn closest_product_name(manager: &LedgerManager, needle: &str) -> Option<String> {
    let ledger = manager.current().ok()?;
    ledger
        .products
        .iter()
        .map(|product| {
            let score = strsim::jaro_winkler(
                &product.name.to_lowercase(),
                &needle.trim().to_lowercase(),
            );
            (product.name.clone(), score)
        })
        .filter(|(_, score)| *score > 0.72)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

fn next_arg(args: &mut impl Iterator<Item = String>, what: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::Input(format!("missing {what}")))
}

fn remainder_note(args: impl Iterator<Item = String>) -> Option<String> {
    let note = args.collect::<Vec<_>>().join(" ");
    if note.trim().is_empty() {
        None
    } else {
        Some(note)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(raw).map_err(|_| CliError::Input(format!("`{raw}` is not a valid id")))
}

fn parse_quantity(raw: &str) -> Result<u32, CliError> {
    raw.parse()
        .map_err(|_| CliError::Input(format!("`{raw}` is not a valid quantity")))
}

fn parse_amount(raw: &str) -> Result<f64, CliError> {
    raw.parse()
        .map_err(|_| CliError::Input(format!("`{raw}` is not a valid amount")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::Input(format!("`{raw}` is not a valid date (YYYY-MM-DD)")))
}

fn parse_payment(raw: &str) -> Result<PaymentMethod, CliError> {
    match raw.to_lowercase().as_str() {
        "cash" => Ok(PaymentMethod::Cash),
        "transfer" => Ok(PaymentMethod::Transfer),
        other => Err(CliError::Input(format!(
            "`{other}` is not a payment method (cash|transfer)"
        ))),
    }
}

fn parse_movement_kind(raw: &str) -> Result<MovementKind, CliError> {
    match raw.to_lowercase().as_str() {
        "income_cash" => Ok(MovementKind::IncomeCash),
        "income_transfer" => Ok(MovementKind::IncomeTransfer),
        "expense_cash" => Ok(MovementKind::ExpenseCash),
        "expense_transfer" => Ok(MovementKind::ExpenseTransfer),
        other => Err(CliError::Input(format!(
            "`{other}` is not a movement kind"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_payment_accepts_both_methods() {
        assert_eq!(parse_payment("cash").unwrap(), PaymentMethod::Cash);
        assert_eq!(parse_payment("Transfer").unwrap(), PaymentMethod::Transfer);
        assert!(parse_payment("card").is_err());
    }

    #[test]
    fn remainder_note_joins_words_and_skips_blank() {
        let note = remainder_note(vec!["paid".to_string(), "in".to_string(), "full".to_string()].into_iter());
        assert_eq!(note.as_deref(), Some("paid in full"));
        assert!(remainder_note(Vec::<String>::new().into_iter()).is_none());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert!(parse_date("2025-03-10").is_ok());
        assert!(parse_date("10/03/2025").is_err());
    }
}
