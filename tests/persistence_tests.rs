mod common;

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use stockbook::core::services::{MovementService, ProductService, TradeService};
use stockbook::errors::LedgerError;
use stockbook::ledger::{MovementKind, MovementOrigin, PaymentMethod, ProductDraft};
use stockbook::storage::{JsonStorage, StorageBackend, EXPORT_FORMAT_VERSION};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
}

fn seed(manager: &mut stockbook::core::ledger_manager::LedgerManager) -> uuid::Uuid {
    let ledger = manager.current_mut().unwrap();
    let widget = ProductService::add(
        ledger,
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
    TradeService::register_sale(ledger, date(1), widget, 2, PaymentMethod::Cash, None).unwrap();
    MovementService::add_manual(ledger, date(2), "Rent", MovementKind::ExpenseTransfer, 50.0)
        .unwrap();
    widget
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let (mut manager, _base) = common::setup_manager();
    manager.load_or_create("reliable").unwrap();
    seed(&mut manager);
    let path = manager.save().expect("initial save");
    let original = fs::read_to_string(&path).expect("read original file");

    // Create a directory that collides with the temp file name to force
    // File::create to fail.
    let tmp_path = tmp_path_for(&path);
    fs::create_dir_all(&tmp_path).unwrap();

    // Mutate the ledger so new JSON would differ if the save succeeded.
    ProductService::add(
        manager.current_mut().unwrap(),
        ProductDraft {
            name: "Gadget".into(),
            initial_stock: 1,
            current_stock: 1,
            cost_price: 1.0,
            sale_price: 2.0,
            min_stock: None,
        },
    )
    .unwrap();
    let result = manager.save();
    assert!(
        result.is_err(),
        "expected save to fail when temp path is a directory"
    );

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );
}

#[test]
fn snapshot_document_matches_expected_layout() {
    let (mut manager, _base) = common::setup_manager();
    manager.load_or_create("layout").unwrap();
    seed(&mut manager);

    let doc = manager.dump_snapshot().unwrap();
    assert!(doc["products"][0]["costPrice"].is_number());
    assert!(doc["products"][0]["marginPercent"].is_number());
    assert!(doc["sales"][0]["paymentMethod"].is_string());
    assert!(doc["sales"][0]["productName"].is_string());
    assert!(doc["movements"].is_array());
    assert!(doc["lastUpdated"].is_string());
}

#[test]
fn export_import_roundtrip_replaces_state_wholesale() {
    let (mut manager, base) = common::setup_manager();
    manager.load_or_create("shop").unwrap();
    let widget = seed(&mut manager);
    let target = base.join("handoff.json");
    manager.export(&target).expect("export");

    // Diverge the live state, then import the snapshot back.
    TradeService::register_sale(
        manager.current_mut().unwrap(),
        date(3),
        widget,
        5,
        PaymentMethod::Transfer,
        None,
    )
    .unwrap();
    assert_eq!(manager.current().unwrap().sales.len(), 2);

    manager.import(&target).expect("import");
    let ledger = manager.current().unwrap();
    assert_eq!(ledger.sales.len(), 1, "import replaces, never merges");
    assert_eq!(ledger.product(widget).unwrap().current_stock, 8);
    assert_eq!(ledger.movements.len(), 2);
    assert!(ledger
        .movements
        .iter()
        .any(|movement| movement.origin == MovementOrigin::FromSale));
}

#[test]
fn corrupt_import_leaves_live_state_untouched() {
    let (mut manager, base) = common::setup_manager();
    manager.load_or_create("shop").unwrap();
    seed(&mut manager);

    let bad = base.join("corrupt.json");
    fs::write(&bad, "{ \"ledger\": { \"products\": [ {").unwrap();

    let err = manager.import(&bad).expect_err("corrupt import");
    assert!(matches!(err, LedgerError::Storage(_)));
    assert_eq!(
        manager.current().unwrap().products.len(),
        1,
        "live state must survive a failed import"
    );
}

#[test]
fn export_envelope_is_versioned() {
    let (mut manager, base) = common::setup_manager();
    manager.load_or_create("shop").unwrap();
    seed(&mut manager);
    let target = base.join("export.json");
    manager.export(&target).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(doc["formatVersion"], EXPORT_FORMAT_VERSION);
    assert!(doc["exportedAt"].is_string());
    assert!(doc["ledger"]["products"].is_array());
}

#[test]
fn backups_rotate_with_retention() {
    let (mut manager, base) = common::setup_manager();
    manager.load_or_create("shop").unwrap();
    seed(&mut manager);
    let ledger = manager.current().unwrap().clone();

    let storage = JsonStorage::new(Some(base), Some(3)).unwrap();
    for note in ["open", "midday", "close", "late"] {
        storage.backup(&ledger, "shop", Some(note)).expect("backup");
    }
    let backups = storage.list_backups("shop").unwrap();
    assert!(!backups.is_empty());
    assert!(backups.len() <= 3, "retention must prune old backups");
}
