use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stockbook_cli").expect("binary builds");
    cmd.env("STOCKBOOK_DIR", dir.path());
    cmd
}

fn add_widget(dir: &TempDir) -> String {
    let output = cli(dir)
        .args(["product", "add", "Widget", "10", "5", "8"])
        .output()
        .expect("run product add");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    stdout
        .trim()
        .rsplit(' ')
        .next()
        .expect("id in output")
        .to_string()
}

#[test]
fn product_add_and_list() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["product", "add", "Widget", "10", "5", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added product"));

    cli(&dir)
        .args(["product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget").and(predicate::str::contains("60.00%")));
}

#[test]
fn sell_then_report_shows_totals() {
    let dir = TempDir::new().unwrap();
    let id = add_widget(&dir);

    cli(&dir)
        .args(["sell", id.as_str(), "4", "cash", "walk-in", "sale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered sale"));

    cli(&dir)
        .args(["report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$32.00"));
}

#[test]
fn oversell_reports_available_quantity() {
    let dir = TempDir::new().unwrap();
    let id = add_widget(&dir);

    cli(&dir)
        .args(["sell", id.as_str(), "99", "cash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("available 10"));
}

#[test]
fn unknown_command_prints_usage() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn invalid_payment_method_is_rejected() {
    let dir = TempDir::new().unwrap();
    let id = add_widget(&dir);

    cli(&dir)
        .args(["sell", id.as_str(), "1", "card"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cash|transfer"));
}

#[test]
fn export_then_import_with_yes_flag() {
    let dir = TempDir::new().unwrap();
    let id = add_widget(&dir);
    let dump = dir.path().join("dump.json");
    let dump_arg = dump.to_string_lossy().to_string();

    cli(&dir)
        .args(["export", dump_arg.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported snapshot"));

    cli(&dir).args(["sell", id.as_str(), "3", "cash"]).assert().success();

    cli(&dir)
        .args(["import", dump_arg.as_str(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot imported."));

    // Imported snapshot predates the sale: full stock is back.
    cli(&dir)
        .args(["report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("units:      10"));
}
