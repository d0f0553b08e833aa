use assert_cmd::Command;
use predicates::prelude::*;

const SAMPLE_INVOICE: &str = "HOME DEPOT\nFactura: AB1234\nFecha: 12/01/2024\nSubtotal: $100.00\nIVA: $16.00\nTotal: $116.00\nTarjeta de crédito\n";

/// Each test gets its own config + data dir; FACTURAS_CONFIG_DIR keeps the
/// binary away from the real home directory.
struct TestEnv {
    _root: tempfile::TempDir,
    config_dir: std::path::PathBuf,
    data_dir: std::path::PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let config_dir = root.path().join("config");
        let data_dir = root.path().join("data");
        std::fs::create_dir_all(&config_dir).unwrap();
        Self {
            _root: root,
            config_dir,
            data_dir,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("facturas").unwrap();
        cmd.env("FACTURAS_CONFIG_DIR", &self.config_dir);
        cmd
    }

    fn init(&self) {
        self.cmd()
            .args(["init", "--data-dir"])
            .arg(&self.data_dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized facturas"));
    }

    fn write_invoice(&self, name: &str, content: &str) -> std::path::PathBuf {
        let path = self._root.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new();
    env.init();
    assert!(env.data_dir.join("facturas.db").exists());
}

#[test]
fn test_ingest_and_list() {
    let env = TestEnv::new();
    env.init();
    let invoice = env.write_invoice("factura.txt", SAMPLE_INVOICE);

    env.cmd()
        .arg("ingest")
        .arg(&invoice)
        .assert()
        .success()
        .stdout(predicate::str::contains("HOME DEPOT"))
        .stdout(predicate::str::contains("AB1234"))
        .stdout(predicate::str::contains("$116.00"))
        .stdout(predicate::str::contains("purchase #"));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("HOME DEPOT"))
        .stdout(predicate::str::contains("compras"));
}

#[test]
fn test_ingest_duplicate_is_rejected() {
    let env = TestEnv::new();
    env.init();
    let invoice = env.write_invoice("factura.txt", SAMPLE_INVOICE);

    env.cmd().arg("ingest").arg(&invoice).assert().success();
    env.cmd()
        .arg("ingest")
        .arg(&invoice)
        .assert()
        .success()
        .stdout(predicate::str::contains("already been ingested"));
}

#[test]
fn test_list_category_filter() {
    let env = TestEnv::new();
    env.init();
    let compra = env.write_invoice("compra.txt", SAMPLE_INVOICE);
    let gasto = env.write_invoice("gasto.txt", "Recibo de pago de luz\nTotal a pagar $450.00\n");

    env.cmd().arg("ingest").arg(&compra).assert().success();
    env.cmd().arg("ingest").arg(&gasto).assert().success();

    env.cmd()
        .args(["list", "--category", "gastos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recibo de pago de luz"))
        .stdout(predicate::str::contains("HOME DEPOT").not());

    env.cmd()
        .args(["list", "--category", "ventas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_show_displays_invoice() {
    let env = TestEnv::new();
    env.init();
    let invoice = env.write_invoice("factura.txt", SAMPLE_INVOICE);
    env.cmd().arg("ingest").arg(&invoice).assert().success();

    env.cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice #1"))
        .stdout(predicate::str::contains("HOME DEPOT"))
        .stdout(predicate::str::contains("tarjeta"));

    env.cmd()
        .args(["show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No invoice with id 99"));
}

#[test]
fn test_export_writes_csv() {
    let env = TestEnv::new();
    env.init();
    let invoice = env.write_invoice("factura.txt", SAMPLE_INVOICE);
    env.cmd().arg("ingest").arg(&invoice).assert().success();

    let out = env._root.path().join("out.csv");
    env.cmd()
        .args(["export", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 invoices"));

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.contains("supplier"));
    assert!(csv.contains("HOME DEPOT"));
    assert!(csv.contains("116.00"));
}

#[test]
fn test_status_reports_counts() {
    let env = TestEnv::new();
    env.init();
    let invoice = env.write_invoice("factura.txt", SAMPLE_INVOICE);
    env.cmd().arg("ingest").arg(&invoice).assert().success();

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoices:   1"))
        .stdout(predicate::str::contains("compras:  1"))
        .stdout(predicate::str::contains("Purchases:  1"));
}
