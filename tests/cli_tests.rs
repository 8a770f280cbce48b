use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn factura_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("factura"))
}

const VALID_FORM: &str = r#"tax_rate = "21"

[client]
name = "Acme SL"
street = "C/ Mayor 1"
postal_code = "28001"
phone = "600123456"
tax_id = "B12345678"
city = "Madrid"

[[lines]]
description = "Mano de obra"
amount = "100.00"

[[lines]]
description = "Materiales"
amount = "50.005"
"#;

fn write_config(cfg_dir: &Path) {
    fs::create_dir_all(cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("config.toml"),
        r#"[company]
name = "Talleres Paco"
street = "Gran Vía 12"
postal_code = "28013"
tax_id = "12345678Z"

[pdf]
output_dir = "output"
"#,
    )
    .unwrap();
}

#[test]
fn test_help() {
    factura_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice form to PDF generator"));
}

#[test]
fn test_version() {
    factura_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("factura"));
}

#[test]
fn test_init_creates_config_and_form_template() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");

    factura_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized factura config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("factura.toml").exists());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");

    factura_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    factura_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_check_valid_form_shows_totals() {
    let temp_dir = TempDir::new().unwrap();
    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, VALID_FORM).unwrap();

    factura_cmd()
        .args(["check", "--form", form_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mano de obra"))
        .stdout(predicate::str::contains("150.01"))
        .stdout(predicate::str::contains("31.50"))
        .stdout(predicate::str::contains("181.51"))
        .stdout(predicate::str::contains("Form OK"));
}

#[test]
fn test_check_invalid_postal_code() {
    let temp_dir = TempDir::new().unwrap();
    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, &VALID_FORM.replace("28001", "1234")).unwrap();

    factura_cmd()
        .args(["check", "--form", form_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("client.postal_code"))
        .stderr(predicate::str::contains("5 dígitos"))
        .stderr(predicate::str::contains("not valid"));
}

#[test]
fn test_check_invalid_phone() {
    let temp_dir = TempDir::new().unwrap();
    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, &VALID_FORM.replace("600123456", "60012345")).unwrap();

    factura_cmd()
        .args(["check", "--form", form_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("client.phone"))
        .stderr(predicate::str::contains("9 dígitos"));
}

#[test]
fn test_check_missing_form_file() {
    let temp_dir = TempDir::new().unwrap();
    let form_path = temp_dir.path().join("nonexistent.toml");

    factura_cmd()
        .args(["check", "--form", form_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Form file not found"));
}

#[test]
fn test_generate_without_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, VALID_FORM).unwrap();

    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_generate_writes_pdf_named_after_client() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");
    write_config(&config_path);

    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, VALID_FORM).unwrap();

    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated invoice for Acme SL"))
        .stdout(predicate::str::contains("181.51"));

    // Client name embedded verbatim, space included.
    let pdf_path = config_path.join("output").join("factura_Acme SL.pdf");
    assert!(pdf_path.exists());
    let bytes = fs::read(&pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_generate_custom_output_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");
    write_config(&config_path);

    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, VALID_FORM).unwrap();

    let out_path = temp_dir.path().join("mi-factura.pdf");
    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out_path.exists());
}

#[test]
fn test_generate_invalid_form_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");
    write_config(&config_path);

    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, &VALID_FORM.replace("28001", "abc")).unwrap();

    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("client.postal_code"));

    let output_dir = config_path.join("output");
    let produced = output_dir
        .read_dir()
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(produced, 0);
}

#[test]
fn test_generate_missing_line_description() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");
    write_config(&config_path);

    let form_path = temp_dir.path().join("factura.toml");
    fs::write(&form_path, &VALID_FORM.replace("\"Materiales\"", "\"\"")).unwrap();

    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lines.1.description"))
        .stderr(predicate::str::contains("El concepto es obligatorio"));
}

#[test]
fn test_generate_from_init_template_form() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("factura-config");

    factura_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    // Point the output dir somewhere test-local before generating.
    write_config(&config_path);

    let form_path = config_path.join("factura.toml");
    factura_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--form",
            form_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated invoice"));
}
