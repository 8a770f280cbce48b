mod config;
mod error;
mod form;
mod pdf;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_config, resolve_output_dir, CONFIG_TEMPLATE, FORM_TEMPLATE,
};
use crate::error::{FacturaError, Result};
use crate::form::{load_form, InvoiceForm};
use crate::pdf::{output_filename, render_pdf};

#[derive(Parser)]
#[command(name = "factura")]
#[command(version, about = "Invoice form to PDF generator", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.factura or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Validate a form file and show its computed totals
    Check {
        /// Path to the form file (default: ./factura.toml)
        #[arg(short, long, default_value = "factura.toml")]
        form: PathBuf,
    },

    /// Generate the invoice PDF from a form file
    Generate {
        /// Path to the form file (default: ./factura.toml)
        #[arg(short, long, default_value = "factura.toml")]
        form: PathBuf,

        /// Custom output file path (default: output_dir/factura_<client>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Check { form } => cmd_check(&form),
        Commands::Generate { form, output, open } => cmd_generate(&cfg_dir, &form, output, open),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    if cfg_dir.exists() {
        return Err(FacturaError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("factura.toml"), FORM_TEMPLATE)?;

    println!("Initialized factura config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Copy the example form:      cp {}/factura.toml .",
        cfg_dir.display()
    );
    println!();
    println!("Then generate your first invoice:");
    println!("  factura generate --form factura.toml");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "CONCEPTO")]
    description: String,
    #[tabled(rename = "EUROS")]
    amount: String,
}

#[derive(Tabled)]
struct TotalsRow {
    #[tabled(rename = "BASE IMPONIBLE")]
    taxable_base: String,
    #[tabled(rename = "IVA %")]
    tax_rate: String,
    #[tabled(rename = "IMPORTE IVA")]
    tax_amount: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

fn print_form_summary(form: &InvoiceForm) {
    let rows: Vec<LineRow> = form
        .line_items
        .iter()
        .enumerate()
        .map(|(idx, item)| LineRow {
            index: idx + 1,
            description: item.description.clone(),
            amount: item.amount.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let totals = Table::new(vec![TotalsRow {
        taxable_base: form.taxable_base().to_string(),
        tax_rate: form.tax_rate.clone(),
        tax_amount: form.tax_amount().to_string(),
        total: form.total().to_string(),
    }])
    .with(Style::rounded())
    .to_string();
    println!("{totals}");
}

/// Validate a form file and show its computed totals
fn cmd_check(form_path: &PathBuf) -> Result<()> {
    let file = load_form(form_path)?;
    let mut form = InvoiceForm::from_file(&file)?;

    print_form_summary(&form);

    if form.validate_all() {
        println!();
        println!("Form OK: {}", form_path.display());
        Ok(())
    } else {
        eprintln!();
        for (path, message) in form.errors() {
            eprintln!("  {path}: {message}");
        }
        Err(FacturaError::FormInvalid(form.errors().len()))
    }
}

/// Generate the invoice PDF from a form file
fn cmd_generate(
    cfg_dir: &PathBuf,
    form_path: &PathBuf,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturaError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let file = load_form(form_path)?;
    let mut form = InvoiceForm::from_file(&file)?;

    // Derived fields must be current before validation reads them.
    form.recompute();

    if !form.validate_all() {
        for (path, message) in form.errors() {
            eprintln!("  {path}: {message}");
        }
        return Err(FacturaError::FormInvalid(form.errors().len()));
    }

    let snapshot = form.snapshot();

    let pdf_path = match output {
        Some(path) => path,
        None => {
            let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
            fs::create_dir_all(&output_dir)?;
            output_dir.join(output_filename(&snapshot.client_name))
        }
    };

    let today = chrono::Local::now().date_naive();
    render_pdf(&snapshot, &config.company, &config.pdf, today, &pdf_path)?;

    println!("Generated invoice for {}", snapshot.client_name);
    println!("  Total:  {} EUR", snapshot.total);
    println!("  Saved:  {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }

    Ok(())
}

fn open_path(pdf_path: &PathBuf) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(FacturaError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(FacturaError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(FacturaError::Io)?;
    }
    Ok(())
}
