pub mod export;
pub mod ingest;
pub mod init;
pub mod list;
pub mod show;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "facturas",
    about = "Invoice intake and extraction CLI for small construction-supply businesses."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up facturas: choose a data directory and initialize the database.
    Init {
        /// Path for facturas data (default: ~/Documents/facturas)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Ingest an extracted-text invoice file and store the structured result.
    Ingest {
        /// Path to a text file with the invoice's OCR/PDF-extracted text
        file: String,
    },
    /// List stored invoices.
    List {
        /// Filter by category: compras, finanzas, gastos
        #[arg(long)]
        category: Option<String>,
        /// Maximum rows to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show one invoice in full detail.
    Show {
        /// Invoice id
        id: i64,
    },
    /// Export stored invoices to CSV.
    Export {
        /// Filter by category: compras, finanzas, gastos
        #[arg(long)]
        category: Option<String>,
        /// Output CSV path
        #[arg(long)]
        output: String,
    },
    /// Show current database and summary statistics.
    Status,
}

pub(crate) fn parse_category_opt(
    raw: Option<&str>,
) -> crate::error::Result<Option<crate::models::Category>> {
    match raw {
        None => Ok(None),
        Some(s) => crate::models::Category::parse(s)
            .map(Some)
            .ok_or_else(|| crate::error::FacturasError::UnknownCategory(s.to_string())),
    }
}
