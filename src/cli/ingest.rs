use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::intake::ingest_file;
use crate::settings::db_path;

pub fn run(file: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let result = ingest_file(&conn, &PathBuf::from(file))?;

    if result.duplicate_file {
        println!("This file has already been ingested (duplicate checksum).");
        return Ok(());
    }

    // ingest_file only leaves these unset on the duplicate path
    let Some(data) = result.data else {
        return Ok(());
    };
    let invoice_id = result.invoice_id.unwrap_or_default();

    println!(
        "{} invoice #{invoice_id} ({})",
        "Stored".green().bold(),
        data.category.as_str()
    );

    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "—".to_string());
    let amt = |v: Option<f64>| v.map(money).unwrap_or_else(|| "—".to_string());

    println!("  Supplier:       {}", opt(&data.supplier));
    println!("  Invoice number: {}", opt(&data.invoice_number));
    println!("  Date:           {}", opt(&data.invoice_date));
    println!("  Subtotal:       {}", amt(data.subtotal));
    println!("  Tax:            {}", amt(data.tax));
    println!("  Total:          {}", amt(data.total));
    println!("  Currency:       {}", data.currency.as_str());
    println!(
        "  Payment:        {}",
        data.payment_method.map(|m| m.as_str()).unwrap_or("—")
    );

    if !data.items.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["SKU", "Description", "Qty", "Unit Price", "Total"]);
        for item in &data.items {
            table.add_row(vec![
                Cell::new(item.sku.clone().unwrap_or_default()),
                Cell::new(&item.description),
                Cell::new(item.quantity),
                Cell::new(money(item.unit_price)),
                Cell::new(money(item.total)),
            ]);
        }
        println!("Items\n{table}");
    }

    if let Some(purchase_id) = result.purchase_id {
        println!("{} purchase #{purchase_id}", "Created".green());
    }

    Ok(())
}
