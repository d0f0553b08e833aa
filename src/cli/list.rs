use comfy_table::{Cell, Table};

use crate::cli::parse_category_opt;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;
use crate::store::list_invoices;

pub fn run(category: Option<&str>, limit: usize) -> Result<()> {
    let category = parse_category_opt(category)?;
    let conn = get_connection(&db_path())?;
    let invoices = list_invoices(&conn, category, limit)?;

    if invoices.is_empty() {
        println!("No invoices stored yet. Run `facturas ingest <file>` to add one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Supplier", "Number", "Date", "Total", "Currency", "Category", "Status",
    ]);
    for invoice in &invoices {
        let d = &invoice.data;
        table.add_row(vec![
            Cell::new(invoice.id.unwrap_or_default()),
            Cell::new(d.supplier.clone().unwrap_or_default()),
            Cell::new(d.invoice_number.clone().unwrap_or_default()),
            Cell::new(d.invoice_date.clone().unwrap_or_default()),
            Cell::new(d.total.map(money).unwrap_or_default()),
            Cell::new(d.currency.as_str()),
            Cell::new(d.category.as_str()),
            Cell::new(&invoice.status),
        ]);
    }
    println!("Invoices\n{table}");
    Ok(())
}
