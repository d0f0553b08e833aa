use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;
use crate::store::get_invoice;

pub fn run(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let invoice = get_invoice(&conn, id)?;
    let d = &invoice.data;

    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "—".to_string());
    let amt = |v: Option<f64>| v.map(money).unwrap_or_else(|| "—".to_string());

    println!("Invoice #{id} — {}", invoice.file_name);
    println!("  Supplier:       {}", opt(&d.supplier));
    println!("  Invoice number: {}", opt(&d.invoice_number));
    println!("  Date:           {}", opt(&d.invoice_date));
    println!("  Subtotal:       {}", amt(d.subtotal));
    println!("  Tax:            {}", amt(d.tax));
    println!("  Total:          {}", amt(d.total));
    println!("  Currency:       {}", d.currency.as_str());
    println!(
        "  Payment:        {}",
        d.payment_method.map(|m| m.as_str()).unwrap_or("—")
    );
    println!("  Category:       {}", d.category.as_str());
    println!("  Status:         {}", invoice.status);
    if let Some(purchase_id) = invoice.purchase_id {
        println!("  Purchase:       #{purchase_id}");
    }

    if d.items.is_empty() {
        println!("  Items:          (none)");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["SKU", "Description", "Qty", "Unit Price", "Total"]);
        for item in &d.items {
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

    let excerpt: String = invoice.extracted_text.chars().take(300).collect();
    if !excerpt.is_empty() {
        println!("Text excerpt:\n{excerpt}");
    }
    Ok(())
}
