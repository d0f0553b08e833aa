use crate::cli::parse_category_opt;
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;
use crate::store::list_invoices;

/// CSV export of stored invoices, one row per invoice. Line items are not
/// flattened; the items column carries the count.
pub fn run(category: Option<&str>, output: &str) -> Result<()> {
    let category = parse_category_opt(category)?;
    let conn = get_connection(&db_path())?;
    let invoices = list_invoices(&conn, category, usize::MAX)?;

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([
        "id",
        "file_name",
        "supplier",
        "invoice_number",
        "invoice_date",
        "subtotal",
        "tax",
        "total",
        "currency",
        "payment_method",
        "category",
        "items_count",
        "status",
    ])?;

    let count = invoices.len();
    for invoice in invoices {
        let d = &invoice.data;
        let num = |v: Option<f64>| v.map(|n| format!("{n:.2}")).unwrap_or_default();
        writer.write_record([
            invoice.id.unwrap_or_default().to_string(),
            invoice.file_name.clone(),
            d.supplier.clone().unwrap_or_default(),
            d.invoice_number.clone().unwrap_or_default(),
            d.invoice_date.clone().unwrap_or_default(),
            num(d.subtotal),
            num(d.tax),
            num(d.total),
            d.currency.as_str().to_string(),
            d.payment_method.map(|m| m.as_str()).unwrap_or("").to_string(),
            d.category.as_str().to_string(),
            d.items.len().to_string(),
            invoice.status.clone(),
        ])?;
    }
    writer.flush()?;

    println!("Exported {count} invoices to {output}");
    Ok(())
}
