use rusqlite::Connection;

use crate::error::{FacturasError, Result};
use crate::models::{Category, Currency, InvoiceRecord, LineItem, PurchaseRecord, StructuredInvoice};

pub fn checksum_exists(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM invoices WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}

pub fn insert_invoice(conn: &Connection, record: &InvoiceRecord) -> Result<i64> {
    let data = &record.data;
    // Empty items serialize to NULL rather than '[]', matching how the
    // upstream app stored the column.
    let items_json = if data.items.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&data.items).map_err(|e| FacturasError::Other(e.to_string()))?)
    };
    conn.execute(
        "INSERT INTO invoices (file_name, checksum, extracted_text, supplier, invoice_number, \
         invoice_date, subtotal, tax, total, currency, payment_method, category, items, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        rusqlite::params![
            record.file_name,
            record.checksum,
            record.extracted_text,
            data.supplier,
            data.invoice_number,
            data.invoice_date,
            data.subtotal,
            data.tax,
            data.total,
            data.currency.as_str(),
            data.payment_method.map(|m| m.as_str()),
            data.category.as_str(),
            items_json,
            record.status,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_purchase(conn: &Connection, purchase: &PurchaseRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO purchases (supplier, description, total, status, payment_method, \
         invoice_number, purchased_at, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            purchase.supplier,
            purchase.description,
            purchase.total,
            purchase.status,
            purchase.payment_method,
            purchase.invoice_number,
            purchase.purchased_at,
            purchase.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn link_purchase(conn: &Connection, invoice_id: i64, purchase_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE invoices SET purchase_id = ?1 WHERE id = ?2",
        rusqlite::params![purchase_id, invoice_id],
    )?;
    Ok(())
}

pub fn set_status(conn: &Connection, invoice_id: i64, status: &str) -> Result<()> {
    conn.execute(
        "UPDATE invoices SET status = ?1 WHERE id = ?2",
        rusqlite::params![status, invoice_id],
    )?;
    Ok(())
}

const INVOICE_COLUMNS: &str = "id, file_name, checksum, extracted_text, supplier, invoice_number, \
     invoice_date, subtotal, tax, total, currency, payment_method, category, items, status, purchase_id";

fn row_to_invoice(row: &rusqlite::Row<'_>) -> rusqlite::Result<InvoiceRecord> {
    let currency: String = row.get(10)?;
    let payment_method: Option<String> = row.get(11)?;
    let category: String = row.get(12)?;
    let items_json: Option<String> = row.get(13)?;
    let items: Vec<LineItem> = items_json
        .as_deref()
        .and_then(|j| serde_json::from_str(j).ok())
        .unwrap_or_default();

    Ok(InvoiceRecord {
        id: Some(row.get(0)?),
        file_name: row.get(1)?,
        checksum: row.get(2)?,
        extracted_text: row.get(3)?,
        data: StructuredInvoice {
            supplier: row.get(4)?,
            invoice_number: row.get(5)?,
            invoice_date: row.get(6)?,
            subtotal: row.get(7)?,
            tax: row.get(8)?,
            total: row.get(9)?,
            currency: Currency::parse(&currency).unwrap_or(Currency::MXN),
            payment_method: payment_method
                .as_deref()
                .and_then(crate::models::PaymentMethod::parse),
            category: Category::parse(&category).unwrap_or(Category::Finanzas),
            items,
        },
        status: row.get(14)?,
        purchase_id: row.get(15)?,
    })
}

/// Newest first; upstream listed at most 50 per request, so that is the
/// default limit.
pub fn list_invoices(
    conn: &Connection,
    category: Option<Category>,
    limit: usize,
) -> Result<Vec<InvoiceRecord>> {
    let sql = match category {
        Some(_) => format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE category = ?1 \
             ORDER BY created_at DESC, id DESC LIMIT ?2"
        ),
        None => format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC LIMIT ?1"
        ),
    };
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&sql)?;
    let rows = match category {
        Some(cat) => stmt
            .query_map(rusqlite::params![cat.as_str(), limit], row_to_invoice)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => stmt
            .query_map(rusqlite::params![limit], row_to_invoice)?
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

pub fn get_invoice(conn: &Connection, id: i64) -> Result<InvoiceRecord> {
    let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    stmt.query_row([id], row_to_invoice)
        .map_err(|_| FacturasError::UnknownInvoice(id))
}

pub struct Counts {
    pub invoices: i64,
    pub compras: i64,
    pub finanzas: i64,
    pub gastos: i64,
    pub purchases: i64,
}

pub fn counts(conn: &Connection) -> Result<Counts> {
    let by_category = |cat: &str| -> Result<i64> {
        Ok(conn.query_row(
            "SELECT count(*) FROM invoices WHERE category = ?1",
            [cat],
            |r| r.get(0),
        )?)
    };
    Ok(Counts {
        invoices: conn.query_row("SELECT count(*) FROM invoices", [], |r| r.get(0))?,
        compras: by_category("compras")?,
        finanzas: by_category("finanzas")?,
        gastos: by_category("gastos")?,
        purchases: conn.query_row("SELECT count(*) FROM purchases", [], |r| r.get(0))?,
    })
}
