use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::extractor;
use crate::models::{Category, InvoiceRecord, PurchaseRecord, StructuredInvoice};
use crate::store;

pub struct IngestResult {
    pub duplicate_file: bool,
    pub invoice_id: Option<i64>,
    pub purchase_id: Option<i64>,
    pub data: Option<StructuredInvoice>,
}

fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Ingest one extracted-text file: run the engine, store the invoice row,
/// and raise a purchase record when it classifies as compras. A file whose
/// checksum is already stored is rejected instead of re-processed.
pub fn ingest_file(conn: &Connection, file_path: &Path) -> Result<IngestResult> {
    let bytes = std::fs::read(file_path)?;
    let checksum = compute_checksum(&bytes);

    if store::checksum_exists(conn, &checksum)? {
        return Ok(IngestResult {
            duplicate_file: true,
            invoice_id: None,
            purchase_id: None,
            data: None,
        });
    }

    // OCR output is not always clean UTF-8; a lossy read keeps intake alive.
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let data = extractor::extract(&text);

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();

    let invoice_id = store::insert_invoice(
        conn,
        &InvoiceRecord {
            id: None,
            file_name,
            checksum,
            extracted_text: text.clone(),
            data: data.clone(),
            status: "pending".to_string(),
            purchase_id: None,
        },
    )?;

    let mut purchase_id = None;
    if data.category == Category::Compras {
        let purchase = build_purchase(&data, &text, invoice_id);
        let id = store::insert_purchase(conn, &purchase)?;
        store::link_purchase(conn, invoice_id, id)?;
        purchase_id = Some(id);
    }

    store::set_status(conn, invoice_id, "done")?;

    Ok(IngestResult {
        duplicate_file: false,
        invoice_id: Some(invoice_id),
        purchase_id,
        data: Some(data),
    })
}

fn build_purchase(data: &StructuredInvoice, text: &str, invoice_id: i64) -> PurchaseRecord {
    let supplier = match (&data.supplier, &data.invoice_number) {
        (Some(s), _) => s.clone(),
        (None, Some(n)) => format!("Factura {n}"),
        (None, None) => "Proveedor desconocido".to_string(),
    };
    let description: String = text.chars().take(1000).collect();
    let purchased_at = data
        .invoice_date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let notes = serde_json::json!({
        "section_detected": data.category.as_str(),
        "invoice_id": invoice_id,
        "items_count": data.items.len(),
    })
    .to_string();

    PurchaseRecord {
        id: None,
        supplier,
        description,
        total: data.total.unwrap_or(0.0),
        status: "pendiente".to_string(),
        payment_method: data.payment_method.map(|m| m.as_str().to_string()),
        invoice_number: data.invoice_number.clone(),
        purchased_at,
        notes: Some(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use std::path::PathBuf;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_ingest_stores_invoice_and_purchase() {
        let (dir, conn) = test_db();
        let path = write_text(
            dir.path(),
            "factura.txt",
            "HOME DEPOT\nFactura: AB1234\nFecha: 12/01/2024\nSubtotal: $100.00\nIVA: $16.00\nTotal: $116.00\nTarjeta de crédito",
        );
        let result = ingest_file(&conn, &path).unwrap();
        assert!(!result.duplicate_file);
        let invoice_id = result.invoice_id.unwrap();
        assert!(result.purchase_id.is_some());

        let invoice = store::get_invoice(&conn, invoice_id).unwrap();
        assert_eq!(invoice.status, "done");
        assert_eq!(invoice.purchase_id, result.purchase_id);
        assert_eq!(invoice.file_name, "factura.txt");

        let (supplier, total, purchased_at): (String, f64, String) = conn
            .query_row(
                "SELECT supplier, total, purchased_at FROM purchases WHERE id = ?1",
                [result.purchase_id.unwrap()],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(supplier, "HOME DEPOT");
        assert_eq!(total, 116.0);
        assert_eq!(purchased_at, "2024-01-12");
    }

    #[test]
    fn test_ingest_expense_creates_no_purchase() {
        let (dir, conn) = test_db();
        let path = write_text(dir.path(), "recibo.txt", "Recibo de pago de luz\nTotal a pagar $450.00");
        let result = ingest_file(&conn, &path).unwrap();
        assert!(result.purchase_id.is_none());
        let count: i64 = conn
            .query_row("SELECT count(*) FROM purchases", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_ingest_rejects_duplicate_checksum() {
        let (dir, conn) = test_db();
        let path = write_text(dir.path(), "factura.txt", "Total: $10.00");
        let first = ingest_file(&conn, &path).unwrap();
        assert!(!first.duplicate_file);
        let second = ingest_file(&conn, &path).unwrap();
        assert!(second.duplicate_file);
        assert_eq!(second.invoice_id, None);
        let count: i64 = conn
            .query_row("SELECT count(*) FROM invoices", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_purchase_supplier_falls_back_to_invoice_number() {
        let data = StructuredInvoice {
            supplier: None,
            invoice_number: Some("AB1234".to_string()),
            invoice_date: None,
            subtotal: None,
            tax: None,
            total: None,
            currency: crate::models::Currency::MXN,
            payment_method: None,
            category: Category::Compras,
            items: vec![],
        };
        let purchase = build_purchase(&data, "texto", 1);
        assert_eq!(purchase.supplier, "Factura AB1234");
        assert_eq!(purchase.total, 0.0);

        let data = StructuredInvoice {
            invoice_number: None,
            ..data
        };
        let purchase = build_purchase(&data, "texto", 1);
        assert_eq!(purchase.supplier, "Proveedor desconocido");
    }
}
