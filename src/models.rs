use serde::{Deserialize, Serialize};

/// Business classification of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Compras,
    Finanzas,
    Gastos,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compras => "compras",
            Self::Finanzas => "finanzas",
            Self::Gastos => "gastos",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compras" => Some(Self::Compras),
            "finanzas" => Some(Self::Finanzas),
            "gastos" => Some(Self::Gastos),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Tarjeta,
    Efectivo,
    Transferencia,
    Credito,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tarjeta => "tarjeta",
            Self::Efectivo => "efectivo",
            Self::Transferencia => "transferencia",
            Self::Credito => "credito",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tarjeta" => Some(Self::Tarjeta),
            "efectivo" => Some(Self::Efectivo),
            "transferencia" => Some(Self::Transferencia),
            "credito" => Some(Self::Credito),
            _ => None,
        }
    }
}

/// Only pesos and dollars are handled; everything else reads as MXN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    MXN,
    USD,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MXN => "MXN",
            Self::USD => "USD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MXN" => Some(Self::MXN),
            "USD" => Some(Self::USD),
            _ => None,
        }
    }
}

/// One product/service row captured from an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Structured projection of one invoice's extracted text. Every field is
/// best-effort: absence is a valid terminal state, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredInvoice {
    pub supplier: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    pub total: Option<f64>,
    pub currency: Currency,
    pub payment_method: Option<PaymentMethod>,
    pub category: Category,
    pub items: Vec<LineItem>,
}

/// An invoice row as stored in the database.
#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    pub id: Option<i64>,
    pub file_name: String,
    pub checksum: String,
    pub extracted_text: String,
    pub data: StructuredInvoice,
    pub status: String,
    pub purchase_id: Option<i64>,
}

/// A purchase record derived from a `compras` invoice.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct PurchaseRecord {
    pub id: Option<i64>,
    pub supplier: String,
    pub description: String,
    pub total: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub invoice_number: Option<String>,
    pub purchased_at: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in [Category::Compras, Category::Finanzas, Category::Gastos] {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("ventas"), None);
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for pm in [
            PaymentMethod::Tarjeta,
            PaymentMethod::Efectivo,
            PaymentMethod::Transferencia,
            PaymentMethod::Credito,
        ] {
            assert_eq!(PaymentMethod::parse(pm.as_str()), Some(pm));
        }
    }

    #[test]
    fn test_line_item_json_omits_missing_sku() {
        let item = LineItem {
            sku: None,
            description: "Cemento gris 50kg".to_string(),
            quantity: 2.0,
            unit_price: 180.0,
            total: 360.0,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("sku"));
        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
