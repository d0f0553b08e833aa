//! Heuristic extraction of structured invoice data from OCR/PDF text.
//!
//! Everything here is a pure projection of the input string: independent
//! keyword-anchored passes over the same text, combined into one
//! [`StructuredInvoice`]. No pass depends on another's output, no pass ever
//! fails — an extractor that finds nothing reports the field as absent, so a
//! noisy scan still flows through intake instead of blocking it.
//!
//! Pattern lists are evaluated in priority order with first-match-wins
//! semantics. The ordering is load-bearing; see the comments on each table.

use regex::Regex;

use crate::models::{Category, Currency, LineItem, PaymentMethod, StructuredInvoice};

// ---------------------------------------------------------------------------
// Pattern tables
// ---------------------------------------------------------------------------

/// Checked before `EXPENSE_KEYWORDS`: any hit classifies as compras even if
/// an expense keyword also appears.
const PURCHASE_KEYWORDS: &[&str] = &[
    "compra",
    "proveedor",
    "home depot",
    "ferreteria",
    "material",
    "herramienta",
    "subtotal",
    "unit price",
    "cantidad",
    "sku",
    "order",
    "purchase",
];

const EXPENSE_KEYWORDS: &[&str] = &[
    "gasto", "expense", "servicio", "service", "luz", "agua", "telefono", "internet", "renta",
    "nomina",
];

const SUPPLIER_LABEL: &str = r"(?i)(?:proveedor|supplier|vendor|tienda|store)[:\s]*(.+)";

/// Vendors we see on most of our purchase invoices.
const KNOWN_VENDOR: &str = r"(?i)home\s*depot|lowes|ferret[eé]ria|construrama|cemex|comex";

/// Header-ish first lines that are never a supplier name.
const NON_SUPPLIER_HEADER: &str = r"(?i)^(?:fecha|date|invoice|factura|total|order)";

/// Labeled token first, bare vendor-style id (`AB123456`) second.
const INVOICE_NUMBER_PATTERNS: &[&str] = &[
    r"(?i)(?:invoice|factura|folio|no\.|#|order|pedido)[:\s#-]*([A-Z0-9][\w-]{3,})",
    r"([A-Z]{2,}\d{4,})",
];

/// Labeled date first, then bare DD/MM/YYYY, then bare YYYY/MM/DD.
const DATE_PATTERNS: &[&str] = &[
    r"(?i)(?:fecha|date)[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})",
    r"(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
    r"(\d{4}[/\-]\d{1,2}[/\-]\d{1,2})",
];

const SUBTOTAL_PATTERN: &str = r"(?i)\b(?:subtotal|sub\s*total)[:\s]*\$?\s*([\d,]+\.?\d*)";

const TAX_PATTERN: &str = r"(?i)\b(?:tax|iva|impuesto|i\.v\.a\.?)[:\s]*\$?\s*([\d,]+\.?\d*)";

/// Grand-total labels outrank the bare label. The bare `total` is anchored on
/// a word boundary so it cannot match inside "Subtotal".
const TOTAL_PATTERNS: &[&str] = &[
    r"(?i)\b(?:order\s*total|total\s*order|grand\s*total|total\s*general)[:\s]*\$?\s*([\d,]+\.?\d*)",
    r"(?i)\btotal[:\s]*\$?\s*([\d,]+\.?\d*)",
];

/// Two-decimal money shape, for the unlabeled-total fallback scan.
const MONEY_SHAPE: &str = r"\$?\s*([\d,]+\.\d{2})";

const USD_PATTERN: &str = r"(?i)USD|\$\s*US|US\s*\$|dollars?";

/// Card terms must be checked before the generic credito bucket, otherwise
/// "tarjeta de crédito" would land in Credito.
const PAYMENT_PATTERNS: &[(&str, PaymentMethod)] = &[
    (
        r"(?i)credit\s*card|tarjeta\s*de\s*cr[ée]dito|visa|mastercard|amex",
        PaymentMethod::Tarjeta,
    ),
    (r"(?i)efectivo|cash", PaymentMethod::Efectivo),
    (r"(?i)transfer|transferencia|wire", PaymentMethod::Transferencia),
    (r"(?i)cr[ée]dito|credit|financing", PaymentMethod::Credito),
];

/// Family A (tabular `SKU DESC QTY PRICE TOTAL`) before family B (inline
/// `DESC QTY @ PRICE = TOTAL`). The last three capture groups of either
/// family are quantity, unit price, and line total, so both share one
/// extraction path. First family yielding an item wins; families are never
/// unioned.
const ITEM_PATTERNS: &[&str] = &[
    r"([A-Z0-9]{4,})\s+(.{10,50}?)\s+(\d+(?:\.\d+)?)\s+\$?([\d,]+\.?\d*)\s+\$?([\d,]+\.?\d*)",
    r"(.{10,50}?)\s+(\d+(?:\.\d+)?)\s*[@x]\s*\$?([\d,]+\.?\d*)\s*=?\s*\$?([\d,]+\.?\d*)",
];

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Extract structured data from the visible text of one invoice document.
///
/// Deterministic and side-effect free; tolerant of OCR noise because it
/// relies only on keyword/pattern presence, never exact layout. Cannot fail:
/// worst case every optional field is absent, category defaults to finanzas,
/// currency to MXN, and items is empty.
pub fn extract(text: &str) -> StructuredInvoice {
    let text_lower = text.to_lowercase();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let amounts = extract_amounts(text);

    StructuredInvoice {
        supplier: extract_supplier(&lines),
        invoice_number: extract_invoice_number(text),
        invoice_date: extract_date(text),
        subtotal: amounts.subtotal,
        tax: amounts.tax,
        total: amounts.total,
        currency: extract_currency(text),
        payment_method: extract_payment_method(text),
        category: classify(&text_lower),
        items: extract_items(text),
    }
}

// ---------------------------------------------------------------------------
// Scalar passes
// ---------------------------------------------------------------------------

fn classify(text_lower: &str) -> Category {
    if PURCHASE_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        Category::Compras
    } else if EXPENSE_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        Category::Gastos
    } else {
        Category::Finanzas
    }
}

/// Scan only the first 10 non-empty lines: label patterns, then known-vendor
/// names. Fallback is the first meaningful line, clipped to 100 chars.
fn extract_supplier(lines: &[&str]) -> Option<String> {
    let label_re = Regex::new(SUPPLIER_LABEL).ok()?;
    let vendor_re = Regex::new(KNOWN_VENDOR).ok()?;

    for line in lines.iter().take(10) {
        if let Some(caps) = label_re.captures(line) {
            return Some(clip(caps[1].trim(), 100));
        }
        if let Some(m) = vendor_re.find(line) {
            return Some(clip(m.as_str(), 100));
        }
    }

    let header_re = Regex::new(NON_SUPPLIER_HEADER).ok()?;
    lines
        .iter()
        .find(|l| l.chars().count() >= 4 && !header_re.is_match(l))
        .map(|l| clip(l, 100))
}

fn clip(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn extract_invoice_number(text: &str) -> Option<String> {
    for pattern in INVOICE_NUMBER_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(m) = re.captures(text).and_then(|c| c.get(1)) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

fn extract_date(text: &str) -> Option<String> {
    for pattern in DATE_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(m) = re.captures(text).and_then(|c| c.get(1)) {
            return normalize_date(m.as_str());
        }
    }
    None
}

/// Normalize a delimited numeric date to `YYYY-MM-DD`. A 4-digit first
/// component reads as year-month-day; anything else reads as day-month-year,
/// with 2-digit years expanded by prefixing "20".
///
/// Known limitation: there is no locale detection, so a US-formatted
/// `MM/DD/YYYY` date with both components <= 12 is silently read as
/// `DD/MM/YYYY`. Deliberately left as-is.
fn normalize_date(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[0].len() == 4 {
        Some(format!("{}-{:0>2}-{:0>2}", parts[0], parts[1], parts[2]))
    } else {
        let year = if parts[2].len() == 2 {
            format!("20{}", parts[2])
        } else {
            parts[2].to_string()
        };
        Some(format!("{year}-{:0>2}-{:0>2}", parts[1], parts[0]))
    }
}

struct Amounts {
    subtotal: Option<f64>,
    tax: Option<f64>,
    total: Option<f64>,
}

fn extract_amounts(text: &str) -> Amounts {
    let subtotal = capture_money(text, SUBTOTAL_PATTERN);
    let tax = capture_money(text, TAX_PATTERN);

    let mut total = None;
    for pattern in TOTAL_PATTERNS {
        if let Some(v) = capture_money(text, pattern) {
            total = Some(v);
            break;
        }
    }

    // No labeled total anywhere: the biggest money-shaped number on an
    // invoice is usually the grand total. This is the only pass allowed to
    // scan the whole document indiscriminately.
    if total.is_none() {
        if let Ok(re) = Regex::new(MONEY_SHAPE) {
            total = re
                .captures_iter(text)
                .filter_map(|c| parse_money(&c[1]))
                .fold(None, |best: Option<f64>, v| match best {
                    Some(b) if b >= v => Some(b),
                    _ => Some(v),
                });
        }
    }

    Amounts {
        subtotal,
        tax,
        total,
    }
}

fn capture_money(text: &str, pattern: &str) -> Option<f64> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;
    parse_money(&caps[1])
}

/// Strip thousands separators and parse. Malformed tokens are absent, never
/// zero.
fn parse_money(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse::<f64>().ok()
}

fn extract_currency(text: &str) -> Currency {
    match Regex::new(USD_PATTERN) {
        Ok(re) if re.is_match(text) => Currency::USD,
        _ => Currency::MXN,
    }
}

fn extract_payment_method(text: &str) -> Option<PaymentMethod> {
    for (pattern, method) in PAYMENT_PATTERNS {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(text) {
                return Some(*method);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

fn extract_items(text: &str) -> Vec<LineItem> {
    for pattern in ITEM_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let mut items = Vec::new();
        for caps in re.captures_iter(text) {
            let n = caps.len();
            let first = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let sku_like =
                !first.is_empty() && first.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

            let description = if sku_like {
                caps.get(2).map(|m| m.as_str().trim()).unwrap_or("")
            } else {
                first.trim()
            };
            let description = if description.is_empty() {
                "Producto".to_string()
            } else {
                description.to_string()
            };

            // Positional convention shared by both families: the last three
            // groups are quantity, unit price, line total.
            let quantity = caps
                .get(n - 3)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(1.0);
            let unit_price = caps
                .get(n - 2)
                .and_then(|m| parse_money(m.as_str()))
                .unwrap_or(0.0);
            let total = caps
                .get(n - 1)
                .and_then(|m| parse_money(m.as_str()))
                .unwrap_or(0.0);

            // Guards against accidental matches on page headers/footers.
            if total > 0.0 {
                items.push(LineItem {
                    sku: sku_like.then(|| first.to_string()),
                    description,
                    quantity,
                    unit_price,
                    total,
                });
            }
        }
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}
