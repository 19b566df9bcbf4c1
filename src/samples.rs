//! Sample documents for the designer preview.
//!
//! Each sample exercises the parts of the layout its module uses: secondary
//! units and carried-over debt on invoices, report rows with codes and
//! payment methods, and voucher notes. Output is deterministic.

use chrono::{NaiveDate, NaiveDateTime};

use crate::document::{DocumentType, LineItem, Partner, PaymentMethod, TransactionDocument};
use crate::template::Module;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(h, min, 0)
}

fn item(name: &str, unit: &str, quantity: f64, price: f64) -> LineItem {
    LineItem {
        product_name: name.to_string(),
        unit: unit.to_string(),
        multiplier: 1.0,
        quantity,
        price,
        ..LineItem::default()
    }
}

fn packed(mut item: LineItem, secondary: &str, multiplier: f64) -> LineItem {
    item.secondary_unit = Some(secondary.to_string());
    item.multiplier = multiplier;
    item
}

fn report_row(code: &str, day: u32, method: PaymentMethod, total: f64) -> LineItem {
    LineItem {
        code: Some(code.to_string()),
        date: at(2024, 3, day, 9, 30),
        payment_method: Some(method),
        total_amount: Some(total),
        quantity: 1.0,
        price: total,
        ..LineItem::default()
    }
}

fn total_of(details: &[LineItem]) -> f64 {
    details.iter().map(LineItem::line_total).sum()
}

/// Invoice with packed goods and an outstanding balance.
pub fn sale_sample() -> TransactionDocument {
    let details = vec![
        packed(item("Mineral water 500ml", "Bottle", 30.0, 5_000.0), "Case", 24.0),
        packed(item("Instant noodles", "Pack", 60.0, 4_500.0), "Box", 30.0),
        item("Cooking oil 1L", "Bottle", 3.0, 52_000.0),
    ];
    let mut doc = TransactionDocument::new(DocumentType::Sale);
    doc.id = Some(1024);
    doc.display_id = Some("HD-1024".to_string());
    doc.date = at(2024, 3, 15, 14, 5);
    doc.partner = Some(Partner {
        id: Some(7),
        name: "Green Grocer".to_string(),
        phone: "0901 234 567".to_string(),
        address: "12 Market Street".to_string(),
    });
    doc.total_amount = total_of(&details);
    doc.amount_paid = 300_000.0;
    doc.old_debt = 120_000.0;
    doc.note = "Deliver before noon".to_string();
    doc.details = details;
    doc
}

pub fn purchase_sample() -> TransactionDocument {
    let details = vec![
        packed(item("Rice 5kg", "Bag", 48.0, 95_000.0), "Pallet", 24.0),
        item("Sugar 1kg", "Bag", 20.0, 21_000.0),
    ];
    let mut doc = TransactionDocument::new(DocumentType::Purchase);
    doc.id = Some(311);
    doc.display_id = Some("PN-0311".to_string());
    doc.date = at(2024, 3, 14, 8, 45);
    doc.partner = Some(Partner {
        id: Some(3),
        name: "Northern Wholesale".to_string(),
        phone: "0243 555 010".to_string(),
        address: "Lot 4, Industrial Park".to_string(),
    });
    doc.total_amount = total_of(&details);
    doc.amount_paid = 4_000_000.0;
    doc.old_debt = 1_500_000.0;
    doc.details = details;
    doc
}

pub fn report_sample() -> TransactionDocument {
    let details = vec![
        report_row("HD-1020", 11, PaymentMethod::Cash, 450_000.0),
        report_row("HD-1021", 12, PaymentMethod::Debt, 1_275_000.0),
        report_row("HD-1024", 15, PaymentMethod::Debt, 618_000.0),
    ];
    let mut doc = TransactionDocument::new(DocumentType::Report);
    doc.display_id = Some("RP-2024-03".to_string());
    doc.date = at(2024, 3, 31, 17, 0);
    doc.partner = Some(Partner {
        id: Some(7),
        name: "Green Grocer".to_string(),
        ..Partner::default()
    });
    doc.total_amount = details.iter().filter_map(|d| d.total_amount).sum();
    doc.amount_paid = 450_000.0;
    doc.old_debt = 200_000.0;
    doc.details = details;
    doc
}

fn voucher(doc_type: DocumentType, display_id: &str, party: &str, amount: f64, note: &str) -> TransactionDocument {
    let mut doc = TransactionDocument::new(doc_type);
    doc.display_id = Some(display_id.to_string());
    doc.date = at(2024, 3, 16, 10, 20);
    doc.partner = Some(Partner {
        name: party.to_string(),
        ..Partner::default()
    });
    doc.amount = amount;
    doc.note = note.to_string();
    doc
}

pub fn receipt_sample() -> TransactionDocument {
    voucher(DocumentType::Receipt, "PT-0042", "Green Grocer", 500_000.0, "Debt collection for March")
}

pub fn payment_sample() -> TransactionDocument {
    voucher(DocumentType::Payment, "PC-0017", "Northern Wholesale", 2_000_000.0, "Settle purchase PN-0311")
}

/// Preview document for `module`.
pub fn sample_document(module: Module) -> TransactionDocument {
    match module {
        Module::Sale => sale_sample(),
        Module::Purchase => purchase_sample(),
        Module::Report => report_sample(),
        Module::Receipt => receipt_sample(),
        Module::Payment => payment_sample(),
    }
}
