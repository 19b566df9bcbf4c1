//! Transaction documents supplied by the host application.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::template::Module;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Sale,
    Purchase,
    /// Order-history view of a sale.
    History,
    Report,
    Receipt,
    Payment,
}

impl DocumentType {
    /// Cash vouchers render without line items.
    pub fn is_voucher(self) -> bool {
        matches!(self, DocumentType::Receipt | DocumentType::Payment)
    }

    /// Documents addressed to a customer rather than a supplier.
    pub fn is_customer_facing(self) -> bool {
        matches!(
            self,
            DocumentType::Sale | DocumentType::Receipt | DocumentType::History
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentType::Sale => "SALES INVOICE",
            DocumentType::History => "TRANSACTION DETAIL",
            DocumentType::Purchase => "PURCHASE RECEIPT",
            DocumentType::Report => "DETAILED REPORT",
            DocumentType::Receipt => "CASH RECEIPT",
            DocumentType::Payment => "CASH PAYMENT",
        }
    }

    /// Documents that carry the old-debt, paid and balance lines.
    pub fn has_ledger(self) -> bool {
        matches!(
            self,
            DocumentType::Sale | DocumentType::Purchase | DocumentType::Report
        )
    }

    pub fn module(self) -> Module {
        Module::for_document(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Debt,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Debt => "Debt",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Partner {
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// One row of the line-item table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub product_name: String,
    pub unit: String,
    pub secondary_unit: Option<String>,
    /// Primary units per secondary unit.
    pub multiplier: f64,
    pub quantity: f64,
    pub price: f64,
    pub cost_price: f64,
    // Report rows
    pub code: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub payment_method: Option<PaymentMethod>,
    pub total_amount: Option<f64>,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDocument {
    pub id: Option<i64>,
    #[serde(default)]
    pub display_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub partner: Option<Partner>,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub details: Vec<LineItem>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub old_debt: f64,
    #[serde(default)]
    pub note: String,
    /// Voucher amount.
    #[serde(default)]
    pub amount: f64,
}

impl TransactionDocument {
    pub fn new(doc_type: DocumentType) -> Self {
        Self {
            id: None,
            display_id: None,
            date: None,
            partner: None,
            doc_type,
            details: Vec::new(),
            total_amount: 0.0,
            amount_paid: 0.0,
            old_debt: 0.0,
            note: String::new(),
            amount: 0.0,
        }
    }

    /// `display_id`, else the numeric id, else `Draft`.
    pub fn reference(&self) -> String {
        match (&self.display_id, self.id) {
            (Some(d), _) if !d.is_empty() => d.clone(),
            (_, Some(id)) => id.to_string(),
            _ => "Draft".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_with_missing_fields() {
        let json = r#"{"id": 7, "type": "Sale", "details": [{"product_name": "Rice", "quantity": 2}]}"#;
        let doc: TransactionDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.doc_type, DocumentType::Sale);
        assert_eq!(doc.details[0].price, 0.0);
        assert!(doc.partner.is_none());
        assert_eq!(doc.reference(), "7");
    }

    #[test]
    fn reference_fallbacks() {
        let mut doc = TransactionDocument::new(DocumentType::Receipt);
        assert_eq!(doc.reference(), "Draft");
        doc.display_id = Some("PT-0001".into());
        assert_eq!(doc.reference(), "PT-0001");
    }
}
