//! Aggregator – summary figures printed under the line-item table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentType, LineItem, TransactionDocument};
use crate::format::format_number;

/// Secondary-unit subtotals in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryTotals(pub Vec<(String, i64)>);

impl SecondaryTotals {
    fn add(&mut self, unit: &str, whole: i64) {
        match self.0.iter_mut().find(|(u, _)| u == unit) {
            Some((_, total)) => *total += whole,
            None => self.0.push((unit.to_string(), whole)),
        }
    }

    pub fn get(&self, unit: &str) -> Option<i64> {
        self.0.iter().find(|(u, _)| u == unit).map(|(_, v)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SecondaryTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (unit, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{value} {unit}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_items: usize,
    pub total_qty: f64,
    pub secondary: SecondaryTotals,
    /// `None` for vouchers.
    pub balance: Option<f64>,
}

/// Whole secondary units in one line, if the item has a secondary unit.
fn whole_secondary(item: &LineItem) -> Option<(&str, i64, f64)> {
    let unit = item.secondary_unit.as_deref().filter(|u| !u.is_empty())?;
    if item.multiplier <= 1.0 {
        return None;
    }
    let whole = (item.quantity / item.multiplier).floor();
    let remainder = item.quantity - whole * item.multiplier;
    Some((unit, whole as i64, remainder))
}

pub fn secondary_totals(details: &[LineItem]) -> SecondaryTotals {
    let mut totals = SecondaryTotals::default();
    for (unit, whole, _) in details.iter().filter_map(whole_secondary) {
        if whole != 0 {
            totals.add(unit, whole);
        }
    }
    totals
}

/// Cell text for the pack-quantity column: `"<whole> <unit>"`, plus
/// `" + <rest>"` for leftover primary units, or `-`.
pub fn secondary_breakdown(item: &LineItem) -> String {
    match whole_secondary(item) {
        Some((unit, whole, remainder)) if whole != 0 => {
            if remainder > 0.0 {
                format!("{whole} {unit} + {}", format_number(remainder))
            } else {
                format!("{whole} {unit}")
            }
        }
        _ => "-".to_string(),
    }
}

/// Remaining balance after this document.
///
/// Sale-side and purchase-side documents use different sign conventions;
/// both are kept as the business defines them.
pub fn balance(
    doc_type: DocumentType,
    total_amount: f64,
    old_debt: f64,
    amount_paid: f64,
) -> Option<f64> {
    match doc_type {
        DocumentType::Sale => Some((total_amount + old_debt) - amount_paid),
        DocumentType::Purchase | DocumentType::Report => {
            Some(old_debt - (total_amount - amount_paid))
        }
        DocumentType::History | DocumentType::Receipt | DocumentType::Payment => None,
    }
}

/// Old-debt and balance lines exist only when there is carried-over debt,
/// whatever their individual toggles say.
pub fn shows_ledger_lines(old_debt: f64) -> bool {
    old_debt != 0.0
}

pub fn aggregate(doc: &TransactionDocument) -> Aggregates {
    Aggregates {
        total_items: doc.details.len(),
        total_qty: doc.details.iter().map(|d| d.quantity).sum(),
        secondary: secondary_totals(&doc.details),
        balance: balance(doc.doc_type, doc.total_amount, doc.old_debt, doc.amount_paid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, multiplier: f64, unit: Option<&str>) -> LineItem {
        LineItem {
            quantity,
            multiplier,
            secondary_unit: unit.map(str::to_string),
            ..LineItem::default()
        }
    }

    #[test]
    fn secondary_subtotal_floors_per_line() {
        let details = vec![item(30.0, 24.0, Some("Case")), item(10.0, 24.0, Some("Case"))];
        let totals = secondary_totals(&details);
        assert_eq!(totals.0, vec![("Case".to_string(), 1)]);
    }

    #[test]
    fn secondary_subtotal_keeps_first_seen_order() {
        let details = vec![
            item(50.0, 10.0, Some("Box")),
            item(48.0, 24.0, Some("Case")),
            item(20.0, 10.0, Some("Box")),
            item(5.0, 1.0, Some("Each")),
            item(40.0, 20.0, None),
        ];
        let totals = secondary_totals(&details);
        assert_eq!(totals.to_string(), "7 Box / 2 Case");
    }

    #[test]
    fn breakdown_cell() {
        assert_eq!(secondary_breakdown(&item(30.0, 24.0, Some("Case"))), "1 Case + 6");
        assert_eq!(secondary_breakdown(&item(48.0, 24.0, Some("Case"))), "2 Case");
        assert_eq!(secondary_breakdown(&item(10.0, 24.0, Some("Case"))), "-");
        assert_eq!(secondary_breakdown(&item(10.0, 0.0, None)), "-");
    }

    #[test]
    fn balance_conventions() {
        assert_eq!(balance(DocumentType::Sale, 100.0, 50.0, 30.0), Some(120.0));
        assert_eq!(balance(DocumentType::Purchase, 100.0, 50.0, 30.0), Some(-20.0));
        assert_eq!(balance(DocumentType::Report, 100.0, 50.0, 30.0), Some(-20.0));
        assert_eq!(balance(DocumentType::Receipt, 100.0, 50.0, 30.0), None);
        assert_eq!(balance(DocumentType::History, 100.0, 50.0, 30.0), None);
    }

    #[test]
    fn ledger_lines_need_debt() {
        assert!(!shows_ledger_lines(0.0));
        assert!(shows_ledger_lines(-1.0));
        assert!(shows_ledger_lines(10.0));
    }

    #[test]
    fn totals() {
        let mut doc = TransactionDocument::new(DocumentType::Sale);
        doc.details = vec![item(2.0, 0.0, None), item(3.5, 0.0, None)];
        let agg = aggregate(&doc);
        assert_eq!(agg.total_items, 2);
        assert_eq!(agg.total_qty, 5.5);
        assert!(agg.secondary.is_empty());
    }
}
