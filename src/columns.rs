//! Column planner – ordered, visible columns of the line-item table.

use serde::{Deserialize, Serialize};

use crate::document::DocumentType;
use crate::render_tree::TextAlign;
use crate::settings::ColumnSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    Stt,
    Code,
    Date,
    Method,
    Name,
    Unit,
    SecondaryQty,
    Qty,
    Price,
    Total,
}

impl ColumnId {
    pub fn label(self) -> &'static str {
        match self {
            ColumnId::Stt => "No.",
            ColumnId::Code => "Order",
            ColumnId::Date => "Date",
            ColumnId::Method => "Payment",
            ColumnId::Name => "Item",
            ColumnId::Unit => "Unit",
            ColumnId::SecondaryQty => "Pack qty",
            ColumnId::Qty => "Qty",
            ColumnId::Price => "Unit price",
            ColumnId::Total => "Amount",
        }
    }

    pub fn align(self) -> TextAlign {
        match self {
            ColumnId::Name => TextAlign::Left,
            ColumnId::SecondaryQty | ColumnId::Price | ColumnId::Total => TextAlign::Right,
            _ => TextAlign::Center,
        }
    }
}

/// Fixed column order for report rows.
const REPORT_ORDER: [ColumnId; 5] = [
    ColumnId::Stt,
    ColumnId::Code,
    ColumnId::Date,
    ColumnId::Method,
    ColumnId::Total,
];

/// Fixed column order for every other line-item document.
const ITEM_ORDER: [ColumnId; 7] = [
    ColumnId::Stt,
    ColumnId::Name,
    ColumnId::Unit,
    ColumnId::SecondaryQty,
    ColumnId::Qty,
    ColumnId::Price,
    ColumnId::Total,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub label: String,
    pub width_px: f32,
    pub align: TextAlign,
    pub visible: bool,
    /// First visible column.
    pub first: bool,
    /// Last visible column.
    pub last: bool,
}

/// Candidate columns for one render, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnPlan {
    pub columns: Vec<Column>,
}

impl ColumnPlan {
    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn visible_ids(&self) -> Vec<ColumnId> {
        self.visible().map(|c| c.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visible().next().is_none()
    }

    pub fn total_width_px(&self) -> f32 {
        self.visible().map(|c| c.width_px).sum()
    }
}

fn column_setting(id: ColumnId, s: &ColumnSettings) -> (bool, f32) {
    match id {
        ColumnId::Stt => (s.show_stt, s.stt_width),
        ColumnId::Code => (s.show_code, s.code_width),
        ColumnId::Date => (s.show_date, s.date_width),
        ColumnId::Method => (s.show_method, s.method_width),
        ColumnId::Name => (s.show_name, s.name_width),
        ColumnId::Unit => (s.show_unit, s.unit_width),
        ColumnId::SecondaryQty => (s.show_secondary_qty, s.secondary_qty_width),
        ColumnId::Qty => (s.show_qty, s.qty_width),
        ColumnId::Price => (s.show_price, s.price_width),
        ColumnId::Total => (s.show_total, s.total_width),
    }
}

/// Plan the table columns for `doc_type`.
pub fn plan_columns(doc_type: DocumentType, settings: &ColumnSettings) -> ColumnPlan {
    let order: &[ColumnId] = match doc_type {
        DocumentType::Report => &REPORT_ORDER,
        _ => &ITEM_ORDER,
    };

    let mut columns: Vec<Column> = order
        .iter()
        .map(|&id| {
            let (visible, width_px) = column_setting(id, settings);
            Column {
                id,
                label: id.label().to_string(),
                width_px,
                align: id.align(),
                visible,
                first: false,
                last: false,
            }
        })
        .collect();

    if let Some(c) = columns.iter_mut().find(|c| c.visible) {
        c.first = true;
    }
    if let Some(c) = columns.iter_mut().rev().find(|c| c.visible) {
        c.last = true;
    }

    ColumnPlan { columns }
}
