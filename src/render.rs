//! Document renderer – composes a [`RenderTree`] from a transaction
//! document and the resolved geometry, styles, columns and aggregates.
//!
//! Composition is pure and synchronous. It never fails: missing optional
//! fields fall back to placeholders, and a document that cannot be shown
//! yields no tree at all.

use crate::aggregate::{aggregate, secondary_breakdown, shows_ledger_lines, Aggregates};
use crate::columns::{plan_columns, Column, ColumnId, ColumnPlan};
use crate::document::{DocumentType, LineItem, PaymentMethod, TransactionDocument};
use crate::fonts::family_name;
use crate::format::{format_date, format_day, format_number};
use crate::geometry::{mm_to_px, resolve_geometry, Geometry};
use crate::interaction::Region;
use crate::render_tree::{
    BoxStyle, Corners, Direction, Edges, ImageContent, Justify, NodeKind, RenderMode, RenderNode,
    RenderTree, TextAlign,
};
use crate::settings::PrintSettings;
use crate::style::{resolve_style, BorderLine, Color, LineStyle, ResolvedStyle, TableStyle};

const LOGO_MAX_HEIGHT_PX: f32 = 60.0;
const WALK_IN_CUSTOMER: &str = "Walk-in customer";
const DRIVER_MARGIN_HINT: &str = "Print driver margins (estimated)";

/// Everything the renderer needs, resolved from settings once per render.
#[derive(Debug, Clone)]
pub struct RenderInputs<'a> {
    pub document: &'a TransactionDocument,
    pub settings: &'a PrintSettings,
    pub geometry: Geometry,
    pub style: ResolvedStyle,
    pub columns: ColumnPlan,
    pub aggregates: Aggregates,
    pub mode: RenderMode,
}

impl<'a> RenderInputs<'a> {
    pub fn resolve(
        document: &'a TransactionDocument,
        settings: &'a PrintSettings,
        mode: RenderMode,
    ) -> Self {
        Self {
            document,
            settings,
            geometry: resolve_geometry(&settings.page),
            style: resolve_style(settings),
            columns: plan_columns(document.doc_type, &settings.columns),
            aggregates: aggregate(document),
            mode,
        }
    }
}

/// Whether `document` produces any output.
///
/// Line-item documents need at least one line; vouchers always render.
pub fn should_render(document: Option<&TransactionDocument>) -> bool {
    match document {
        None => false,
        Some(doc) => doc.doc_type.is_voucher() || !doc.details.is_empty(),
    }
}

/// CSS font stack: the uploaded font's family first, when one is set.
pub fn font_stack(settings: &PrintSettings) -> String {
    let custom = settings.typography.custom_font_name.trim();
    if custom.is_empty() {
        settings.typography.font_family.clone()
    } else {
        format!("\"{}\", {}", family_name(custom), settings.typography.font_family)
    }
}

/// Compose the render tree, or `None` when there is nothing to show.
pub fn compose(inputs: &RenderInputs<'_>) -> Option<RenderTree> {
    if !should_render(Some(inputs.document)) {
        return None;
    }
    let composer = Composer { inputs };
    Some(RenderTree {
        mode: inputs.mode,
        doc_type: inputs.document.doc_type,
        geometry: inputs.geometry,
        font_family: font_stack(inputs.settings),
        base_font_size: inputs.settings.typography.base_font_size,
        line_height: inputs.settings.typography.line_spacing,
        page_directive: None,
        font_faces: Vec::new(),
        roll_length_mm: None,
        root: composer.page(),
    })
}

// ---------------------------------------------------------------------------
// Style helpers
// ---------------------------------------------------------------------------

fn text_style(size: f32, color: Color) -> BoxStyle {
    BoxStyle {
        font_size: Some(size),
        color: Some(color),
        ..BoxStyle::default()
    }
}

fn row(justify: Justify) -> BoxStyle {
    BoxStyle {
        direction: Direction::Row,
        justify,
        ..BoxStyle::default()
    }
}

fn text(s: impl Into<String>) -> RenderNode {
    RenderNode::text(s, BoxStyle::default())
}

/// `label value` pair with a bold label.
fn labelled(label: &str, value: impl Into<String>, style: BoxStyle) -> RenderNode {
    RenderNode::new(NodeKind::Row)
        .with_style(BoxStyle {
            direction: Direction::Row,
            gap: 4.0,
            ..style
        })
        .with_children(vec![
            RenderNode::text(
                label,
                BoxStyle {
                    bold: true,
                    ..BoxStyle::default()
                },
            ),
            text(value),
        ])
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

struct Composer<'i, 'a> {
    inputs: &'i RenderInputs<'a>,
}

impl Composer<'_, '_> {
    fn s(&self) -> &PrintSettings {
        self.inputs.settings
    }

    fn doc(&self) -> &TransactionDocument {
        self.inputs.document
    }

    fn preview(&self) -> bool {
        self.inputs.mode == RenderMode::Preview
    }

    fn page(&self) -> RenderNode {
        let g = &self.inputs.geometry;
        let mut style = BoxStyle {
            font_size: Some(self.s().typography.base_font_size),
            color: Some(Color::BLACK),
            background: Some(Color::WHITE),
            ..BoxStyle::default()
        };
        if self.preview() {
            style.width_px = Some(g.width_px());
            style.padding = Edges {
                top: mm_to_px(g.margins.top),
                right: mm_to_px(g.margins.right),
                bottom: mm_to_px(g.margins.bottom),
                left: mm_to_px(g.margins.left),
            };
        }

        let mut page = RenderNode::new(NodeKind::Page).named("page").with_style(style);
        if self.preview() {
            page.push(self.margin_guide());
        }
        page.push(self.header());
        page.push(self.info());
        if let Some(table) = self.table() {
            page.push(table);
        }
        page.push(self.summary());
        if let Some(signatures) = self.signatures() {
            page.push(signatures);
        }
        if let Some(thanks) = self.thank_you() {
            page.push(thanks);
        }
        page
    }

    fn margin_guide(&self) -> RenderNode {
        let g = &self.inputs.geometry;
        let dashed = Some(BorderLine {
            width_px: 1.0,
            style: LineStyle::Dashed,
            color: Color::rgb(0x93, 0xc5, 0xfd),
        });
        let mut guide = RenderNode::new(NodeKind::Guide)
            .named("margin-guide")
            .with_style(BoxStyle {
                border: Edges::all(dashed),
                margin: Edges {
                    top: mm_to_px(g.margins.top),
                    right: mm_to_px(g.margins.right),
                    bottom: mm_to_px(g.margins.bottom),
                    left: mm_to_px(g.margins.left),
                },
                ..BoxStyle::default()
            });
        if g.driver_margins {
            guide.text = Some(DRIVER_MARGIN_HINT.to_string());
        }
        guide
    }

    // ----- Header -----

    fn header(&self) -> RenderNode {
        let shop = &self.s().shop;
        let info = &shop.info;
        let info_style = text_style(shop.info_size, shop.info_color);

        let mut identity = RenderNode::new(NodeKind::Block).with_style(BoxStyle {
            grow: true,
            ..BoxStyle::default()
        });
        if shop.show_name && !info.name.is_empty() {
            identity.push(
                RenderNode::text(
                    &info.name,
                    BoxStyle {
                        bold: true,
                        uppercase: true,
                        margin: Edges {
                            bottom: 2.0,
                            ..Edges::default()
                        },
                        ..text_style(shop.name_size, Color::BLACK)
                    },
                )
                .named("shop-name"),
            );
        }
        if shop.show_address && !info.address.trim().is_empty() {
            identity.push(RenderNode::text(&info.address, info_style.clone()).named("shop-address"));
        }
        if shop.show_phone && !info.phone.is_empty() {
            identity.push(
                RenderNode::text(format!("Tel: {}", info.phone), info_style.clone())
                    .named("shop-phone"),
            );
        }
        if shop.show_bank_info && (!info.bank.is_empty() || !info.bank_account.is_empty()) {
            let line = match (info.bank.is_empty(), info.bank_account.is_empty()) {
                (false, false) => format!("{}: {}", info.bank, info.bank_account),
                (false, true) => format!("{}:", info.bank),
                _ => info.bank_account.clone(),
            };
            let mut bank = RenderNode::new(NodeKind::Block)
                .named("shop-bank")
                .with_style(BoxStyle {
                    margin: Edges {
                        top: 2.0,
                        ..Edges::default()
                    },
                    padding: Edges {
                        top: 2.0,
                        ..Edges::default()
                    },
                    border: Edges {
                        top: Some(BorderLine {
                            width_px: 1.0,
                            style: LineStyle::Dashed,
                            color: Color::rgb(0xcc, 0xcc, 0xcc),
                        }),
                        ..Edges::default()
                    },
                    ..info_style.clone()
                });
            bank.push(text(line));
            if !info.bank_user.is_empty() {
                bank.push(text(&info.bank_user));
            }
            identity.push(bank);
        }

        let mut left = RenderNode::new(NodeKind::Row).with_style(BoxStyle {
            gap: 10.0,
            grow: true,
            ..row(Justify::Start)
        });
        if shop.show_logo && !shop.logo_url.is_empty() {
            left.push(RenderNode {
                image: Some(ImageContent {
                    src: shop.logo_url.clone(),
                    max_height_px: LOGO_MAX_HEIGHT_PX,
                }),
                ..RenderNode::new(NodeKind::Image).named("logo")
            });
        }
        left.push(identity);

        RenderNode::new(NodeKind::Row)
            .named("header")
            .with_style(BoxStyle {
                gap: 12.0,
                margin: Edges {
                    bottom: self.s().typography.header_spacing,
                    ..Edges::default()
                },
                ..row(Justify::SpaceBetween)
            })
            .with_children(vec![left, self.title()])
    }

    fn title(&self) -> RenderNode {
        let style = &self.inputs.style;
        let mut title = RenderNode::text(
            self.doc().doc_type.title(),
            style.title.box_style(style.title_size),
        )
        .named("title");
        if self.preview() {
            title.region = Some(Region::Title);
        }
        title
    }

    // ----- Document info -----

    fn info(&self) -> RenderNode {
        let doc = self.doc();
        let info = &self.s().info;
        let base = text_style(info.size, info.color);

        let mut left = RenderNode::new(NodeKind::Block).with_style(BoxStyle {
            grow: true,
            ..BoxStyle::default()
        });
        if info.show_customer {
            let role = if doc.doc_type.is_customer_facing() {
                "Customer:"
            } else {
                "Supplier:"
            };
            let partner = doc.partner.as_ref();
            let name = partner
                .map(|p| p.name.as_str())
                .filter(|n| !n.is_empty())
                .unwrap_or(WALK_IN_CUSTOMER);
            left.push(labelled(role, name, BoxStyle::default()).named("partner"));
            if let Some(p) = partner {
                if !p.phone.is_empty() {
                    left.push(labelled("Phone:", &p.phone, BoxStyle::default()));
                }
                if !p.address.is_empty() {
                    left.push(labelled("Address:", &p.address, BoxStyle::default()));
                }
            }
        }
        if doc.doc_type.is_voucher() {
            left.push(labelled("Content:", &doc.note, BoxStyle::default()).named("voucher-note"));
        }

        let mut right = RenderNode::new(NodeKind::Block).with_style(BoxStyle {
            grow: true,
            text_align: TextAlign::Right,
            ..BoxStyle::default()
        });
        let right_row = BoxStyle {
            justify: Justify::End,
            ..BoxStyle::default()
        };
        if info.show_id {
            right.push(
                labelled("No.:", format!("#{}", doc.reference()), right_row.clone())
                    .named("reference"),
            );
        }
        if info.show_date {
            right.push(labelled("Date:", format_date(doc.date.as_ref()), right_row).named("date"));
        }

        RenderNode::new(NodeKind::Row)
            .named("info")
            .with_style(BoxStyle {
                gap: 20.0,
                margin: Edges {
                    bottom: 10.0,
                    ..Edges::default()
                },
                ..row(Justify::SpaceBetween)
            })
            .with_style_override(base)
            .with_children(vec![left, right])
    }

    // ----- Line-item table -----

    fn table(&self) -> Option<RenderNode> {
        let doc = self.doc();
        if !self.s().table.show || doc.doc_type.is_voucher() {
            return None;
        }
        let ts = &self.inputs.style.table;
        let plan = &self.inputs.columns;

        let mut header = RenderNode::new(NodeKind::Row)
            .named("table-header")
            .with_style(row(Justify::Start))
            .with_children(
                plan.visible()
                    .map(|c| {
                        RenderNode::new(NodeKind::Cell)
                            .with_style(ts.header_cell(c))
                            .with_children(vec![text(&c.label)])
                    })
                    .collect(),
            );
        if self.preview() {
            header.region = Some(Region::TableHeader);
        }

        let mut table = RenderNode::new(NodeKind::Table)
            .named("table")
            .with_style(BoxStyle {
                margin: Edges {
                    bottom: 10.0,
                    ..Edges::default()
                },
                ..ts.table_box()
            });
        table.push(header);

        for (index, item) in doc.details.iter().enumerate() {
            let cells = plan
                .visible()
                .map(|c| self.body_cell(ts, c, item, index))
                .collect();
            table.push(
                RenderNode::new(NodeKind::Row)
                    .with_style(BoxStyle {
                        background: ts.row_background(index),
                        ..row(Justify::Start)
                    })
                    .with_children(cells),
            );
        }

        if let Some(strip) = self.summary_strip() {
            table.push(strip);
        }
        Some(table)
    }

    fn body_cell(&self, ts: &TableStyle, column: &Column, item: &LineItem, index: usize) -> RenderNode {
        let doc_type = self.doc().doc_type;
        let mut style = ts.body_cell(column);
        let content = match column.id {
            ColumnId::Stt => text((index + 1).to_string()),
            ColumnId::Name => text(&item.product_name),
            ColumnId::Unit if item.unit.is_empty() => text("-"),
            ColumnId::Unit => text(&item.unit),
            ColumnId::SecondaryQty => text(secondary_breakdown(item)),
            ColumnId::Qty => text(format_number(item.quantity)),
            ColumnId::Price => text(format_number(item.price)),
            ColumnId::Total => {
                style.bold = true;
                let amount = match doc_type {
                    DocumentType::Report => item.total_amount.unwrap_or_else(|| item.line_total()),
                    _ => item.line_total(),
                };
                text(format_number(amount))
            }
            ColumnId::Code => {
                style.bold = true;
                text(item.code.clone().unwrap_or_else(|| "-".to_string()))
            }
            ColumnId::Date => text(format_day(item.date.as_ref())),
            ColumnId::Method => match item.payment_method {
                Some(method) => payment_chip(method),
                None => text("-"),
            },
        };
        RenderNode::new(NodeKind::Cell)
            .with_style(style)
            .with_children(vec![content])
    }

    /// Items / quantity / pack totals under the table body.
    fn summary_strip(&self) -> Option<RenderNode> {
        let s = &self.s().summary;
        if self.doc().doc_type == DocumentType::Report
            || !(s.show_total_items || s.show_total_qty || s.show_total_secondary_qty)
        {
            return None;
        }
        let agg = &self.inputs.aggregates;
        let mut parts = Vec::new();
        if s.show_total_items {
            parts.push(labelled("Items:", agg.total_items.to_string(), BoxStyle::default()));
        }
        if s.show_total_qty {
            parts.push(labelled("Qty:", format_number(agg.total_qty), BoxStyle::default()));
        }
        if s.show_total_secondary_qty && !agg.secondary.is_empty() {
            parts.push(labelled("Pack:", agg.secondary.to_string(), BoxStyle::default()));
        }

        let separator = || RenderNode::text("|", text_style(s.strip_font_size, Color::rgb(0xcc, 0xcc, 0xcc)));
        let mut children = Vec::with_capacity(parts.len() * 2);
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                children.push(separator());
            }
            children.push(part);
        }

        Some(
            RenderNode::new(NodeKind::Row)
                .named("table-summary")
                .with_style(BoxStyle {
                    gap: 15.0,
                    padding: Edges::symmetric(8.0, 10.0),
                    background: Some(Color::rgb(0xfa, 0xfa, 0xfa)),
                    font_size: Some(s.strip_font_size),
                    ..row(Justify::Start)
                })
                .with_children(children),
        )
    }

    // ----- Notes and totals -----

    fn summary(&self) -> RenderNode {
        let s = &self.s().summary;
        let doc = self.doc();

        let mut notes = RenderNode::new(NodeKind::Block).with_style(BoxStyle {
            grow: true,
            ..BoxStyle::default()
        });
        if s.show_notes && !doc.note.is_empty() && !doc.doc_type.is_voucher() {
            notes.push(
                labelled(
                    "Note:",
                    &doc.note,
                    BoxStyle {
                        italic: true,
                        padding: Edges {
                            left: 8.0,
                            ..Edges::default()
                        },
                        border: Edges {
                            left: Some(BorderLine::solid(3.0, Color::rgb(0xdd, 0xdd, 0xdd))),
                            ..Edges::default()
                        },
                        ..text_style(11.0, s.notes_color)
                    },
                )
                .named("notes"),
            );
        }

        let mut totals = RenderNode::new(NodeKind::Block)
            .named("totals")
            .with_style(BoxStyle {
                grow: true,
                ..BoxStyle::default()
            });
        if s.show_total_amount {
            if doc.doc_type.is_voucher() {
                totals.push(self.voucher_amount());
            } else {
                for line in self.total_lines() {
                    totals.push(line);
                }
            }
        }

        RenderNode::new(NodeKind::Row)
            .named("summary")
            .with_style(BoxStyle {
                gap: 20.0,
                margin: Edges {
                    top: s.section_margin_top,
                    ..Edges::default()
                },
                ..row(Justify::SpaceBetween)
            })
            .with_children(vec![notes, totals])
    }

    fn voucher_amount(&self) -> RenderNode {
        let label = match self.doc().doc_type {
            DocumentType::Receipt => "Amount received:",
            _ => "Amount paid:",
        };
        labelled(
            label,
            format_number(self.doc().amount),
            BoxStyle {
                bold: true,
                padding: Edges {
                    top: 8.0,
                    ..Edges::default()
                },
                border: Edges {
                    top: Some(BorderLine::solid(1.0, Color::BLACK)),
                    ..Edges::default()
                },
                ..text_style(18.0, Color::BLACK)
            },
        )
        .named("voucher-amount")
    }

    fn total_lines(&self) -> Vec<RenderNode> {
        let s = &self.s().summary;
        let doc = self.doc();
        let mut lines = Vec::new();

        let total_style = BoxStyle {
            bold: s.total_line_bold,
            italic: s.total_line_italic,
            margin: Edges {
                top: s.total_line_margin_top,
                bottom: s.total_line_margin_bottom,
                ..Edges::default()
            },
            ..text_style(s.total_line_size, s.total_value_color)
        };
        lines.push(
            amount_line("Total:", doc.total_amount, total_style, s.total_label_color).named("total"),
        );

        // Ledger lines need a partner account.
        let account = doc.doc_type.has_ledger() && doc.partner.is_some();
        let ledger = account && shows_ledger_lines(doc.old_debt);
        let line_style = text_style(s.section_size, s.total_value_color);
        if ledger && s.show_old_debt {
            lines.push(
                amount_line("Old debt:", doc.old_debt, line_style.clone(), s.total_label_color)
                    .named("old-debt"),
            );
        }
        if account && s.show_paid {
            lines.push(
                amount_line("Paid:", doc.amount_paid, line_style, s.total_label_color)
                    .named("paid"),
            );
        }
        if let (true, true, Some(balance)) = (ledger, s.show_balance, self.inputs.aggregates.balance) {
            let style = BoxStyle {
                bold: true,
                margin: Edges {
                    top: 5.0,
                    ..Edges::default()
                },
                padding: Edges {
                    top: 5.0,
                    ..Edges::default()
                },
                border: Edges {
                    top: Some(BorderLine::solid(1.0, Color::BLACK)),
                    ..Edges::default()
                },
                ..text_style(s.balance_size, s.total_value_color)
            };
            lines.push(amount_line("Balance:", balance, style, s.total_label_color).named("balance"));
        }
        lines
    }

    // ----- Footer -----

    fn signatures(&self) -> Option<RenderNode> {
        if !self.s().footer.show_signatures {
            return None;
        }
        let party = if self.doc().doc_type.is_customer_facing() {
            "Customer"
        } else {
            "Supplier"
        };
        let block = |title: &str| {
            RenderNode::new(NodeKind::Block)
                .with_style(BoxStyle {
                    grow: true,
                    text_align: TextAlign::Center,
                    ..BoxStyle::default()
                })
                .with_children(vec![
                    RenderNode::text(
                        title,
                        BoxStyle {
                            bold: true,
                            uppercase: true,
                            ..BoxStyle::default()
                        },
                    ),
                    RenderNode::text(
                        "(Sign, full name)",
                        BoxStyle {
                            italic: true,
                            font_size: Some(10.0),
                            ..BoxStyle::default()
                        },
                    ),
                ])
        };
        Some(
            RenderNode::new(NodeKind::Row)
                .named("signatures")
                .with_style(BoxStyle {
                    gap: 20.0,
                    margin: Edges {
                        top: 30.0,
                        ..Edges::default()
                    },
                    ..row(Justify::SpaceBetween)
                })
                .with_children(vec![block(party), block("Prepared by")]),
        )
    }

    fn thank_you(&self) -> Option<RenderNode> {
        let footer = &self.s().footer;
        if !footer.show_thank_you {
            return None;
        }
        let message = if footer.thank_you_message.trim().is_empty() {
            crate::settings::FooterSettings::default().thank_you_message
        } else {
            footer.thank_you_message.clone()
        };
        Some(
            RenderNode::text(
                message,
                BoxStyle {
                    text_align: TextAlign::Center,
                    bold: true,
                    italic: true,
                    margin: Edges {
                        top: 25.0,
                        ..Edges::default()
                    },
                    padding: Edges {
                        top: 15.0,
                        ..Edges::default()
                    },
                    border: Edges {
                        top: Some(BorderLine {
                            width_px: 1.0,
                            style: LineStyle::Dashed,
                            color: Color::rgb(0xee, 0xee, 0xee),
                        }),
                        ..Edges::default()
                    },
                    ..text_style(13.0, footer.color)
                },
            )
            .named("thank-you"),
        )
    }
}

fn amount_line(label: &str, amount: f64, style: BoxStyle, label_color: Color) -> RenderNode {
    let label_style = BoxStyle {
        color: Some(label_color),
        ..BoxStyle::default()
    };
    RenderNode::new(NodeKind::Row)
        .with_style(BoxStyle {
            direction: Direction::Row,
            justify: Justify::SpaceBetween,
            ..style
        })
        .with_children(vec![
            RenderNode::text(label, label_style),
            RenderNode::text(format_number(amount), BoxStyle::default()),
        ])
}

fn payment_chip(method: PaymentMethod) -> RenderNode {
    let (background, color) = match method {
        PaymentMethod::Cash => (Color::rgb(0xec, 0xfd, 0xf5), Color::rgb(0x05, 0x96, 0x69)),
        PaymentMethod::Debt => (Color::rgb(0xff, 0xf1, 0xf2), Color::rgb(0xe1, 0x1d, 0x48)),
    };
    RenderNode::text(
        method.label(),
        BoxStyle {
            bold: true,
            uppercase: true,
            background: Some(background),
            color: Some(color),
            padding: Edges::symmetric(2.0, 6.0),
            radius: Corners::all(4.0),
            ..BoxStyle::default()
        },
    )
    .named("payment-method")
}

impl RenderNode {
    /// Apply text colour and size of `base` where this node has none.
    fn with_style_override(mut self, base: BoxStyle) -> Self {
        self.style.font_size = self.style.font_size.or(base.font_size);
        self.style.color = self.style.color.or(base.color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Partner;

    fn sale() -> TransactionDocument {
        let mut doc = TransactionDocument::new(DocumentType::Sale);
        doc.id = Some(12);
        doc.partner = Some(Partner {
            id: Some(3),
            name: "Acme Co".into(),
            phone: "0900 000 000".into(),
            address: String::new(),
        });
        doc.details = vec![
            LineItem {
                product_name: "Rice".into(),
                unit: "kg".into(),
                quantity: 30.0,
                price: 1000.0,
                multiplier: 24.0,
                secondary_unit: Some("Case".into()),
                ..LineItem::default()
            },
            LineItem {
                product_name: "Salt".into(),
                quantity: 2.0,
                price: 500.0,
                ..LineItem::default()
            },
        ];
        doc.total_amount = 31000.0;
        doc.amount_paid = 1000.0;
        doc
    }

    fn render(doc: &TransactionDocument, s: &PrintSettings, mode: RenderMode) -> Option<RenderTree> {
        compose(&RenderInputs::resolve(doc, s, mode))
    }

    #[test]
    fn empty_line_items_render_nothing() {
        let s = PrintSettings::default();
        let doc = TransactionDocument::new(DocumentType::Sale);
        assert!(render(&doc, &s, RenderMode::Preview).is_none());
        assert!(!should_render(None));
    }

    #[test]
    fn vouchers_render_without_items() {
        let s = PrintSettings::default();
        let mut doc = TransactionDocument::new(DocumentType::Receipt);
        doc.amount = 250000.0;
        doc.note = "Collect debt".into();
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("table").is_none());
        assert!(tree.contains_text("CASH RECEIPT"));
        assert!(tree.contains_text("Amount received:"));
        assert!(tree.contains_text("250,000"));
        assert!(tree.contains_text("Collect debt"));
    }

    #[test]
    fn ledger_lines_hidden_without_debt() {
        let s = PrintSettings::default();
        let doc = sale();
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("total").is_some());
        assert!(tree.find("paid").is_some());
        assert!(tree.find("old-debt").is_none());
        assert!(tree.find("balance").is_none());
    }

    #[test]
    fn ledger_lines_shown_with_debt() {
        let s = PrintSettings::default();
        let mut doc = sale();
        doc.old_debt = 5000.0;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("old-debt").is_some());
        let balance = tree.find("balance").unwrap();
        // (31000 + 5000) - 1000
        assert!(balance.contains_text("35,000"));
    }

    #[test]
    fn history_has_no_ledger_lines() {
        let s = PrintSettings::default();
        let mut doc = sale();
        doc.doc_type = DocumentType::History;
        doc.total_amount = 10.0;
        doc.amount_paid = 4.0;
        doc.old_debt = 100.0;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.contains_text("TRANSACTION DETAIL"));
        assert!(tree.find("total").is_some());
        assert!(tree.find("old-debt").is_none());
        assert!(tree.find("paid").is_none());
        assert!(tree.find("balance").is_none());
    }

    #[test]
    fn walk_in_sale_has_no_ledger_lines() {
        let s = PrintSettings::default();
        let mut doc = sale();
        doc.partner = None;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("paid").is_none());
        assert!(tree.find("old-debt").is_none());

        doc.old_debt = 5000.0;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("old-debt").is_none());
        assert!(tree.find("balance").is_none());
    }

    #[test]
    fn preview_tags_regions_print_does_not() {
        let s = PrintSettings::default();
        let doc = sale();
        let preview = render(&doc, &s, RenderMode::Preview).unwrap();
        assert_eq!(preview.regions(), vec![Region::Title, Region::TableHeader]);
        let print = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(print.regions().is_empty());
        assert!(print.find("margin-guide").is_none());
    }

    #[test]
    fn partner_fallback_and_reference() {
        let s = PrintSettings::default();
        let mut doc = sale();
        doc.partner = None;
        doc.id = None;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.contains_text(WALK_IN_CUSTOMER));
        assert!(tree.contains_text("#Draft"));
        assert!(tree.find("date").unwrap().contains_text("-"));
    }

    #[test]
    fn purchase_uses_supplier_label() {
        let s = PrintSettings::default();
        let mut doc = sale();
        doc.doc_type = DocumentType::Purchase;
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.contains_text("Supplier:"));
        assert!(tree.contains_text("PURCHASE RECEIPT"));
    }

    #[test]
    fn summary_strip_shows_pack_totals() {
        let mut s = PrintSettings::default();
        s.summary.show_total_secondary_qty = true;
        let tree = render(&sale(), &s, RenderMode::Print).unwrap();
        let strip = tree.find("table-summary").unwrap();
        assert!(strip.contains_text("1 Case"));
        assert!(strip.contains_text("32"));
    }

    #[test]
    fn report_rows_use_row_totals() {
        let s = PrintSettings::default();
        let mut doc = TransactionDocument::new(DocumentType::Report);
        doc.details = vec![LineItem {
            code: Some("HD0001".into()),
            payment_method: Some(PaymentMethod::Cash),
            total_amount: Some(120000.0),
            ..LineItem::default()
        }];
        let tree = render(&doc, &s, RenderMode::Print).unwrap();
        assert!(tree.find("table-summary").is_none());
        assert!(tree.contains_text("HD0001"));
        assert!(tree.contains_text("120,000"));
        assert!(tree.find("payment-method").unwrap().contains_text("Cash"));
    }

    #[test]
    fn zero_columns_still_render_header_row() {
        let mut s = PrintSettings::default();
        for key in [
            "invoice_show_col_stt",
            "invoice_show_col_name",
            "invoice_show_col_unit",
            "invoice_show_col_qty",
            "invoice_show_col_price",
            "invoice_show_col_total",
        ] {
            s.set(key, "false").unwrap();
        }
        let tree = render(&sale(), &s, RenderMode::Preview).unwrap();
        let header = tree.find("table-header").unwrap();
        assert!(header.children.is_empty());
    }

    #[test]
    fn driver_margins_show_hint_in_preview() {
        let mut s = PrintSettings::default();
        s.page.use_default_margins = true;
        let tree = render(&sale(), &s, RenderMode::Preview).unwrap();
        let guide = tree.find("margin-guide").unwrap();
        assert_eq!(guide.text.as_deref(), Some(DRIVER_MARGIN_HINT));
        assert_eq!(tree.root.style.padding, Edges::default());
    }

    #[test]
    fn custom_font_leads_the_stack() {
        let mut s = PrintSettings::default();
        s.typography.custom_font_name = "Lobster.ttf".into();
        assert_eq!(font_stack(&s), "\"Lobster\", Inter, sans-serif");
    }
}
