//! Measurement pass – lays a [`RenderTree`] out with Taffy to size the
//! document. Print renders on thermal rolls use the resulting height as the
//! estimated roll length; hosts can use the boxes for hit-testing.

use std::collections::HashMap;
use taffy::prelude::*;

use crate::error::{Error, Result};
use crate::fonts::{wrap_text, FontRegistry};
use crate::render_tree::{BoxStyle, Direction, NodeKind, RenderMode, RenderNode, RenderTree};

/// A positioned box in page coordinates (px).
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub name: Option<String>,
    pub children: Vec<LaidOutBox>,
}

impl LaidOutBox {
    pub fn find(&self, name: &str) -> Option<&LaidOutBox> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

fn layout_err(e: taffy::TaffyError) -> Error {
    Error::Layout(e.to_string())
}

struct LayoutBuilder<'a> {
    taffy: TaffyTree<()>,
    fonts: &'a FontRegistry,
    font: Option<&'a str>,
    line_height: f32,
    names: HashMap<NodeId, String>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(fonts: &'a FontRegistry, font: Option<&'a str>, line_height: f32) -> Self {
        Self {
            taffy: TaffyTree::new(),
            fonts,
            font,
            line_height,
            names: HashMap::new(),
        }
    }

    fn build(&mut self, node: &RenderNode, avail: f32, inherited_size: f32) -> Result<NodeId> {
        let font_size = node.style.font_size.unwrap_or(inherited_size);
        let mut ts = box_to_taffy(&node.style);
        let outer = node.style.width_px.unwrap_or(avail);
        let inner = (outer - horizontal_insets(&node.style)).max(0.0);

        let id = match node.kind {
            NodeKind::Guide => {
                ts.display = taffy::Display::None;
                self.taffy.new_leaf(ts).map_err(layout_err)?
            }
            NodeKind::Text => {
                let text = node.text.as_deref().unwrap_or("");
                let lines = wrap_text(text, font_size, node.style.bold, self.font, inner, self.fonts);
                let text_width = lines
                    .iter()
                    .map(|l| {
                        self.fonts
                            .measure_text_width(l, font_size, node.style.bold, self.font)
                    })
                    .fold(0.0f32, f32::max);
                let line_px = self.fonts.line_height_px(font_size, self.line_height);
                if node.style.width_px.is_none() {
                    ts.size.width = taffy::Dimension::Length(text_width.min(inner));
                }
                ts.size.height = taffy::Dimension::Length(lines.len() as f32 * line_px);
                ts.min_size.width = taffy::Dimension::Length(0.0);
                self.taffy.new_leaf(ts).map_err(layout_err)?
            }
            NodeKind::Image => {
                let h = node.image.as_ref().map(|i| i.max_height_px).unwrap_or(0.0);
                ts.size = Size {
                    width: taffy::Dimension::Length(h),
                    height: taffy::Dimension::Length(h),
                };
                self.taffy.new_leaf(ts).map_err(layout_err)?
            }
            _ => {
                let widths = child_widths(node, inner);
                let mut child_ids = Vec::with_capacity(node.children.len());
                for (child, w) in node.children.iter().zip(widths) {
                    child_ids.push(self.build(child, w, font_size)?);
                }
                self.taffy
                    .new_with_children(ts, &child_ids)
                    .map_err(layout_err)?
            }
        };

        if let Some(name) = &node.name {
            self.names.insert(id, name.clone());
        }
        Ok(id)
    }

    /// Extract positioned boxes after layout computation.
    fn extract(&self, node: NodeId, offset_x: f32, offset_y: f32) -> Result<LaidOutBox> {
        let layout = self.taffy.layout(node).map_err(layout_err)?;
        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        let children = self
            .taffy
            .children(node)
            .map_err(layout_err)?
            .iter()
            .map(|&child| self.extract(child, x, y))
            .collect::<Result<Vec<_>>>()?;

        Ok(LaidOutBox {
            x,
            y,
            width: layout.size.width,
            height: layout.size.height,
            name: self.names.get(&node).cloned(),
            children,
        })
    }
}

fn horizontal_insets(s: &BoxStyle) -> f32 {
    let border = |b: &Option<crate::style::BorderLine>| b.map(|l| l.width_px).unwrap_or(0.0);
    s.padding.left + s.padding.right + border(&s.border.left) + border(&s.border.right)
}

/// Width offered to each child: rows split what fixed-width children leave
/// among the growing ones; columns pass the full inner width.
fn child_widths(node: &RenderNode, inner: f32) -> Vec<f32> {
    let children = &node.children;
    if node.style.direction == Direction::Column {
        return vec![inner; children.len()];
    }
    let in_flow: Vec<&RenderNode> = children.iter().filter(|c| c.kind != NodeKind::Guide).collect();
    let fixed: f32 = in_flow.iter().filter_map(|c| c.style.width_px).sum();
    let flexible = in_flow.iter().filter(|c| c.style.width_px.is_none()).count();
    let gaps = node.style.gap * in_flow.len().saturating_sub(1) as f32;
    let share = if flexible == 0 {
        0.0
    } else {
        ((inner - fixed - gaps) / flexible as f32).max(1.0)
    };
    children
        .iter()
        .map(|c| c.style.width_px.unwrap_or(share))
        .collect()
}

fn box_to_taffy(s: &BoxStyle) -> Style {
    let border = |b: &Option<crate::style::BorderLine>| {
        LengthPercentage::Length(b.map(|l| l.width_px).unwrap_or(0.0))
    };
    Style {
        display: taffy::Display::Flex,
        flex_direction: match s.direction {
            Direction::Column => taffy::FlexDirection::Column,
            Direction::Row => taffy::FlexDirection::Row,
        },
        align_items: Some(taffy::AlignItems::Stretch),
        size: Size {
            width: s
                .width_px
                .map(taffy::Dimension::Length)
                .unwrap_or(taffy::Dimension::Auto),
            height: taffy::Dimension::Auto,
        },
        flex_grow: if s.grow { 1.0 } else { 0.0 },
        flex_shrink: 1.0,
        padding: Rect {
            top: LengthPercentage::Length(s.padding.top),
            right: LengthPercentage::Length(s.padding.right),
            bottom: LengthPercentage::Length(s.padding.bottom),
            left: LengthPercentage::Length(s.padding.left),
        },
        margin: Rect {
            top: LengthPercentageAuto::Length(s.margin.top),
            right: LengthPercentageAuto::Length(s.margin.right),
            bottom: LengthPercentageAuto::Length(s.margin.bottom),
            left: LengthPercentageAuto::Length(s.margin.left),
        },
        border: Rect {
            top: border(&s.border.top),
            right: border(&s.border.right),
            bottom: border(&s.border.bottom),
            left: border(&s.border.left),
        },
        gap: Size {
            width: LengthPercentage::Length(s.gap),
            height: LengthPercentage::Length(s.gap),
        },
        ..Default::default()
    }
}

/// Lay out `tree` and return the root box.
///
/// Preview trees carry the page margins as root padding and are laid out at
/// the full paper width; print trees are laid out at the printable width.
/// `font` is the registered font filename used for measurement, if any.
pub fn measure(tree: &RenderTree, fonts: &FontRegistry, font: Option<&str>) -> Result<LaidOutBox> {
    let width = match tree.mode {
        RenderMode::Preview => tree.geometry.width_px(),
        RenderMode::Print => tree.geometry.content_width_px(),
    };
    let mut builder = LayoutBuilder::new(fonts, font, tree.line_height);
    let root = builder.build(&tree.root, width, tree.base_font_size)?;

    builder
        .taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::MaxContent,
            },
        )
        .map_err(layout_err)?;

    builder.extract(root, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentType;
    use crate::geometry::resolve_geometry;
    use crate::settings::PageSettings;

    fn tree(root: RenderNode) -> RenderTree {
        RenderTree {
            mode: RenderMode::Print,
            doc_type: DocumentType::Sale,
            geometry: resolve_geometry(&PageSettings::default()),
            font_family: "Inter, sans-serif".into(),
            base_font_size: 12.0,
            line_height: 1.5,
            page_directive: None,
            font_faces: Vec::new(),
            roll_length_mm: None,
            root,
        }
    }

    #[test]
    fn stacks_text_vertically() {
        let mut root = RenderNode::new(NodeKind::Page);
        root.push(RenderNode::text("First", BoxStyle::default()).named("a"));
        root.push(RenderNode::text("Second", BoxStyle::default()).named("b"));
        let fonts = FontRegistry::new();
        let laid = measure(&tree(root), &fonts, None).unwrap();
        let a = laid.find("a").unwrap();
        let b = laid.find("b").unwrap();
        assert!((a.height - 18.0).abs() < 0.01, "12px × 1.5 line");
        assert!(b.y >= a.y + a.height - 0.01);
        assert!((laid.height - 36.0).abs() < 0.01);
    }

    #[test]
    fn row_splits_remaining_width() {
        let row = RenderNode::new(NodeKind::Row)
            .with_style(BoxStyle {
                direction: Direction::Row,
                ..BoxStyle::default()
            })
            .with_children(vec![
                RenderNode::new(NodeKind::Cell).with_style(BoxStyle {
                    width_px: Some(100.0),
                    ..BoxStyle::default()
                }),
                RenderNode::new(NodeKind::Cell).with_style(BoxStyle {
                    grow: true,
                    ..BoxStyle::default()
                }),
            ]);
        assert_eq!(child_widths(&row, 500.0), vec![100.0, 400.0]);
    }

    #[test]
    fn guides_take_no_space() {
        let mut root = RenderNode::new(NodeKind::Page);
        root.push(RenderNode::new(NodeKind::Guide));
        let fonts = FontRegistry::new();
        let laid = measure(&tree(root), &fonts, None).unwrap();
        assert_eq!(laid.height, 0.0);
    }
}
