//! Render tree – the platform-neutral presentation tree produced by the
//! document renderer. It records what to draw and, in preview mode, which
//! regions map back to a setting. Hosts walk it to emit markup or paint.

use serde::{Deserialize, Serialize};

use crate::document::DocumentType;
use crate::error::Result;
use crate::fonts::FontFaceBinding;
use crate::geometry::{Geometry, PageDirective};
use crate::interaction::Region;
use crate::style::{BorderLine, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Interactive designer canvas.
    Preview,
    /// Fixed output sent to the print driver.
    Print,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Column,
    Row,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Per-side values, CSS order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Clone> Edges<T> {
    pub fn all(v: T) -> Self {
        Self {
            top: v.clone(),
            right: v.clone(),
            bottom: v.clone(),
            left: v,
        }
    }
}

impl Edges<f32> {
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl Corners {
    pub fn all(r: f32) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }
}

/// Box model and typography of one node. Lengths are px.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub direction: Direction,
    pub justify: Justify,
    pub text_align: TextAlign,
    /// Fixed width; `None` stretches.
    pub width_px: Option<f32>,
    /// Take remaining space in a row.
    pub grow: bool,
    pub gap: f32,
    pub padding: Edges<f32>,
    pub margin: Edges<f32>,
    pub border: Edges<Option<BorderLine>>,
    pub radius: Corners,
    pub background: Option<Color>,
    /// Text colour; inherits when `None`.
    pub color: Option<Color>,
    /// Font size; inherits when `None`.
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Page,
    Block,
    Row,
    Table,
    Cell,
    Text,
    Image,
    /// Dashed margin guide (preview only).
    Guide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub max_height_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub kind: NodeKind,
    /// Stable name of the block (`"title"`, `"balance"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub style: BoxStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
    /// Preview click target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            style: BoxStyle::default(),
            text: None,
            image: None,
            region: None,
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>, style: BoxStyle) -> Self {
        Self {
            text: Some(text.into()),
            style,
            ..Self::new(NodeKind::Text)
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: RenderNode) {
        self.children.push(child);
    }

    /// Depth-first pre-order walk.
    pub fn walk<'a, F: FnMut(&'a RenderNode)>(&'a self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// First node with `name`, depth-first.
    pub fn find(&self, name: &str) -> Option<&RenderNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// All text in document order.
    pub fn texts<'a>(&'a self) -> Vec<&'a str> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let Some(t) = n.text.as_deref() {
                out.push(t);
            }
        });
        out
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

/// A composed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    pub mode: RenderMode,
    pub doc_type: DocumentType,
    pub geometry: Geometry,
    pub font_family: String,
    pub base_font_size: f32,
    pub line_height: f32,
    /// Print only.
    #[serde(default)]
    pub page_directive: Option<PageDirective>,
    /// Print only: `@font-face` bindings for uploaded fonts.
    #[serde(default)]
    pub font_faces: Vec<FontFaceBinding>,
    /// Print only, thermal rolls: estimated paper length.
    #[serde(default)]
    pub roll_length_mm: Option<f32>,
    pub root: RenderNode,
}

impl RenderTree {
    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Interactive regions in document order.
    pub fn regions(&self) -> Vec<Region> {
        let mut out = Vec::new();
        self.root.walk(&mut |n| {
            if let Some(r) = n.region {
                out.push(r);
            }
        });
        out
    }

    pub fn find(&self, name: &str) -> Option<&RenderNode> {
        self.root.find(name)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.root.contains_text(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_and_texts() {
        let mut root = RenderNode::new(NodeKind::Page);
        let mut block = RenderNode::new(NodeKind::Block).named("totals");
        block.push(RenderNode::text("Total:", BoxStyle::default()));
        block.push(RenderNode::text("1,000", BoxStyle::default()));
        root.push(block);

        assert!(root.find("totals").is_some());
        assert!(root.find("notes").is_none());
        assert_eq!(root.texts(), vec!["Total:", "1,000"]);
        assert!(root.contains_text("1,0"));
    }

    #[test]
    fn edges_helpers() {
        let e = Edges::symmetric(2.0, 8.0);
        assert_eq!((e.top, e.right, e.bottom, e.left), (2.0, 8.0, 2.0, 8.0));
        assert_eq!(Edges::all(Some(1)).left, Some(1));
    }
}
