//! Style resolver – turns [`PrintSettings`] into mutually exclusive style
//! modes and per-cell box styles consumed by the document renderer.
//!
//! Each visual aspect (title, table header) resolves to a single tagged
//! mode, so contradictory flag combinations cannot reach the renderer.

use serde::{Deserialize, Serialize};

use crate::columns::Column;
use crate::geometry::PaperSize;
use crate::render_tree::{BoxStyle, Corners, Edges, TextAlign};
use crate::settings::PrintSettings;

/// Corner radius used for pill shapes (title badge, header badge ends).
pub const PILL_RADIUS: f32 = 50.0;

/// Border width used by badge outlines, px.
pub const BADGE_BORDER_WIDTH: f32 = 0.5;

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid colour {value:?}"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

// ---------------------------------------------------------------------------
// Border lines
// ---------------------------------------------------------------------------

/// Table rule thickness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderWeight {
    #[default]
    Thin,
    Medium,
    Thick,
}

impl BorderWeight {
    pub fn px(self) -> f32 {
        match self {
            BorderWeight::Thin => 1.0,
            BorderWeight::Medium => 2.0,
            BorderWeight::Thick => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// One drawn edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderLine {
    pub width_px: f32,
    pub style: LineStyle,
    pub color: Color,
}

impl BorderLine {
    pub fn solid(width_px: f32, color: Color) -> Self {
        Self {
            width_px,
            style: LineStyle::Solid,
            color,
        }
    }

    /// CSS shorthand, e.g. `1px solid #000000`.
    pub fn to_css(&self) -> String {
        let style = match self.style {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        };
        format!("{}px {} {}", self.width_px, style, self.color.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Style modes
// ---------------------------------------------------------------------------

/// Pill colours shared by the title and header badge modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BadgeColors {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

impl BadgeColors {
    fn outline(&self) -> BorderLine {
        BorderLine::solid(BADGE_BORDER_WIDTH, self.border)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TitleMode {
    /// Centered pill.
    Badge(BadgeColors),
    /// Right-aligned text.
    Plain { color: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeaderMode {
    /// Pill-shaped header row; only the outer columns are rounded.
    Badge(BadgeColors),
    /// Independent header rule above and below the header row.
    Bordered { line: BorderLine },
    /// Header shares the table-wide rule.
    Plain,
}

impl HeaderMode {
    pub fn is_badge(&self) -> bool {
        matches!(self, HeaderMode::Badge(_))
    }
}

/// Resolved table styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub header: HeaderMode,
    /// Header fill outside badge mode.
    pub header_background: Option<Color>,
    pub header_color: Color,
    pub header_font_size: f32,
    pub body_color: Color,
    pub body_font_size: f32,
    /// Table-wide rule (thickness + style, always black).
    pub line: BorderLine,
    pub outer_border: bool,
    pub row_rules: bool,
    pub column_rules: bool,
    pub zebra: Option<Color>,
    pub row_padding: f32,
    pub paper: PaperSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub title: TitleMode,
    pub title_size: f32,
    pub table: TableStyle,
}

/// Derive style modes from settings.
pub fn resolve_style(settings: &PrintSettings) -> ResolvedStyle {
    let t = &settings.title;
    let title = if t.badge {
        TitleMode::Badge(BadgeColors {
            background: t.badge_background,
            border: t.badge_border,
            text: t.badge_text,
        })
    } else {
        TitleMode::Plain { color: t.color }
    };

    let tb = &settings.table;
    let header = if tb.header_badge {
        HeaderMode::Badge(BadgeColors {
            background: tb.header_badge_background,
            border: tb.header_badge_border,
            text: tb.header_badge_text,
        })
    } else if tb.header_border {
        HeaderMode::Bordered {
            line: BorderLine::solid(tb.header_border_width, tb.header_border_color),
        }
    } else {
        HeaderMode::Plain
    };

    ResolvedStyle {
        title,
        title_size: t.size,
        table: TableStyle {
            header,
            header_background: tb.header_bg_enabled.then_some(tb.header_bg),
            header_color: tb.header_color,
            header_font_size: tb.header_size,
            body_color: tb.body_color,
            body_font_size: settings.table_body_font_size(),
            line: BorderLine {
                width_px: tb.border_weight.px(),
                style: tb.border_style,
                color: Color::BLACK,
            },
            outer_border: tb.border,
            row_rules: tb.border_rows,
            column_rules: tb.border_cols,
            zebra: tb.zebra.then_some(tb.zebra_color),
            row_padding: tb.row_padding,
            paper: settings.page.paper_size,
        },
    }
}

impl TitleMode {
    /// Box for the title text.
    pub fn box_style(&self, size: f32) -> BoxStyle {
        let mut s = BoxStyle {
            font_size: Some(size),
            bold: true,
            uppercase: true,
            ..BoxStyle::default()
        };
        match self {
            TitleMode::Badge(colors) => {
                s.text_align = TextAlign::Center;
                s.background = Some(colors.background);
                s.color = Some(colors.text);
                s.border = Edges::all(Some(colors.outline()));
                s.radius = Corners::all(PILL_RADIUS);
                s.padding = Edges::symmetric(5.0, 16.0);
            }
            TitleMode::Plain { color } => {
                s.text_align = TextAlign::Right;
                s.color = Some(*color);
            }
        }
        s
    }
}

impl TableStyle {
    /// Outer box of the table.
    pub fn table_box(&self) -> BoxStyle {
        let mut s = BoxStyle::default();
        if self.outer_border && !self.header.is_badge() {
            s.border = Edges::all(Some(self.line));
        }
        s
    }

    fn rule(&self, on: bool) -> Option<BorderLine> {
        on.then_some(self.line)
    }

    /// Header cell box for `column`.
    pub fn header_cell(&self, column: &Column) -> BoxStyle {
        let p = self.row_padding;
        let mut s = BoxStyle {
            width_px: Some(column.width_px),
            font_size: Some(self.header_font_size),
            bold: true,
            ..BoxStyle::default()
        };

        match &self.header {
            HeaderMode::Badge(colors) => {
                let outline = Some(colors.outline());
                let side = if self.paper.is_compact() { 12.0 } else { 20.0 };
                s.background = Some(colors.background);
                s.color = Some(colors.text);
                s.text_align = TextAlign::Center;
                s.padding = Edges::symmetric(((p + 4.0) * 0.8).floor().max(2.0), p);
                s.border.top = outline;
                s.border.bottom = outline;
                if column.first {
                    s.border.left = outline;
                    s.radius.top_left = PILL_RADIUS;
                    s.radius.bottom_left = PILL_RADIUS;
                    s.padding.left = side;
                }
                if column.last {
                    s.border.right = outline;
                    s.radius.top_right = PILL_RADIUS;
                    s.radius.bottom_right = PILL_RADIUS;
                    s.padding.right = side;
                }
            }
            HeaderMode::Bordered { line } => {
                self.plain_header_frame(&mut s, column);
                s.border.top = Some(*line);
                s.border.bottom = Some(*line);
            }
            HeaderMode::Plain => {
                self.plain_header_frame(&mut s, column);
                s.border.bottom = Some(self.line);
            }
        }
        s
    }

    fn plain_header_frame(&self, s: &mut BoxStyle, column: &Column) {
        let p = self.row_padding;
        s.background = self.header_background;
        s.color = Some(self.header_color);
        s.text_align = column.align;
        s.padding = Edges::symmetric((p * 0.8).floor().max(1.0), p);
        s.border.right = self.rule(self.column_rules);
        if column.first {
            s.border.left = self.rule(self.outer_border);
        }
    }

    /// Body cell box for `column`.
    pub fn body_cell(&self, column: &Column) -> BoxStyle {
        let badge_frame = self.header.is_badge() && self.outer_border;
        let mut s = BoxStyle {
            width_px: Some(column.width_px),
            font_size: Some(self.body_font_size),
            color: Some(self.body_color),
            text_align: column.align,
            padding: Edges::symmetric(self.row_padding, 6.0),
            ..BoxStyle::default()
        };
        s.border.bottom = self.rule(self.row_rules);
        s.border.right = self.rule(self.column_rules || (badge_frame && column.last));
        if column.first {
            s.border.left = self.rule(badge_frame);
        }
        s
    }

    /// Background of body row `index` (zero-based).
    pub fn row_background(&self, index: usize) -> Option<Color> {
        if index % 2 == 1 {
            self.zebra
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnId;

    fn column(first: bool, last: bool) -> Column {
        Column {
            id: ColumnId::Qty,
            label: "Qty".into(),
            width_px: 60.0,
            align: TextAlign::Center,
            visible: true,
            first,
            last,
        }
    }

    #[test]
    fn color_hex_round_trip() {
        let c = Color::from_hex("#2d5016").unwrap();
        assert_eq!(c, Color::rgb(0x2d, 0x50, 0x16));
        assert_eq!(c.to_hex(), "#2d5016");
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert!(Color::from_hex("#00000000").unwrap().is_transparent());
    }

    #[test]
    fn title_mode_is_exclusive() {
        let mut s = PrintSettings::default();
        assert!(matches!(resolve_style(&s).title, TitleMode::Plain { .. }));
        s.title.badge = true;
        let mode = resolve_style(&s).title;
        assert!(matches!(mode, TitleMode::Badge(_)));
        assert_eq!(mode.box_style(22.0).text_align, TextAlign::Center);
    }

    #[test]
    fn header_badge_wins_over_header_border() {
        let mut s = PrintSettings::default();
        s.table.header_border = true;
        assert!(matches!(
            resolve_style(&s).table.header,
            HeaderMode::Bordered { .. }
        ));
        s.table.header_badge = true;
        assert!(resolve_style(&s).table.header.is_badge());
    }

    #[test]
    fn badge_rounds_only_outer_columns() {
        let mut s = PrintSettings::default();
        s.table.header_badge = true;
        let table = resolve_style(&s).table;
        let first = table.header_cell(&column(true, false));
        let middle = table.header_cell(&column(false, false));
        let last = table.header_cell(&column(false, true));
        assert_eq!(first.radius.top_left, PILL_RADIUS);
        assert_eq!(first.radius.top_right, 0.0);
        assert_eq!(middle.radius, Corners::default());
        assert_eq!(last.radius.bottom_right, PILL_RADIUS);
        assert!(middle.border.right.is_none());
        assert_eq!(first.padding.left, 20.0);
    }

    #[test]
    fn thickness_maps_to_pixels() {
        let mut s = PrintSettings::default();
        s.set("invoice_table_border_thickness", "thick").unwrap();
        s.set("invoice_table_border_style", "dashed").unwrap();
        let line = resolve_style(&s).table.line;
        assert_eq!(line.to_css(), "3px dashed #000000");
    }

    #[test]
    fn zebra_only_on_odd_rows() {
        let table = resolve_style(&PrintSettings::default()).table;
        assert_eq!(table.row_background(0), None);
        assert_eq!(table.row_background(1), Some(Color::rgb(0xf9, 0xfa, 0xfb)));
        assert_eq!(table.row_background(2), None);
    }

    #[test]
    fn outer_border_dropped_under_badge_header() {
        let mut s = PrintSettings::default();
        assert!(resolve_style(&s).table.table_box().border.top.is_some());
        s.table.header_badge = true;
        let table = resolve_style(&s).table;
        assert!(table.table_box().border.top.is_none());
        let body = table.body_cell(&column(true, false));
        assert!(body.border.left.is_some());
    }
}
