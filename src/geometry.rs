//! Layout resolver – physical page geometry from page settings.
//!
//! All values here are millimetres. Thermal roll sizes have no fixed height.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::PageSettings;

/// CSS pixels per millimetre (96 dpi).
pub const PX_PER_MM: f32 = 96.0 / 25.4;

pub fn mm_to_px(mm: f32) -> f32 {
    mm * PX_PER_MM
}

pub fn px_to_mm(px: f32) -> f32 {
    px / PX_PER_MM
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    A6,
    /// 80mm thermal roll.
    K80,
    /// 58mm thermal roll.
    K58,
}

impl PaperSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::A6 => "A6",
            PaperSize::K80 => "K80",
            PaperSize::K58 => "K58",
        }
    }

    pub fn is_thermal(self) -> bool {
        matches!(self, PaperSize::K80 | PaperSize::K58)
    }

    /// Narrow formats that get tighter badge padding.
    pub fn is_compact(self) -> bool {
        matches!(self, PaperSize::A6 | PaperSize::K80 | PaperSize::K58)
    }

    /// Portrait base dimensions `(width, height)`; thermal height is `None`.
    pub fn dimensions_mm(self) -> (f32, Option<f32>) {
        match self {
            PaperSize::A4 => (210.0, Some(297.0)),
            PaperSize::A5 => (148.0, Some(210.0)),
            PaperSize::A6 => (105.0, Some(148.0)),
            PaperSize::K80 => (80.0, None),
            PaperSize::K58 => (58.0, None),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };
}

/// Resolved page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub width_mm: f32,
    /// `None` for thermal rolls.
    pub height_mm: Option<f32>,
    pub margins: Margins,
    /// Margins are left to the print driver.
    pub driver_margins: bool,
}

impl Geometry {
    pub fn width_px(&self) -> f32 {
        mm_to_px(self.width_mm)
    }

    pub fn height_px(&self) -> Option<f32> {
        self.height_mm.map(mm_to_px)
    }

    /// Printable width after margins, px.
    pub fn content_width_px(&self) -> f32 {
        mm_to_px((self.width_mm - self.margins.left - self.margins.right).max(0.0))
    }

    /// Fixed page directive for print output.
    pub fn page_directive(&self) -> PageDirective {
        PageDirective {
            paper: self.paper,
            orientation: self.orientation,
            margins: (!self.driver_margins).then_some(self.margins),
        }
    }
}

/// Resolve paper geometry. Pure: equal settings give equal geometry.
pub fn resolve_geometry(page: &PageSettings) -> Geometry {
    let (w, h) = page.paper_size.dimensions_mm();
    let (width_mm, height_mm) = match (page.orientation, h) {
        (Orientation::Landscape, Some(h)) => (h, Some(w)),
        _ => (w, h),
    };
    let margins = if page.use_default_margins {
        Margins::ZERO
    } else {
        Margins {
            top: page.margin_top,
            right: page.margin_right,
            bottom: page.margin_bottom,
            left: page.margin_left,
        }
    };
    Geometry {
        paper: page.paper_size,
        orientation: page.orientation,
        width_mm,
        height_mm,
        margins,
        driver_margins: page.use_default_margins,
    }
}

/// `@page` rule emitted for print renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDirective {
    pub paper: PaperSize,
    pub orientation: Orientation,
    /// `None` when the driver owns the margins.
    pub margins: Option<Margins>,
}

impl PageDirective {
    pub fn to_css(&self) -> String {
        let size = if self.paper.is_thermal() {
            let (w, _) = self.paper.dimensions_mm();
            format!("{w}mm auto {}", self.orientation.as_str())
        } else {
            format!("{} {}", self.paper.as_str(), self.orientation.as_str())
        };
        match self.margins {
            Some(m) => format!(
                "@page {{ size: {size}; margin: {}mm {}mm {}mm {}mm; }}",
                m.top, m.right, m.bottom, m.left
            ),
            None => format!("@page {{ size: {size}; }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(paper: PaperSize, orientation: Orientation) -> PageSettings {
        PageSettings {
            paper_size: paper,
            orientation,
            ..PageSettings::default()
        }
    }

    #[test]
    fn landscape_swaps_sheet_sizes() {
        for paper in [PaperSize::A4, PaperSize::A5, PaperSize::A6] {
            let p = resolve_geometry(&page(paper, Orientation::Portrait));
            let l = resolve_geometry(&page(paper, Orientation::Landscape));
            assert_eq!(Some(l.width_mm), p.height_mm, "{paper}");
            assert_eq!(l.height_mm, Some(p.width_mm), "{paper}");
        }
    }

    #[test]
    fn thermal_never_swaps() {
        for paper in [PaperSize::K80, PaperSize::K58] {
            let g = resolve_geometry(&page(paper, Orientation::Landscape));
            assert_eq!(g.width_mm, paper.dimensions_mm().0);
            assert_eq!(g.height_mm, None);
        }
    }

    #[test]
    fn driver_margins_zero_everything() {
        let mut p = page(PaperSize::A5, Orientation::Portrait);
        p.margin_top = 25.0;
        p.use_default_margins = true;
        let g = resolve_geometry(&p);
        assert_eq!(g.margins, Margins::ZERO);
        assert_eq!(g.page_directive().to_css(), "@page { size: A5 portrait; }");
    }

    #[test]
    fn directive_css() {
        let g = resolve_geometry(&page(PaperSize::A4, Orientation::Landscape));
        assert_eq!(
            g.page_directive().to_css(),
            "@page { size: A4 landscape; margin: 10mm 10mm 10mm 10mm; }"
        );
        let k = resolve_geometry(&page(PaperSize::K80, Orientation::Portrait));
        assert_eq!(
            k.page_directive().to_css(),
            "@page { size: 80mm auto portrait; margin: 10mm 10mm 10mm 10mm; }"
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let p = page(PaperSize::A6, Orientation::Landscape);
        assert_eq!(resolve_geometry(&p), resolve_geometry(&p));
    }
}
