//! Pipeline – ties together resolution, composition and the print-only
//! extras (page directive, font bindings, roll length) into a single call.

use crate::document::TransactionDocument;
use crate::fonts::FontRegistry;
use crate::geometry::px_to_mm;
use crate::layout::measure;
use crate::render::{compose, should_render, RenderInputs};
use crate::render_tree::{RenderMode, RenderTree};
use crate::settings::PrintSettings;

/// Render `document` with `settings`.
///
/// Returns `None` when there is nothing to show. Print renders additionally
/// carry the `@page` directive, `@font-face` bindings for the configured
/// uploaded font, and, on thermal rolls, the estimated roll length. A failed
/// measurement only drops the estimate.
pub fn render_document(
    document: Option<&TransactionDocument>,
    settings: &PrintSettings,
    mode: RenderMode,
    fonts: &FontRegistry,
) -> Option<RenderTree> {
    if !should_render(document) {
        return None;
    }
    let document = document?;
    let inputs = RenderInputs::resolve(document, settings, mode);
    let mut tree = compose(&inputs)?;

    if mode == RenderMode::Print {
        tree.page_directive = Some(inputs.geometry.page_directive());

        let custom = settings.typography.custom_font_name.trim();
        let custom = (!custom.is_empty()).then_some(custom);
        if let Some(filename) = custom {
            match fonts.binding(filename) {
                Some(binding) => tree.font_faces.push(binding),
                None => log::warn!("font {filename} is not registered; printing with fallback stack"),
            }
        }

        if inputs.geometry.paper.is_thermal() {
            let registered = custom.filter(|f| fonts.contains(f));
            match measure(&tree, fonts, registered) {
                Ok(root) => {
                    let m = inputs.geometry.margins;
                    tree.roll_length_mm = Some(px_to_mm(root.height) + m.top + m.bottom);
                }
                Err(e) => log::warn!("roll length estimate unavailable: {e}"),
            }
        }
    }

    log::debug!(
        "rendered {:?} on {} ({:?})",
        document.doc_type,
        inputs.geometry.paper,
        mode
    );
    Some(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentType, LineItem};

    fn doc() -> TransactionDocument {
        let mut d = TransactionDocument::new(DocumentType::Sale);
        d.details.push(LineItem {
            product_name: "Tea".into(),
            quantity: 1.0,
            price: 15000.0,
            ..LineItem::default()
        });
        d.total_amount = 15000.0;
        d
    }

    #[test]
    fn print_carries_page_directive() {
        let fonts = FontRegistry::new();
        let settings = PrintSettings::default();
        let tree = render_document(Some(&doc()), &settings, RenderMode::Print, &fonts).unwrap();
        assert_eq!(
            tree.page_directive.unwrap().to_css(),
            "@page { size: A4 portrait; margin: 10mm 10mm 10mm 10mm; }"
        );
        assert!(tree.roll_length_mm.is_none());
    }

    #[test]
    fn preview_has_no_directive() {
        let fonts = FontRegistry::new();
        let tree = render_document(
            Some(&doc()),
            &PrintSettings::default(),
            RenderMode::Preview,
            &fonts,
        )
        .unwrap();
        assert!(tree.page_directive.is_none());
    }

    #[test]
    fn thermal_print_estimates_roll_length() {
        let fonts = FontRegistry::new();
        let mut settings = PrintSettings::default();
        settings.set("paper_size", "K80").unwrap();
        let tree = render_document(Some(&doc()), &settings, RenderMode::Print, &fonts).unwrap();
        let length = tree.roll_length_mm.unwrap();
        assert!(length > 20.0, "roll length {length}");
    }

    #[test]
    fn absent_document_renders_nothing() {
        let fonts = FontRegistry::new();
        assert!(render_document(None, &PrintSettings::default(), RenderMode::Print, &fonts).is_none());
    }

    #[test]
    fn registered_font_is_bound_for_print() {
        let mut fonts = FontRegistry::new();
        fonts.register("Brand.woff", b"wOFF\0\0\0\0".to_vec()).unwrap();
        let mut settings = PrintSettings::default();
        settings.typography.custom_font_name = "Brand.woff".into();
        let tree = render_document(Some(&doc()), &settings, RenderMode::Print, &fonts).unwrap();
        assert_eq!(tree.font_faces.len(), 1);
        assert_eq!(tree.font_faces[0].family, "Brand");
        assert!(tree.font_family.starts_with("\"Brand\""));
    }
}
