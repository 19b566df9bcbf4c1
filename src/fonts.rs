//! Font registration and text measurement using `ttf-parser`.
//!
//! Uploaded fonts are registered under their filename. Print renders bind
//! each registered font as an embedded `@font-face`; the measurement pass
//! uses glyph advances when the face can be parsed and a width heuristic
//! otherwise.

use std::collections::HashMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFormat {
    TrueType,
    OpenType,
    Woff,
    Woff2,
}

impl FontFormat {
    pub(crate) fn detect(filename: &str, bytes: &[u8]) -> Option<Self> {
        match bytes.get(0..4) {
            Some(b"wOFF") => return Some(FontFormat::Woff),
            Some(b"wOF2") => return Some(FontFormat::Woff2),
            _ => {}
        }
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)?;
        match ext.as_str() {
            "ttf" => Some(FontFormat::TrueType),
            "otf" => Some(FontFormat::OpenType),
            "woff" => Some(FontFormat::Woff),
            "woff2" => Some(FontFormat::Woff2),
            _ => None,
        }
    }

    /// CSS `format()` hint.
    pub fn css_format(self) -> &'static str {
        match self {
            FontFormat::TrueType => "truetype",
            FontFormat::OpenType => "opentype",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            FontFormat::TrueType => "font/ttf",
            FontFormat::OpenType => "font/otf",
            FontFormat::Woff => "font/woff",
            FontFormat::Woff2 => "font/woff2",
        }
    }
}

/// Vertical metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
    pub line_gap: f32,
}

/// A registered font file.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub format: FontFormat,
    /// `None` for compressed web fonts.
    pub metrics: Option<FontMetrics>,
}

/// `@font-face` binding for one uploaded font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFaceBinding {
    pub family: String,
    pub filename: String,
    pub format: FontFormat,
    pub data_uri: String,
}

impl FontFaceBinding {
    pub fn to_css(&self) -> String {
        format!(
            "@font-face {{ font-family: \"{}\"; src: url({}) format(\"{}\"); }}",
            self.family,
            self.data_uri,
            self.format.css_format()
        )
    }
}

/// Family name used for an uploaded font: the filename without extension.
pub fn family_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Fonts registered by the host, keyed by filename.
#[derive(Default)]
pub struct FontRegistry {
    fonts: HashMap<String, FontData>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `filename`.
    ///
    /// TrueType/OpenType faces must parse; WOFF/WOFF2 are stored without
    /// metrics.
    pub fn register(&mut self, filename: &str, bytes: Vec<u8>) -> Result<()> {
        let format = FontFormat::detect(filename, &bytes).ok_or_else(|| Error::Font {
            filename: filename.to_string(),
            reason: "unsupported font format".to_string(),
        })?;

        let metrics = match format {
            FontFormat::TrueType | FontFormat::OpenType => {
                let face = ttf_parser::Face::parse(&bytes, 0).map_err(|e| Error::Font {
                    filename: filename.to_string(),
                    reason: e.to_string(),
                })?;
                Some(FontMetrics {
                    units_per_em: face.units_per_em() as f32,
                    ascender: face.ascender() as f32,
                    descender: face.descender() as f32,
                    line_gap: face.line_gap() as f32,
                })
            }
            FontFormat::Woff | FontFormat::Woff2 => None,
        };

        log::debug!("registered font {filename} ({})", format.css_format());
        self.fonts.insert(
            filename.to_string(),
            FontData {
                bytes,
                format,
                metrics,
            },
        );
        Ok(())
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.fonts.contains_key(filename)
    }

    pub fn get(&self, filename: &str) -> Option<&FontData> {
        self.fonts.get(filename)
    }

    /// Registered filenames, sorted.
    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fonts.keys().cloned().collect();
        names.sort();
        names
    }

    /// Embedded `@font-face` binding, if `filename` is registered.
    pub fn binding(&self, filename: &str) -> Option<FontFaceBinding> {
        let data = self.fonts.get(filename)?;
        Some(FontFaceBinding {
            family: family_name(filename),
            filename: filename.to_string(),
            format: data.format,
            data_uri: format!(
                "data:{};base64,{}",
                data.format.mime(),
                BASE64_STD.encode(&data.bytes)
            ),
        })
    }

    /// Measure the width of a string at a given font size (in px).
    /// Uses glyph advances of `font` when it is a parsed face, otherwise an
    /// average character width of 0.5 × font_size (0.55 for bold).
    pub fn measure_text_width(
        &self,
        text: &str,
        font_size: f32,
        bold: bool,
        font: Option<&str>,
    ) -> f32 {
        let heuristic = || {
            let avg = if bold { 0.55 } else { 0.5 };
            text.chars().count() as f32 * font_size * avg
        };

        let Some(data) = font.and_then(|f| self.fonts.get(f)) else {
            return heuristic();
        };
        let Some(metrics) = data.metrics else {
            return heuristic();
        };
        let Ok(face) = ttf_parser::Face::parse(&data.bytes, 0) else {
            return heuristic();
        };

        let scale = font_size / metrics.units_per_em;
        text.chars()
            .map(|ch| match face.glyph_index(ch) {
                Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                None => font_size * 0.5,
            })
            .sum()
    }

    pub fn line_height_px(&self, font_size: f32, line_height_factor: f32) -> f32 {
        font_size * line_height_factor
    }
}

/// Word-wrap text to fit within `max_width` pixels.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    bold: bool,
    font: Option<&str>,
    max_width: f32,
    fonts: &FontRegistry,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let w = fonts.measure_text_width(&candidate, font_size, bold, font);
            if w > max_width && !current.is_empty() {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_text_width() {
        let fonts = FontRegistry::new();
        let w = fonts.measure_text_width("Hello", 16.0, false, None);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        let bold = fonts.measure_text_width("Hello", 16.0, true, Some("missing.ttf"));
        assert!((bold - 44.0).abs() < 0.1);
    }

    #[test]
    fn word_wrap_basic() {
        let fonts = FontRegistry::new();
        let lines = wrap_text("Hello world foo bar", 16.0, false, None, 60.0, &fonts);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
    }

    #[test]
    fn wrap_keeps_blank_paragraphs() {
        let fonts = FontRegistry::new();
        let lines = wrap_text("a\n\nb", 12.0, false, None, 500.0, &fonts);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn rejects_garbage_truetype() {
        let mut fonts = FontRegistry::new();
        let err = fonts.register("Broken.ttf", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::Font { .. }));
        assert!(!fonts.contains("Broken.ttf"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let mut fonts = FontRegistry::new();
        assert!(fonts.register("notes.txt", b"hello".to_vec()).is_err());
    }

    #[test]
    fn woff_binding_css() {
        let mut fonts = FontRegistry::new();
        fonts
            .register("Roboto-Regular.woff2", b"wOF2\0\0\0\0".to_vec())
            .unwrap();
        let binding = fonts.binding("Roboto-Regular.woff2").unwrap();
        assert_eq!(binding.family, "Roboto-Regular");
        let css = binding.to_css();
        assert!(css.starts_with("@font-face { font-family: \"Roboto-Regular\";"));
        assert!(css.contains("data:font/woff2;base64,"));
        assert!(css.ends_with("format(\"woff2\"); }"));
    }
}
