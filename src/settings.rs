//! Print settings – the typed form of a template's configuration map.
//!
//! Templates persist a flat `key -> string` map. Everything downstream of
//! the store works on [`PrintSettings`]; the string map only exists at the
//! load/save boundary and is converted through the schema table at the
//! bottom of this file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Orientation, PaperSize};
use crate::style::{BorderWeight, Color, LineStyle};

/// Wire form of a template configuration.
pub type ConfigMap = BTreeMap<String, String>;

/// Outcome of applying one `key = value` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Parsed and stored.
    Set,
    /// Numeric value that did not parse; stored as 0.
    Coerced,
    /// Not a schema key; kept verbatim in [`PrintSettings::extra`].
    Unknown,
}

/// Non-fatal problem found while loading stored configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("stored configuration could not be decoded ({reason}); using defaults")]
    MalformedPayload { reason: String },
    #[error("setting `{key}` = {value:?} is not a number; using 0")]
    CoercedNumber { key: String, value: String },
    #[error("setting `{key}` = {value:?} was rejected; keeping default")]
    RejectedValue { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Setting groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Leave margins to the print driver.
    pub use_default_margins: bool,
    /// Margins in millimetres.
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            use_default_margins: false,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 10.0,
            margin_left: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographySettings {
    pub font_family: String,
    /// Filename of an uploaded font; overrides `font_family` when set.
    pub custom_font_name: String,
    pub base_font_size: f32,
    pub line_spacing: f32,
    /// Gap below the header block, px.
    pub header_spacing: f32,
}

impl Default for TypographySettings {
    fn default() -> Self {
        Self {
            font_family: "Inter, sans-serif".to_string(),
            custom_font_name: String::new(),
            base_font_size: 12.0,
            line_spacing: 1.4,
            header_spacing: 10.0,
        }
    }
}

/// Shop identity printed in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub bank: String,
    pub bank_account: String,
    pub bank_user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSettings {
    pub info: ShopInfo,
    pub show_logo: bool,
    pub logo_url: String,
    pub show_name: bool,
    pub show_address: bool,
    pub show_phone: bool,
    pub show_bank_info: bool,
    pub name_size: f32,
    pub info_size: f32,
    pub info_color: Color,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            info: ShopInfo::default(),
            show_logo: true,
            logo_url: String::new(),
            show_name: true,
            show_address: true,
            show_phone: true,
            show_bank_info: true,
            name_size: 16.0,
            info_size: 10.0,
            info_color: Color::rgb(0x33, 0x33, 0x33),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSettings {
    pub size: f32,
    pub badge: bool,
    pub badge_background: Color,
    pub badge_border: Color,
    pub badge_text: Color,
    pub color: Color,
}

impl Default for TitleSettings {
    fn default() -> Self {
        Self {
            size: 22.0,
            badge: false,
            badge_background: Color::rgb(0x2d, 0x50, 0x16),
            badge_border: Color::rgb(0x86, 0xef, 0xac),
            badge_text: Color::WHITE,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSettings {
    pub show_customer: bool,
    pub show_id: bool,
    pub show_date: bool,
    pub size: f32,
    pub color: Color,
}

impl Default for InfoSettings {
    fn default() -> Self {
        Self {
            show_customer: true,
            show_id: true,
            show_date: true,
            size: 12.0,
            color: Color::BLACK,
        }
    }
}

/// Table body font preset. `Small` shrinks body text by 2px.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFontPreset {
    #[default]
    Normal,
    Small,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    pub show: bool,
    pub header_size: f32,
    pub content_size: f32,
    pub font_preset: TableFontPreset,
    pub border: bool,
    pub border_rows: bool,
    pub border_cols: bool,
    pub border_weight: BorderWeight,
    pub border_style: LineStyle,
    pub header_bg_enabled: bool,
    pub header_bg: Color,
    pub header_badge: bool,
    pub header_badge_background: Color,
    pub header_badge_border: Color,
    pub header_badge_text: Color,
    pub header_border: bool,
    pub header_border_width: f32,
    pub header_border_color: Color,
    pub zebra: bool,
    pub zebra_color: Color,
    pub row_padding: f32,
    pub header_color: Color,
    pub body_color: Color,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            show: true,
            header_size: 12.0,
            content_size: 12.0,
            font_preset: TableFontPreset::Normal,
            border: true,
            border_rows: true,
            border_cols: true,
            border_weight: BorderWeight::Thin,
            border_style: LineStyle::Solid,
            header_bg_enabled: true,
            header_bg: Color::rgb(0xf2, 0xf2, 0xf2),
            header_badge: false,
            header_badge_background: Color::rgb(0x2d, 0x50, 0x16),
            header_badge_border: Color::rgb(0x86, 0xef, 0xac),
            header_badge_text: Color::WHITE,
            header_border: false,
            header_border_width: 1.0,
            header_border_color: Color::BLACK,
            zebra: true,
            zebra_color: Color::rgb(0xf9, 0xfa, 0xfb),
            row_padding: 4.0,
            header_color: Color::BLACK,
            body_color: Color::BLACK,
        }
    }
}

/// Column visibility flags and widths (px).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSettings {
    pub show_stt: bool,
    pub show_name: bool,
    pub show_unit: bool,
    pub show_secondary_qty: bool,
    pub show_qty: bool,
    pub show_price: bool,
    pub show_total: bool,
    pub show_code: bool,
    pub show_date: bool,
    pub show_method: bool,
    pub stt_width: f32,
    pub name_width: f32,
    pub unit_width: f32,
    pub secondary_qty_width: f32,
    pub qty_width: f32,
    pub price_width: f32,
    pub total_width: f32,
    pub code_width: f32,
    pub date_width: f32,
    pub method_width: f32,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            show_stt: true,
            show_name: true,
            show_unit: true,
            show_secondary_qty: false,
            show_qty: true,
            show_price: true,
            show_total: true,
            show_code: true,
            show_date: true,
            show_method: true,
            stt_width: 40.0,
            name_width: 200.0,
            unit_width: 60.0,
            secondary_qty_width: 90.0,
            qty_width: 60.0,
            price_width: 90.0,
            total_width: 100.0,
            code_width: 80.0,
            date_width: 80.0,
            method_width: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySettings {
    pub show_total_items: bool,
    pub show_total_qty: bool,
    pub show_total_secondary_qty: bool,
    pub strip_font_size: f32,
    pub show_notes: bool,
    pub notes_color: Color,
    pub show_total_amount: bool,
    pub section_size: f32,
    pub balance_size: f32,
    pub section_margin_top: f32,
    pub total_line_size: f32,
    pub total_line_bold: bool,
    pub total_line_italic: bool,
    pub total_line_margin_top: f32,
    pub total_line_margin_bottom: f32,
    pub total_label_color: Color,
    pub total_value_color: Color,
    pub show_old_debt: bool,
    pub show_paid: bool,
    pub show_balance: bool,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            show_total_items: true,
            show_total_qty: true,
            show_total_secondary_qty: false,
            strip_font_size: 11.0,
            show_notes: true,
            notes_color: Color::rgb(0x55, 0x55, 0x55),
            show_total_amount: true,
            section_size: 14.0,
            balance_size: 18.0,
            section_margin_top: 0.0,
            total_line_size: 18.0,
            total_line_bold: true,
            total_line_italic: false,
            total_line_margin_top: 10.0,
            total_line_margin_bottom: 10.0,
            total_label_color: Color::BLACK,
            total_value_color: Color::BLACK,
            show_old_debt: true,
            show_paid: true,
            show_balance: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSettings {
    pub show_signatures: bool,
    pub show_thank_you: bool,
    pub thank_you_message: String,
    pub color: Color,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            show_signatures: true,
            show_thank_you: true,
            thank_you_message: "Thank you, see you again!".to_string(),
            color: Color::rgb(0x44, 0x44, 0x44),
        }
    }
}

/// Fully typed template configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    pub page: PageSettings,
    pub typography: TypographySettings,
    pub shop: ShopSettings,
    pub title: TitleSettings,
    pub info: InfoSettings,
    pub table: TableSettings,
    pub columns: ColumnSettings,
    pub summary: SummarySettings,
    pub footer: FooterSettings,
    /// Keys outside the schema, carried through load and save untouched.
    pub extra: BTreeMap<String, String>,
}

impl PrintSettings {
    /// The documented defaults in wire form.
    pub fn default_map() -> ConfigMap {
        Self::default().to_map()
    }

    /// Every key the schema understands.
    pub fn keys() -> &'static [&'static str] {
        SCHEMA_KEYS
    }

    /// Build settings from a stored map layered over the defaults.
    ///
    /// Never fails: values that cannot be represented are reported as
    /// warnings and the default (or 0 for numbers) is kept.
    pub fn from_map(stored: &ConfigMap) -> (Self, Vec<ConfigWarning>) {
        let mut settings = Self::default();
        let mut warnings = Vec::new();
        for (key, value) in stored {
            match settings.set(key, value) {
                Ok(Applied::Coerced) => warnings.push(ConfigWarning::CoercedNumber {
                    key: key.clone(),
                    value: value.clone(),
                }),
                Ok(_) => {}
                Err(_) => warnings.push(ConfigWarning::RejectedValue {
                    key: key.clone(),
                    value: value.clone(),
                }),
            }
        }
        for w in &warnings {
            log::warn!("{w}");
        }
        (settings, warnings)
    }

    /// Serialise back to the wire form (schema keys plus extras).
    pub fn to_map(&self) -> ConfigMap {
        let mut map: ConfigMap = self.extra.clone();
        for key in SCHEMA_KEYS {
            if let Some(value) = self.get_known(key) {
                map.insert((*key).to_string(), value);
            }
        }
        map
    }

    /// Apply a single `key = raw` edit.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<Applied> {
        match self.set_known(key, raw) {
            Some(result) => result,
            None => {
                self.extra.insert(key.to_string(), raw.to_string());
                Ok(Applied::Unknown)
            }
        }
    }

    /// Current wire value of `key`, including extras.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_known(key).or_else(|| self.extra.get(key).cloned())
    }

    /// Effective body font size of the line-item table.
    pub fn table_body_font_size(&self) -> f32 {
        match self.table.font_preset {
            TableFontPreset::Normal => self.table.content_size,
            TableFontPreset::Small => self.table.content_size - 2.0,
        }
    }
}

/// Key-level merge: stored values override defaults, defaults fill gaps.
pub fn merge_with_defaults(stored: &ConfigMap) -> ConfigMap {
    let mut merged = PrintSettings::default_map();
    merged.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

// ---------------------------------------------------------------------------
// Value codecs
// ---------------------------------------------------------------------------

/// Conversion between a typed field and its wire string.
pub trait SettingValue: Sized {
    /// `None` when `raw` is not representable.
    fn parse_setting(raw: &str) -> Option<Self>;

    /// Substitute stored when parsing fails; `None` rejects the edit.
    fn coerced() -> Option<Self> {
        None
    }

    fn to_setting(&self) -> String;
}

impl SettingValue for bool {
    fn parse_setting(raw: &str) -> Option<Self> {
        Some(raw.trim() == "true")
    }

    fn to_setting(&self) -> String {
        self.to_string()
    }
}

impl SettingValue for f32 {
    fn parse_setting(raw: &str) -> Option<Self> {
        parse_leading_number(raw)
    }

    fn coerced() -> Option<Self> {
        Some(0.0)
    }

    fn to_setting(&self) -> String {
        format!("{self}")
    }
}

impl SettingValue for String {
    fn parse_setting(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_setting(&self) -> String {
        self.clone()
    }
}

impl SettingValue for Color {
    fn parse_setting(raw: &str) -> Option<Self> {
        Color::from_hex(raw.trim())
    }

    fn to_setting(&self) -> String {
        self.to_hex()
    }
}

impl SettingValue for PaperSize {
    fn parse_setting(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A4" => Some(PaperSize::A4),
            "A5" => Some(PaperSize::A5),
            "A6" => Some(PaperSize::A6),
            "K80" => Some(PaperSize::K80),
            "K58" => Some(PaperSize::K58),
            _ => None,
        }
    }

    fn to_setting(&self) -> String {
        self.as_str().to_string()
    }
}

impl SettingValue for Orientation {
    fn parse_setting(raw: &str) -> Option<Self> {
        match raw.trim() {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }

    fn to_setting(&self) -> String {
        self.as_str().to_string()
    }
}

impl SettingValue for BorderWeight {
    fn parse_setting(raw: &str) -> Option<Self> {
        match raw.trim() {
            "thin" => Some(BorderWeight::Thin),
            "medium" => Some(BorderWeight::Medium),
            "thick" => Some(BorderWeight::Thick),
            _ => None,
        }
    }

    fn to_setting(&self) -> String {
        match self {
            BorderWeight::Thin => "thin",
            BorderWeight::Medium => "medium",
            BorderWeight::Thick => "thick",
        }
        .to_string()
    }
}

impl SettingValue for LineStyle {
    fn parse_setting(raw: &str) -> Option<Self> {
        match raw.trim() {
            "solid" => Some(LineStyle::Solid),
            "dashed" => Some(LineStyle::Dashed),
            _ => None,
        }
    }

    fn to_setting(&self) -> String {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        }
        .to_string()
    }
}

impl SettingValue for TableFontPreset {
    fn parse_setting(raw: &str) -> Option<Self> {
        match raw.trim() {
            "normal" | "" => Some(TableFontPreset::Normal),
            "small" => Some(TableFontPreset::Small),
            _ => None,
        }
    }

    fn to_setting(&self) -> String {
        match self {
            TableFontPreset::Normal => "normal",
            TableFontPreset::Small => "small",
        }
        .to_string()
    }
}

/// Parse the longest numeric prefix (`"12px"` -> 12, `" 1.5 "` -> 1.5).
fn parse_leading_number(raw: &str) -> Option<f32> {
    let s = raw.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, ch) in s.char_indices() {
        match ch {
            '-' | '+' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f32>().ok().filter(|v| v.is_finite())
}

fn assign<T: SettingValue>(slot: &mut T, key: &str, raw: &str) -> Result<Applied> {
    match T::parse_setting(raw) {
        Some(value) => {
            *slot = value;
            Ok(Applied::Set)
        }
        None => match T::coerced() {
            Some(value) => {
                *slot = value;
                Ok(Applied::Coerced)
            }
            None => Err(Error::InvalidSetting {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Schema table: wire key <-> typed field
// ---------------------------------------------------------------------------

macro_rules! schema {
    ($($key:literal => $($path:ident).+ ,)*) => {
        const SCHEMA_KEYS: &[&str] = &[$($key),*];

        impl PrintSettings {
            fn set_known(&mut self, key: &str, raw: &str) -> Option<Result<Applied>> {
                match key {
                    $($key => Some(assign(&mut self.$($path).+, key, raw)),)*
                    _ => None,
                }
            }

            fn get_known(&self, key: &str) -> Option<String> {
                match key {
                    $($key => Some(self.$($path).+.to_setting()),)*
                    _ => None,
                }
            }
        }
    };
}

schema! {
    "paper_size" => page.paper_size,
    "invoice_orientation" => page.orientation,
    "invoice_use_default_margins" => page.use_default_margins,
    "invoice_margin_top" => page.margin_top,
    "invoice_margin_right" => page.margin_right,
    "invoice_margin_bottom" => page.margin_bottom,
    "invoice_margin_left" => page.margin_left,

    "invoice_font_family" => typography.font_family,
    "invoice_custom_font_name" => typography.custom_font_name,
    "invoice_font_size" => typography.base_font_size,
    "invoice_line_spacing" => typography.line_spacing,
    "invoice_header_spacing" => typography.header_spacing,

    "shop_name" => shop.info.name,
    "shop_address" => shop.info.address,
    "shop_phone" => shop.info.phone,
    "shop_bank" => shop.info.bank,
    "shop_bank_account" => shop.info.bank_account,
    "shop_bank_user" => shop.info.bank_user,
    "invoice_show_logo" => shop.show_logo,
    "invoice_logo_url" => shop.logo_url,
    "invoice_show_shop_name" => shop.show_name,
    "invoice_show_address" => shop.show_address,
    "invoice_show_phone" => shop.show_phone,
    "invoice_show_bank_info" => shop.show_bank_info,
    "invoice_store_name_size" => shop.name_size,
    "invoice_store_info_size" => shop.info_size,
    "invoice_color_store_info" => shop.info_color,

    "invoice_title_size" => title.size,
    "invoice_title_badge" => title.badge,
    "invoice_title_badge_bg" => title.badge_background,
    "invoice_title_badge_border" => title.badge_border,
    "invoice_title_badge_text_color" => title.badge_text,
    "invoice_color_title" => title.color,

    "invoice_show_customer_info" => info.show_customer,
    "invoice_show_id" => info.show_id,
    "invoice_show_date" => info.show_date,
    "invoice_customer_info_size" => info.size,
    "invoice_color_customer_info" => info.color,

    "invoice_show_table" => table.show,
    "invoice_table_header_size" => table.header_size,
    "invoice_table_content_size" => table.content_size,
    "invoice_table_font_size_preset" => table.font_preset,
    "invoice_table_border" => table.border,
    "invoice_table_border_rows" => table.border_rows,
    "invoice_table_border_cols" => table.border_cols,
    "invoice_table_border_thickness" => table.border_weight,
    "invoice_table_border_style" => table.border_style,
    "invoice_table_header_bg_enabled" => table.header_bg_enabled,
    "invoice_table_header_bg_color" => table.header_bg,
    "invoice_table_header_is_badge" => table.header_badge,
    "invoice_table_header_badge_bg" => table.header_badge_background,
    "invoice_table_header_badge_border" => table.header_badge_border,
    "invoice_table_header_badge_text_color" => table.header_badge_text,
    "invoice_table_header_border" => table.header_border,
    "invoice_table_header_border_width" => table.header_border_width,
    "invoice_table_header_border_color" => table.header_border_color,
    "invoice_table_zebra_stripe" => table.zebra,
    "invoice_table_zebra_color" => table.zebra_color,
    "invoice_row_padding" => table.row_padding,
    "invoice_color_table_header" => table.header_color,
    "invoice_color_table_body" => table.body_color,

    "invoice_show_col_stt" => columns.show_stt,
    "invoice_show_col_name" => columns.show_name,
    "invoice_show_col_unit" => columns.show_unit,
    "invoice_show_secondary_qty" => columns.show_secondary_qty,
    "invoice_show_col_qty" => columns.show_qty,
    "invoice_show_col_price" => columns.show_price,
    "invoice_show_col_total" => columns.show_total,
    "invoice_show_col_code" => columns.show_code,
    "invoice_show_col_date" => columns.show_date,
    "invoice_show_col_method" => columns.show_method,
    "invoice_col_stt" => columns.stt_width,
    "invoice_col_name" => columns.name_width,
    "invoice_col_unit" => columns.unit_width,
    "invoice_col_secondary_qty_width" => columns.secondary_qty_width,
    "invoice_col_qty" => columns.qty_width,
    "invoice_col_price" => columns.price_width,
    "invoice_col_total" => columns.total_width,
    "invoice_col_code" => columns.code_width,
    "invoice_col_date" => columns.date_width,
    "invoice_col_method" => columns.method_width,

    "invoice_show_total_items" => summary.show_total_items,
    "invoice_show_total_qty" => summary.show_total_qty,
    "invoice_show_total_secondary_qty" => summary.show_total_secondary_qty,
    "invoice_total_summary_font_size" => summary.strip_font_size,
    "invoice_show_notes" => summary.show_notes,
    "invoice_color_notes" => summary.notes_color,
    "invoice_show_total_amount" => summary.show_total_amount,
    "invoice_total_section_size" => summary.section_size,
    "invoice_total_balance_size" => summary.balance_size,
    "invoice_total_section_margin_top" => summary.section_margin_top,
    "invoice_total_line_size" => summary.total_line_size,
    "invoice_total_line_bold" => summary.total_line_bold,
    "invoice_total_line_italic" => summary.total_line_italic,
    "invoice_total_line_margin_top" => summary.total_line_margin_top,
    "invoice_total_line_margin_bottom" => summary.total_line_margin_bottom,
    "invoice_color_total_label" => summary.total_label_color,
    "invoice_color_total_value" => summary.total_value_color,
    "invoice_show_old_debt" => summary.show_old_debt,
    "invoice_show_paid" => summary.show_paid,
    "invoice_show_balance" => summary.show_balance,

    "invoice_show_signatures" => footer.show_signatures,
    "invoice_show_thank_you" => footer.show_thank_you,
    "invoice_thank_you_message" => footer.thank_you_message,
    "invoice_color_footer" => footer.color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_schema_key() {
        let map = PrintSettings::default_map();
        for key in PrintSettings::keys() {
            assert!(map.contains_key(*key), "missing default for {key}");
        }
        assert_eq!(map["paper_size"], "A4");
        assert_eq!(map["invoice_margin_left"], "10");
        assert_eq!(map["invoice_line_spacing"], "1.4");
        assert_eq!(map["invoice_table_zebra_color"], "#f9fafb");
    }

    #[test]
    fn absent_keys_resolve_to_defaults() {
        let mut stored = ConfigMap::new();
        stored.insert("paper_size".into(), "K80".into());
        let (s, warnings) = PrintSettings::from_map(&stored);
        assert!(warnings.is_empty());
        assert_eq!(s.page.paper_size, PaperSize::K80);
        assert_eq!(s.page.margin_top, 10.0);
        assert!(s.columns.show_total);
    }

    #[test]
    fn unknown_keys_are_kept_not_rejected() {
        let mut stored = ConfigMap::new();
        stored.insert("ui_show_doraemon".into(), "true".into());
        let (s, warnings) = PrintSettings::from_map(&stored);
        assert!(warnings.is_empty());
        assert_eq!(s.get("ui_show_doraemon").as_deref(), Some("true"));
        assert_eq!(s.to_map()["ui_show_doraemon"], "true");
    }

    #[test]
    fn malformed_number_becomes_zero_with_warning() {
        let mut stored = ConfigMap::new();
        stored.insert("invoice_margin_top".into(), "abc".into());
        let (s, warnings) = PrintSettings::from_map(&stored);
        assert_eq!(s.page.margin_top, 0.0);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigWarning::CoercedNumber { .. }));
    }

    #[test]
    fn invalid_enum_keeps_default() {
        let mut s = PrintSettings::default();
        let err = s.set("paper_size", "B5").unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { .. }));
        assert_eq!(s.page.paper_size, PaperSize::A4);
    }

    #[test]
    fn leading_number_parsing() {
        assert_eq!(parse_leading_number("12px"), Some(12.0));
        assert_eq!(parse_leading_number(" 1.5 "), Some(1.5));
        assert_eq!(parse_leading_number("-3"), Some(-3.0));
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("mm"), None);
    }

    #[test]
    fn booleans_follow_string_equality() {
        let mut s = PrintSettings::default();
        s.set("invoice_show_logo", "yes").unwrap();
        assert!(!s.shop.show_logo);
        s.set("invoice_show_logo", "true").unwrap();
        assert!(s.shop.show_logo);
    }

    #[test]
    fn merge_keeps_defaults_for_omitted_keys() {
        let mut stored = ConfigMap::new();
        stored.insert("invoice_title_size".into(), "30".into());
        let merged = merge_with_defaults(&stored);
        assert_eq!(merged["invoice_title_size"], "30");
        assert_eq!(merged["invoice_title_badge"], "false");
    }

    #[test]
    fn small_preset_shrinks_body_font() {
        let mut s = PrintSettings::default();
        s.set("invoice_table_font_size_preset", "small").unwrap();
        assert_eq!(s.table_body_font_size(), 10.0);
    }
}
