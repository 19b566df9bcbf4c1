//! Interaction binding – maps preview click targets back to setting edits.
//!
//! The render tree only tags nodes with a [`Region`]; what a click on that
//! region means lives here, so hosts can bind clicks however they like.

use serde::{Deserialize, Serialize};

use crate::settings::PrintSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Document title; toggles badge/plain title.
    Title,
    /// Table header row; toggles badge/plain header.
    TableHeader,
}

/// A single `key = value` edit to apply through the designer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEdit {
    pub key: &'static str,
    pub value: String,
}

impl SettingEdit {
    fn flag(key: &'static str, on: bool) -> Self {
        Self {
            key,
            value: on.to_string(),
        }
    }
}

impl Region {
    /// Edits produced by activating this region against `settings`.
    pub fn edits(self, settings: &PrintSettings) -> Vec<SettingEdit> {
        match self {
            Region::Title => vec![SettingEdit::flag(
                "invoice_title_badge",
                !settings.title.badge,
            )],
            Region::TableHeader => {
                let enable = !settings.table.header_badge;
                let mut edits = vec![SettingEdit::flag("invoice_table_header_is_badge", enable)];
                if enable {
                    edits.push(SettingEdit::flag("invoice_table_header_border", true));
                }
                edits
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_toggles_back_and_forth() {
        let mut s = PrintSettings::default();
        let edits = Region::Title.edits(&s);
        assert_eq!(edits[0].value, "true");
        s.title.badge = true;
        assert_eq!(Region::Title.edits(&s)[0].value, "false");
    }

    #[test]
    fn enabling_header_badge_also_enables_header_border() {
        let s = PrintSettings::default();
        let edits = Region::TableHeader.edits(&s);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[1].key, "invoice_table_header_border");

        let mut s = s;
        s.table.header_badge = true;
        let edits = Region::TableHeader.edits(&s);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].value, "false");
    }
}
