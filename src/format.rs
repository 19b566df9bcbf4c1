//! Number and date formatting for printed documents.

use chrono::NaiveDateTime;

/// en-US grouping with at most three fraction digits (`1234.5` -> `1,234.5`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative && (grouped != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `HH:MM:SS DD/MM/YYYY`, or `-` when absent.
pub fn format_date(date: Option<&NaiveDateTime>) -> String {
    date.map(|d| d.format("%H:%M:%S %d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `DD/MM/YYYY`, or `-` when absent.
pub fn format_day(date: Option<&NaiveDateTime>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(-25000.0), "-25,000");
    }

    #[test]
    fn keeps_up_to_three_decimals() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(2.12345), "2.123");
        assert_eq!(format_number(1234.0004), "1,234");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(format_date(Some(&d)), "08:05:00 09/03/2024");
        assert_eq!(format_day(Some(&d)), "09/03/2024");
        assert_eq!(format_date(None), "-");
    }
}
