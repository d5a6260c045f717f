//! Locale-aware number formatting for labels and tooltips.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Dashes work like underscores. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Format `value` with thousands grouping and at most two decimals
/// (`1234.5` -> `"1,234.5"`, `de`: `"1.234,5"`). Trailing zero decimals are
/// dropped.
pub fn format_number(value: f64, locale_tag: &str) -> String {
    if !value.is_finite() || value.abs() >= u64::MAX as f64 {
        return value.to_string();
    }
    let (locale, decimal) = map_locale(locale_tag);

    let rounded = (value * 100.0).round() / 100.0;
    let abs = rounded.abs();
    let mut whole = abs.trunc() as u64;
    let mut cents = ((abs - abs.trunc()) * 100.0).round() as u64;
    if cents >= 100 {
        whole += 1;
        cents -= 100;
    }

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(locale));
    match cents {
        0 => {}
        c if c % 10 == 0 => {
            out.push(decimal);
            out.push_str(&(c / 10).to_string());
        }
        c => {
            out.push(decimal);
            out.push_str(&format!("{c:02}"));
        }
    }
    out
}
