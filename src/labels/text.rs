//! Text measurement, word splitting, and wrapping.
//!
//! Layout only needs widths; where they come from is pluggable through
//! [`TextMeasurer`]. [`HeuristicMeasurer`] estimates from character counts
//! and needs no font files; `GlyphMeasurer` (feature `glyph-metrics`) reads
//! real advances from a font.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Inter followed by the usual system sans-serif fallbacks.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, \"Helvetica Neue\", Arial, \"Noto Sans\", sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\", \"Segoe UI Symbol\", \"Noto Color Emoji\"";

/// The ellipsis appended to truncated lines.
pub const ELLIPSIS: char = '…';

/// Words end after whitespace or after one of `- / ; : &` (kept on the word).
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\s\-/;:&]+[\-/;:&]*|[\-/;:&]+").expect("valid word pattern")
});

/// Font parameters for a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    /// Font size in pixels.
    pub size: f64,
    pub weight: u16,
    /// Line height in pixels.
    pub line_height: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64, weight: u16, line_height: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
            line_height,
        }
    }

    /// Same font at another size; line height follows `ratio`.
    pub fn resized(&self, size: f64, ratio: f64) -> Self {
        Self {
            size,
            line_height: size * ratio,
            ..self.clone()
        }
    }
}

/// Output of [`TextMeasurer::wrap`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrapResult {
    pub lines: Vec<String>,
    /// Measured width of each entry in `lines`.
    pub widths: Vec<f64>,
    /// The whole text did not fit.
    pub truncated: bool,
}

/// Pixel measurement of text. Only [`measure_width`](Self::measure_width) is
/// required; splitting and wrapping have default implementations built on it.
pub trait TextMeasurer: Send + Sync {
    /// Width in pixels of `text` rendered with `font`.
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64;

    fn measure_widths(&self, texts: &[String], font: &FontSpec) -> Vec<f64> {
        texts.iter().map(|t| self.measure_width(t, font)).collect()
    }

    /// Break `text` into wrap units, dropping whitespace.
    fn split_words(&self, text: &str) -> Vec<String> {
        WORD.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    /// Greedy word wrap into at most `max_lines` lines of at most `width`
    /// pixels, stopping when the next line would pass `height`.
    ///
    /// Lines that fit are kept even when `truncated` is set. A newline in
    /// the text forces a break.
    fn wrap(
        &self,
        text: &str,
        font: &FontSpec,
        max_lines: usize,
        width: f64,
        height: f64,
    ) -> WrapResult {
        let words = self.split_words(text);
        let sizes = self.measure_widths(&words, font);
        let space = self.measure_width(" ", font);

        let mut lines: Vec<String> = Vec::new();
        let mut truncated = false;
        let mut line_count = 1usize;
        let mut used = 0.0;
        let mut cursor = 0usize;
        let mut forced_break = false;

        for (i, (word, &word_width)) in words.iter().zip(&sizes).enumerate() {
            let start = text[cursor..].find(word.as_str()).map_or(cursor, |o| cursor + o);
            let end = (start + word.len()).min(text.len());
            let trailing_len = text[end..]
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(text.len() - end);
            let trailing = &text[end..end + trailing_len];
            cursor = end + trailing_len;
            let piece = format!("{word}{trailing}");

            if forced_break || used + word_width > width {
                if i == 0 {
                    truncated = true;
                    break;
                }
                if let Some(last) = lines.last_mut() {
                    last.truncate(last.trim_end().len());
                }
                line_count += 1;
                if font.line_height * line_count as f64 > height
                    || word_width > width
                    || line_count > max_lines
                {
                    truncated = true;
                    break;
                }
                used = 0.0;
                lines.push(piece);
            } else if let Some(last) = lines.last_mut() {
                last.push_str(&piece);
            } else {
                lines.push(piece);
            }

            used += word_width + trailing.chars().count() as f64 * space;
            forced_break = trailing.contains('\n');
        }

        for line in &mut lines {
            line.truncate(line.trim_end().len());
        }
        let widths = self.measure_widths(&lines, font);
        WrapResult {
            lines,
            widths,
            truncated,
        }
    }
}

/// Estimates width from character count: each glyph advances a fixed
/// fraction of the font size. Bold weights run slightly wider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasurer {
    /// Average advance as a fraction of the font size.
    pub em_ratio: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { em_ratio: 0.60 }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        let bold = if font.weight >= 600 { 1.08 } else { 1.0 };
        text.chars().count() as f64 * font.size * self.em_ratio * bold
    }
}

/// Mark `line` as cut short: trailing `.`/`,` go, `…` is appended, and
/// characters are dropped from the end while the result is wider than
/// `max_width`.
pub fn ellipsize(
    line: &str,
    font: &FontSpec,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> String {
    let mut base = line.trim_end_matches(['.', ',']).trim_end().to_string();
    loop {
        let candidate = format!("{base}{ELLIPSIS}");
        if base.is_empty() || measurer.measure_width(&candidate, font) <= max_width {
            return candidate;
        }
        base.pop();
        base.truncate(base.trim_end_matches(['.', ',']).trim_end().len());
    }
}

#[cfg(feature = "glyph-metrics")]
pub use glyph::GlyphMeasurer;

#[cfg(feature = "glyph-metrics")]
mod glyph {
    use super::{FontSpec, TextMeasurer};
    use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont};

    /// Measures with the advances and kerning of one loaded font. The font
    /// spec's family and weight are ignored; size is honoured as CSS pixels
    /// per em.
    #[derive(Clone)]
    pub struct GlyphMeasurer {
        font: FontArc,
    }

    impl std::fmt::Debug for GlyphMeasurer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GlyphMeasurer").finish_non_exhaustive()
        }
    }

    impl GlyphMeasurer {
        /// Load a TrueType/OpenType font from its bytes.
        pub fn from_bytes(data: Vec<u8>) -> Result<Self, InvalidFont> {
            Ok(Self {
                font: FontArc::try_from_vec(data)?,
            })
        }

        fn scale_for(&self, size: f64) -> PxScale {
            let size = size as f32;
            match self.font.units_per_em() {
                Some(upem) if upem > 0.0 => PxScale::from(size * self.font.height_unscaled() / upem),
                _ => PxScale::from(size),
            }
        }
    }

    impl TextMeasurer for GlyphMeasurer {
        fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
            let scaled = self.font.as_scaled(self.scale_for(font.size));
            let mut width = 0.0f32;
            let mut prev = None;
            for ch in text.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(p) = prev {
                    width += scaled.kern(p, id);
                }
                width += scaled.h_advance(id);
                prev = Some(id);
            }
            f64::from(width)
        }
    }
}
