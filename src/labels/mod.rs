//! Adaptive label layout: fit a text into a fixed box.
//!
//! [`layout_label`] picks the largest font size (between [`FONT_MIN`] and the
//! configured maximum) at which the text wraps into at most [`MAX_LINES`]
//! lines inside the box, then positions each line according to the
//! alignment. It never fails: text that cannot fit even at the minimum size
//! is cut and ends in `…`.
//!
//! Sizing runs in two steps. A closed-form area estimate at the maximum size
//! gives a first candidate; a bounded shrink loop then wraps at the candidate
//! and steps down one pixel at a time until the text fits.

pub mod text;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use text::{DEFAULT_FONT_FAMILY, ELLIPSIS, FontSpec, TextMeasurer, WrapResult, ellipsize};

/// Smallest font size the layout will shrink to.
pub const FONT_MIN: f64 = 8.0;
pub const DEFAULT_MAX_FONT_SIZE: f64 = 30.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
/// Line height as a multiple of font size.
pub const DEFAULT_LINE_HEIGHT_RATIO: f64 = 1.2;
/// Labels never wrap past this many lines.
pub const MAX_LINES: usize = 3;

/// Initial candidate is capped at this fraction of the box height.
const HEIGHT_CAP: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorzAlign {
    #[default]
    Left,
    Center,
    Right,
}

fn default_max_font_size() -> f64 {
    DEFAULT_MAX_FONT_SIZE
}

fn default_font_weight() -> u16 {
    DEFAULT_FONT_WEIGHT
}

fn default_line_height() -> f64 {
    DEFAULT_LINE_HEIGHT_RATIO
}

/// What to lay out and where. Deserialises from camelCase JSON; everything
/// but `text`, `width` and `height` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelOptions {
    pub text: String,
    pub width: f64,
    pub height: f64,
    /// Use exactly this size (clamped to the allowed range) instead of searching.
    #[serde(default)]
    pub fixed_font_size: Option<f64>,
    #[serde(default = "default_max_font_size")]
    pub max_font_size: f64,
    /// Defaults to [`DEFAULT_FONT_FAMILY`].
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
    /// Ratio of line height to font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub vert_align: VertAlign,
    #[serde(default)]
    pub horz_align: HorzAlign,
}

impl LabelOptions {
    pub fn new(text: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            width,
            height,
            fixed_font_size: None,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            font_family: None,
            font_weight: DEFAULT_FONT_WEIGHT,
            line_height: DEFAULT_LINE_HEIGHT_RATIO,
            vert_align: VertAlign::default(),
            horz_align: HorzAlign::default(),
        }
    }

    pub fn with_fixed_font_size(mut self, size: f64) -> Self {
        self.fixed_font_size = Some(size);
        self
    }

    pub fn with_max_font_size(mut self, size: f64) -> Self {
        self.max_font_size = size;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, weight: u16) -> Self {
        self.font_family = Some(family.into());
        self.font_weight = weight;
        self
    }

    pub fn with_line_height(mut self, ratio: f64) -> Self {
        self.line_height = ratio;
        self
    }

    pub fn with_align(mut self, vert: VertAlign, horz: HorzAlign) -> Self {
        self.vert_align = vert;
        self.horz_align = horz;
        self
    }

    fn font_max(&self) -> f64 {
        self.max_font_size.max(FONT_MIN)
    }

    fn base_font(&self) -> FontSpec {
        let size = self.font_max();
        FontSpec::new(
            self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
            size,
            self.font_weight,
            size * self.line_height,
        )
    }
}

/// One positioned line. `y` is the baseline offset from the top of the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub text: String,
    pub width: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub size: f64,
    pub weight: u16,
    pub line_height: f64,
    pub font_height: f64,
    pub lines: Vec<LabelLine>,
}

/// Result of the sizing phase, before positioning.
#[derive(Debug)]
struct Fitted {
    size: f64,
    lines: Vec<(String, f64)>,
}

fn clamp_font(size: f64, font_max: f64) -> f64 {
    if size.is_nan() {
        font_max
    } else {
        size.clamp(FONT_MIN, font_max)
    }
}

/// Lay out `options.text` inside its box.
///
/// ```
/// use chartkit::labels::{layout_label, LabelOptions, text::HeuristicMeasurer};
///
/// let layout = layout_label(&LabelOptions::new("Revenue", 200.0, 60.0), &HeuristicMeasurer::default());
/// assert_eq!(layout.lines.len(), 1);
/// assert!(layout.size <= 30.0);
/// ```
pub fn layout_label(options: &LabelOptions, measurer: &dyn TextMeasurer) -> LabelLayout {
    let fitted = match options.fixed_font_size {
        Some(fixed) => fit_fixed(options, fixed, measurer),
        None => fit_auto(options, measurer),
    };
    debug!(
        "label {:?} in {}x{}: size {} with {} line(s)",
        options.text,
        options.width,
        options.height,
        fitted.size,
        fitted.lines.len()
    );
    position(options, fitted)
}

fn fit_fixed(options: &LabelOptions, fixed: f64, measurer: &dyn TextMeasurer) -> Fitted {
    let size = clamp_font(fixed, options.font_max());
    let font = options.base_font().resized(size, options.line_height);

    if !(options.width > FONT_MIN && options.height > font.line_height) {
        return Fitted {
            size,
            lines: Vec::new(),
        };
    }

    let wrapped = measurer.wrap(&options.text, &font, MAX_LINES, options.width, options.height);
    Fitted {
        size,
        lines: settle_lines(wrapped, &font, options.width, measurer),
    }
}

fn fit_auto(options: &LabelOptions, measurer: &dyn TextMeasurer) -> Fitted {
    let font_max = options.font_max();
    let (width, height) = (options.width, options.height);

    if !(width > FONT_MIN && height > FONT_MIN * options.line_height) {
        return Fitted {
            size: font_max,
            lines: Vec::new(),
        };
    }

    let base = options.base_font();
    let mut size = clamp_font(estimate_size(options, &base, measurer), font_max);

    // Each step lowers the size by one pixel (the last step may land exactly
    // on FONT_MIN), so this bounds the loop.
    let max_iterations = ((size - FONT_MIN).ceil() as usize).saturating_add(1);
    let mut font = base.resized(size, options.line_height);
    let mut wrapped = WrapResult::default();

    for iteration in 0..max_iterations {
        font = base.resized(size, options.line_height);
        wrapped = measurer.wrap(&options.text, &font, MAX_LINES, width, height);
        trace!(
            "iteration {iteration}: size {size}, {} line(s), truncated={}",
            wrapped.lines.len(),
            wrapped.truncated
        );
        if !wrapped.truncated {
            break;
        }
        let next = (size - 1.0).max(FONT_MIN);
        if next >= size {
            break;
        }
        size = next;
    }

    Fitted {
        size,
        lines: settle_lines(wrapped, &font, width, measurer),
    }
}

/// Closed-form first guess: shrink the maximum size by how badly the text
/// overflows the box in area or in its longest word, then cap by box height.
fn estimate_size(options: &LabelOptions, base: &FontSpec, measurer: &dyn TextMeasurer) -> f64 {
    let (width, height) = (options.width, options.height);
    let mut size = base.size;

    let words = measurer.split_words(&options.text);
    if !words.is_empty() {
        let sizes = measurer.measure_widths(&words, base);
        let area_mod = 1.165 + (width / height) * 0.1;
        let box_area = width * height;
        let max_width = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // The first word counts by width alone; the rest by width times line height.
        let text_area = (sizes[0] + sizes[1..].iter().map(|w| w * base.line_height).sum::<f64>())
            * area_mod;

        if max_width > width || text_area > box_area {
            let area_ratio = (box_area / text_area).sqrt();
            let width_ratio = width / max_width;
            size = (size * area_ratio.min(width_ratio)).floor();
        }
    }

    size.min((height * HEIGHT_CAP).floor())
}

/// Drop empty lines and, when the wrap was cut short, end the last line
/// with an ellipsis. Nothing fitting at all leaves a lone `…`.
fn settle_lines(
    wrapped: WrapResult,
    font: &FontSpec,
    width: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<(String, f64)> {
    let mut lines: Vec<(String, f64)> = wrapped
        .lines
        .into_iter()
        .zip(wrapped.widths)
        .filter(|(line, _)| !line.is_empty())
        .collect();

    if wrapped.truncated {
        match lines.last_mut() {
            Some(last) => {
                let cut = ellipsize(&last.0, font, width, measurer);
                let cut_width = measurer.measure_width(&cut, font);
                *last = (cut, cut_width);
            }
            None => {
                let mark = ELLIPSIS.to_string();
                let mark_width = measurer.measure_width(&mark, font);
                lines.push((mark, mark_width));
            }
        }
    }
    lines
}

fn position(options: &LabelOptions, fitted: Fitted) -> LabelLayout {
    let Fitted { size, lines } = fitted;
    let line_height = size * options.line_height;
    let font_height = size;
    let (width, height) = (options.width, options.height);

    let x = |line_width: f64| match options.horz_align {
        HorzAlign::Left => 0.0,
        HorzAlign::Center => (width - line_width) / 2.0,
        HorzAlign::Right => width - line_width,
    };

    let total_height = lines.len() as f64 * line_height + font_height;
    let middle_base = (height - total_height + font_height) / 2.0;
    // Bottom stacks upward from the box edge and, unlike top/middle, adds no
    // font height.
    let y = |i: usize| {
        let offset = line_height * i as f64;
        match options.vert_align {
            VertAlign::Top => offset + font_height,
            VertAlign::Middle => middle_base + offset + font_height,
            VertAlign::Bottom => height - offset,
        }
    };

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, (text, line_width))| LabelLine {
            x: x(line_width),
            y: y(i),
            width: line_width,
            text,
        })
        .collect();

    LabelLayout {
        size,
        weight: options.font_weight,
        line_height,
        font_height,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text::HeuristicMeasurer;

    #[test]
    fn options_from_json_use_defaults() {
        let o: LabelOptions =
            serde_json::from_str(r#"{"text": "a", "width": 10, "height": 20, "horzAlign": "center"}"#)
                .unwrap();
        assert_eq!(o.max_font_size, DEFAULT_MAX_FONT_SIZE);
        assert_eq!(o.font_weight, DEFAULT_FONT_WEIGHT);
        assert_eq!(o.line_height, DEFAULT_LINE_HEIGHT_RATIO);
        assert_eq!(o.vert_align, VertAlign::Top);
        assert_eq!(o.horz_align, HorzAlign::Center);
        assert_eq!(o.fixed_font_size, None);
    }

    #[test]
    fn estimate_shrinks_for_long_words() {
        let m = HeuristicMeasurer::default();
        let o = LabelOptions::new("Supercalifragilistic", 100.0, 100.0);
        // Longest word is 360px at 30px; 100/360 of 30 floors to 8.
        assert_eq!(estimate_size(&o, &o.base_font(), &m), 8.0);
    }

    #[test]
    fn estimate_weights_first_word_by_width_only() {
        let m = HeuristicMeasurer::default();
        // Widths 126 and 108 at 30px, line height 36: (126 + 108 * 36) * 1.665
        // is 6683, under the 8000 box, so the estimate stays at 30.
        let o = LabelOptions::new("Revenue growth", 200.0, 40.0);
        assert_eq!(estimate_size(&o, &o.base_font(), &m), 30.0);
    }

    #[test]
    fn estimate_caps_at_box_height() {
        let m = HeuristicMeasurer::default();
        let o = LabelOptions::new("a", 500.0, 20.0);
        assert_eq!(estimate_size(&o, &o.base_font(), &m), 16.0);
    }

    #[test]
    fn fractional_max_reaches_minimum() {
        let m = HeuristicMeasurer::default();
        let o = LabelOptions::new("Supercalifragilistic", 30.0, 30.0).with_max_font_size(9.5);
        let fitted = fit_auto(&o, &m);
        assert_eq!(fitted.size, FONT_MIN);
    }

    #[test]
    fn unbounded_max_font_size_terminates() {
        let m = HeuristicMeasurer::default();
        for max in [1e20, f64::INFINITY] {
            let o = LabelOptions::new("a", 100.0, 100.0).with_max_font_size(max);
            let fitted = fit_auto(&o, &m);
            assert_eq!(fitted.size, 80.0, "{max}");
        }
    }
}
