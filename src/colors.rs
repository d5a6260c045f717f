//! Colour utilities: colour-spec detection, HCL blending for transitions, the
//! categorical series palette, and label contrast colours.
//!
//! HCL is the cylindrical form of CIE L\*a\*b\* (hue, chroma, lightness). Blending
//! there instead of in RGB keeps intermediate colours from going muddy.

use ahash::AHashMap;
use palette::{FromColor, LabHue, Lch, LinSrgb, Srgb};

/// d3 `schemeCategory10`, the default series palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", // blue
    "#ff7f0e", // orange
    "#2ca02c", // green
    "#d62728", // red
    "#9467bd", // purple
    "#8c564b", // brown
    "#e377c2", // pink
    "#7f7f7f", // gray
    "#bcbd22", // olive
    "#17becf", // cyan
];

/// Label colour on light backgrounds.
pub const DARK_LABEL: &str = "#444444";
/// Label colour on dark backgrounds.
pub const LIGHT_LABEL: &str = "#f7f7f7";

/// YIQ brightness at or above which a background counts as light.
const YIQ_LIGHT_THRESHOLD: f64 = 150.0;

/// Chroma below which a colour has no meaningful hue.
const ACHROMATIC_CHROMA: f32 = 1e-2;

/// Heuristic used by the interpolator: does this string look like a colour?
///
/// True for hex (`#...`) and the `hsl`, `rgb`, `lab`, `lch` function forms
/// (including their `a` variants such as `rgba(...)`).
pub fn is_color_spec(s: &str) -> bool {
    s.starts_with('#') || matches!(s.get(..3), Some("hsl" | "rgb" | "lab" | "lch"))
}

/// A colour decomposed into HCL. `hue` is `None` for achromatic colours;
/// `chroma` is also `None` for pure black/white so that the other endpoint's
/// chroma is borrowed, like d3 does.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hcl {
    hue: Option<f32>,
    chroma: Option<f32>,
    lightness: f32,
    opacity: f32,
}

impl Hcl {
    fn parse(spec: &str) -> Option<Self> {
        let parsed = csscolorparser::parse(spec).ok()?;
        let srgb: Srgb = Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32);
        let linear: LinSrgb = srgb.into_linear();
        let lch: Lch = Lch::from_color(linear);

        let (hue, chroma) = if lch.chroma < ACHROMATIC_CHROMA {
            let chroma = (lch.l > 0.0 && lch.l < 100.0).then_some(0.0);
            (None, chroma)
        } else {
            (Some(lch.hue.into_positive_degrees()), Some(lch.chroma))
        };

        Some(Hcl {
            hue,
            chroma,
            lightness: lch.l,
            opacity: parsed.a as f32,
        })
    }
}

/// Start value and delta for one channel; a missing side borrows the other.
fn channel(a: Option<f32>, b: Option<f32>) -> (f32, f32) {
    match (a, b) {
        (Some(a), Some(b)) => (a, b - a),
        (Some(a), None) => (a, 0.0),
        (None, Some(b)) => (b, 0.0),
        (None, None) => (0.0, 0.0),
    }
}

/// Like [`channel`] but takes the short way around the hue circle.
fn hue_channel(a: Option<f32>, b: Option<f32>) -> (f32, f32) {
    let (start, delta) = channel(a, b);
    if delta > 180.0 || delta < -180.0 {
        (start, delta - 360.0 * (delta / 360.0).round())
    } else {
        (start, delta)
    }
}

/// Precomputed two-colour blend in HCL space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HclInterpolator {
    hue: (f32, f32),
    chroma: (f32, f32),
    lightness: (f32, f32),
    opacity: (f32, f32),
}

impl HclInterpolator {
    /// Colour at progress `t` as a CSS `rgb(...)`/`rgba(...)` string.
    pub fn at(&self, t: f64) -> String {
        let t = t as f32;
        let lerp = |(start, delta): (f32, f32)| start + t * delta;

        let lch: Lch = Lch::new(
            lerp(self.lightness),
            lerp(self.chroma).max(0.0),
            LabHue::from_degrees(lerp(self.hue)),
        );
        let linear: LinSrgb = LinSrgb::from_color(lch);
        let srgb: Srgb = Srgb::from_linear(linear);
        let rgb: Srgb<u8> = srgb.into_format();
        css_rgb(rgb.red, rgb.green, rgb.blue, lerp(self.opacity))
    }
}

/// Blend two colour specs through HCL. Returns `None` when either side does
/// not parse as a colour.
pub fn interpolate_hcl(from: &str, to: &str) -> Option<HclInterpolator> {
    let a = Hcl::parse(from)?;
    let b = Hcl::parse(to)?;
    Some(HclInterpolator {
        hue: hue_channel(a.hue, b.hue),
        chroma: channel(a.chroma, b.chroma),
        lightness: channel(Some(a.lightness), Some(b.lightness)),
        opacity: channel(Some(a.opacity), Some(b.opacity)),
    })
}

fn css_rgb(r: u8, g: u8, b: u8, alpha: f32) -> String {
    let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
    if alpha >= 1.0 {
        format!("rgb({r}, {g}, {b})")
    } else {
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

/// Pick a readable label colour for text drawn on `bg_color`.
///
/// Uses YIQ brightness; unparsable backgrounds get the light label colour.
pub fn label_color(bg_color: &str) -> &'static str {
    let Ok(parsed) = csscolorparser::parse(bg_color) else {
        return LIGHT_LABEL;
    };
    let [r, g, b, _] = parsed.to_rgba8();
    let yiq = (f64::from(r) * 299.0 + f64::from(g) * 587.0 + f64::from(b) * 114.0) / 1000.0;
    if yiq >= YIQ_LIGHT_THRESHOLD {
        DARK_LABEL
    } else {
        LIGHT_LABEL
    }
}

/// Text plus its contrast colour, ready for a label element.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LabelProps {
    pub text: String,
    pub color: &'static str,
}

pub fn label_props(text: &str, bg_color: &str) -> LabelProps {
    LabelProps {
        text: text.to_string(),
        color: label_color(bg_color),
    }
}

/// Ordinal colour scale with an implicit domain: unseen keys are appended in
/// first-seen order and the palette cycles.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    range: Vec<String>,
    domain: AHashMap<String, usize>,
}

impl OrdinalScale {
    pub fn new<S: Into<String>>(range: impl IntoIterator<Item = S>) -> Self {
        Self {
            range: range.into_iter().map(Into::into).collect(),
            domain: AHashMap::new(),
        }
    }

    /// The default dimension colour scale.
    pub fn category10() -> Self {
        Self::new(CATEGORY10)
    }

    /// Colour for `key`, registering it if unseen.
    pub fn get(&mut self, key: &str) -> &str {
        if self.range.is_empty() {
            return "";
        }
        let next = self.domain.len();
        let idx = *self.domain.entry(key.to_string()).or_insert(next);
        &self.range[idx % self.range.len()]
    }

    /// Colour for a series position (keys are the decimal index).
    pub fn color_for_index(&mut self, index: usize) -> String {
        self.get(&index.to_string()).to_string()
    }

    /// Number of keys seen so far.
    pub fn domain_len(&self) -> usize {
        self.domain.len()
    }
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::category10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_color_specs() {
        assert!(is_color_spec("#fff"));
        assert!(is_color_spec("rgb(1, 2, 3)"));
        assert!(is_color_spec("rgba(1, 2, 3, 0.5)"));
        assert!(is_color_spec("hsl(120, 50%, 50%)"));
        assert!(is_color_spec("lab(50 20 30)"));
        assert!(is_color_spec("lch(50 20 30)"));
        assert!(!is_color_spec("red"));
        assert!(!is_color_spec("ab"));
        assert!(!is_color_spec(""));
    }

    #[test]
    fn hue_takes_short_path() {
        let (start, delta) = hue_channel(Some(350.0), Some(10.0));
        assert_eq!(start, 350.0);
        assert!((delta - 20.0).abs() < 1e-4);
        let (_, delta) = hue_channel(Some(10.0), Some(350.0));
        assert!((delta + 20.0).abs() < 1e-4);
    }

    #[test]
    fn achromatic_endpoint_borrows_hue() {
        let (start, delta) = hue_channel(None, Some(120.0));
        assert_eq!((start, delta), (120.0, 0.0));
    }

    #[test]
    fn endpoints_round_trip() {
        let interp = interpolate_hcl("#ff0000", "#0000ff").unwrap();
        assert_eq!(interp.at(0.0), "rgb(255, 0, 0)");
        assert_eq!(interp.at(1.0), "rgb(0, 0, 255)");
    }

    #[test]
    fn grey_to_grey_stays_grey() {
        let interp = interpolate_hcl("#000000", "#ffffff").unwrap();
        let mid = interp.at(0.5);
        let inner = mid.trim_start_matches("rgb(").trim_end_matches(')');
        let parts: Vec<i32> = inner.split(", ").map(|p| p.parse().unwrap()).collect();
        assert!((parts[0] - parts[1]).abs() <= 1 && (parts[1] - parts[2]).abs() <= 1);
    }

    #[test]
    fn alpha_is_blended() {
        let interp = interpolate_hcl("rgba(255, 0, 0, 0)", "rgba(255, 0, 0, 1)").unwrap();
        assert_eq!(interp.at(0.5), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn label_color_thresholds() {
        assert_eq!(label_color("#ffffff"), DARK_LABEL);
        assert_eq!(label_color("#000000"), LIGHT_LABEL);
        assert_eq!(label_color("#1f77b4"), LIGHT_LABEL);
        assert_eq!(label_color("not a colour"), LIGHT_LABEL);
    }

    #[test]
    fn ordinal_scale_cycles_and_remembers() {
        let mut scale = OrdinalScale::new(["a", "b"]);
        assert_eq!(scale.get("x"), "a");
        assert_eq!(scale.get("y"), "b");
        assert_eq!(scale.get("z"), "a");
        assert_eq!(scale.get("x"), "a");
        assert_eq!(scale.domain_len(), 3);
    }
}
