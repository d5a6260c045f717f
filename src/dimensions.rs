//! Chart dimension descriptors and chart-level layout options.
//!
//! A dimension is a named channel (value, colour, label) read from data rows
//! through [`Accessor`]s. The option types (`Axis`, `Padding`, `TitleOptions`,
//! `LegendOptions`) deserialize from the JSON configuration of a chart.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::colors::OrdinalScale;
use crate::data::{Accessor, label_key};
use crate::format::format_number;
use crate::interpolate::Value;

/// Fields shared by every dimension.
#[derive(Debug, Clone)]
pub struct BaseDimension {
    /// Printable name.
    pub name: Accessor,
    /// Colour to render this dimension with.
    pub color: Option<Accessor>,
    /// Legend colour when `color` depends on the row.
    pub base_color: Option<String>,
    /// Legend name when `name` depends on the row.
    pub base_name: Option<String>,
}

impl BaseDimension {
    pub fn new(name: impl Into<Accessor>) -> Self {
        Self {
            name: name.into(),
            color: None,
            base_color: None,
            base_name: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<Accessor>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_base_color(mut self, color: impl Into<String>) -> Self {
        self.base_color = Some(color.into());
        self
    }

    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }
}

/// Access to the shared part of any dimension type.
pub trait ChartDimension: Clone {
    fn base(&self) -> &BaseDimension;
    fn base_mut(&mut self) -> &mut BaseDimension;

    fn name(&self, row: &JsonValue, index: usize) -> String {
        label_key(&self.base().name.get(row, index))
    }

    fn color(&self, row: &JsonValue, index: usize) -> Option<String> {
        self.base()
            .color
            .as_ref()
            .map(|c| label_key(&c.get(row, index)))
    }

    /// Name for the legend: `base_name`, else a constant name.
    fn legend_name(&self) -> Option<String> {
        let base = self.base();
        base.base_name
            .clone()
            .or_else(|| base.name.as_constant().map(label_key))
    }

    /// Colour for the legend: `base_color`, else a constant colour.
    fn legend_color(&self) -> Option<String> {
        let base = self.base();
        base.base_color.clone().or_else(|| {
            base.color
                .as_ref()
                .and_then(Accessor::as_constant)
                .map(label_key)
        })
    }
}

impl ChartDimension for BaseDimension {
    fn base(&self) -> &BaseDimension {
        self
    }

    fn base_mut(&mut self) -> &mut BaseDimension {
        self
    }
}

macro_rules! impl_chart_dimension {
    ($ty:ty => $($field:ident).+) => {
        impl ChartDimension for $ty {
            fn base(&self) -> &BaseDimension {
                &self.$($field).+
            }

            fn base_mut(&mut self) -> &mut BaseDimension {
                &mut self.$($field).+
            }
        }
    };
}

/// A dimension with one value per row (bars, pie slices, tree map cells).
#[derive(Debug, Clone)]
pub struct SingleValuedDimension {
    pub base: BaseDimension,
    pub value: Accessor,
    /// How to print the value; defaults to locale number formatting.
    pub format_value: Option<Accessor>,
}

impl SingleValuedDimension {
    pub fn new(name: impl Into<Accessor>, value: impl Into<Accessor>) -> Self {
        Self {
            base: BaseDimension::new(name),
            value: value.into(),
            format_value: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<Accessor>) -> Self {
        self.base.color = Some(color.into());
        self
    }

    pub fn with_format_value(mut self, format: impl Into<Accessor>) -> Self {
        self.format_value = Some(format.into());
        self
    }

    /// Printable value for `row`.
    pub fn formatted_value(&self, row: &JsonValue, index: usize, locale: &str) -> String {
        if let Some(format) = &self.format_value {
            return label_key(&format.get(row, index));
        }
        match self.value.get(row, index) {
            JsonValue::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |v| format_number(v, locale)),
            other => label_key(&other),
        }
    }

    /// `{name, color, value}` for `row`, the shape a renderer animates
    /// between data updates.
    pub fn datum(&self, row: &JsonValue, index: usize) -> Value {
        Value::object([
            ("name", Value::from(self.name(row, index))),
            ("color", Value::from(self.color(row, index))),
            ("value", Value::from(self.value.get(row, index))),
        ])
    }
}

impl_chart_dimension!(SingleValuedDimension => base);

pub type BarDimension = SingleValuedDimension;
pub type TreeMapDimension = SingleValuedDimension;

/// A dimension with an x and a y per row.
#[derive(Debug, Clone)]
pub struct TwoValuedDimension {
    pub base: BaseDimension,
    pub x: Accessor,
    pub format_x: Option<Accessor>,
    pub y: Accessor,
    pub format_y: Option<Accessor>,
}

impl TwoValuedDimension {
    pub fn new(name: impl Into<Accessor>, x: impl Into<Accessor>, y: impl Into<Accessor>) -> Self {
        Self {
            base: BaseDimension::new(name),
            x: x.into(),
            format_x: None,
            y: y.into(),
            format_y: None,
        }
    }
}

impl_chart_dimension!(TwoValuedDimension => base);

#[derive(Debug, Clone)]
pub struct LineDimension {
    pub values: TwoValuedDimension,
    pub width: Option<Accessor>,
    pub opacity: Option<Accessor>,
    pub highlight_width: Option<Accessor>,
    pub highlight_opacity: Option<Accessor>,
}

impl LineDimension {
    pub fn new(name: impl Into<Accessor>, x: impl Into<Accessor>, y: impl Into<Accessor>) -> Self {
        Self {
            values: TwoValuedDimension::new(name, x, y),
            width: None,
            opacity: None,
            highlight_width: None,
            highlight_opacity: None,
        }
    }
}

impl_chart_dimension!(LineDimension => values.base);

/// Default colour of the line around pie slices.
pub const DEFAULT_PIE_STROKE: &str = "black";

#[derive(Debug, Clone)]
pub struct PieDimension {
    pub slice: SingleValuedDimension,
    /// Width of the line around each slice; 0 draws none.
    pub stroke_width: f64,
    pub stroke: String,
    pub sort_by_name: bool,
    /// Start angle in radians, if not the entire circle.
    pub start_angle: Option<f64>,
    pub end_angle: Option<f64>,
    /// Padding in radians around each slice.
    pub pad_angle: Option<f64>,
    /// Fraction of the radius where the arc starts, 0 to 1.
    pub inner_radius: Option<f64>,
    pub outer_radius: Option<f64>,
}

impl PieDimension {
    pub fn new(name: impl Into<Accessor>, value: impl Into<Accessor>) -> Self {
        Self {
            slice: SingleValuedDimension::new(name, value),
            stroke_width: 0.0,
            stroke: DEFAULT_PIE_STROKE.to_string(),
            sort_by_name: false,
            start_angle: None,
            end_angle: None,
            pad_angle: None,
            inner_radius: None,
            outer_radius: None,
        }
    }

    pub fn with_stroke(mut self, width: f64, color: impl Into<String>) -> Self {
        self.stroke_width = width;
        self.stroke = color.into();
        self
    }

    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = Some(start);
        self.end_angle = Some(end);
        self
    }

    pub fn with_radii(mut self, inner: f64, outer: f64) -> Self {
        self.inner_radius = Some(inner.clamp(0.0, 1.0));
        self.outer_radius = Some(outer.clamp(0.0, 1.0));
        self
    }
}

impl_chart_dimension!(PieDimension => slice.base);

/// Explicit tick values or a tick count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ticks {
    Count(usize),
    Values(Vec<JsonValue>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<Ticks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_tick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_tick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dx_tick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dy_tick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<String>,
    pub gridlines: bool,
    pub baseline: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisXOptions {
    #[serde(flatten)]
    pub axis: Axis,
    pub snap_ticks: bool,
}

pub type AxisYOptions = Axis;

/// Partial padding; unset sides fall back to whatever it is merged onto.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
}

impl Padding {
    pub fn uniform(all: f64) -> Self {
        Self {
            top: Some(all),
            bottom: Some(all),
            left: Some(all),
            right: Some(all),
        }
    }

    /// Sides set in `other` replace ours.
    pub fn merged(self, other: &Padding) -> Self {
        Self {
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            left: other.left.or(self.left),
            right: other.right.or(self.right),
        }
    }

    /// Mutable side, initialised to zero when unset.
    pub fn side_mut(&mut self, side: Position) -> &mut f64 {
        let slot = match side {
            Position::Top => &mut self.top,
            Position::Bottom => &mut self.bottom,
            Position::Left => &mut self.left,
            Position::Right => &mut self.right,
        };
        slot.get_or_insert(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitlePosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleOptions {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<TitlePosition>,
}

/// A chart title: bare text, or text with options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Text(String),
    Options(TitleOptions),
}

impl Title {
    pub fn text(&self) -> &str {
        match self {
            Title::Text(text) => text,
            Title::Options(o) => &o.text,
        }
    }

    pub fn position(&self) -> TitlePosition {
        match self {
            Title::Text(_) => TitlePosition::default(),
            Title::Options(o) => o.position.unwrap_or_default(),
        }
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
}

impl LegendOptions {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            width: None,
            height: None,
            columns: None,
        }
    }
}

/// Dimensions supplied through a chart's shared context.
#[derive(Debug, Clone)]
pub struct CustomDimensions<D> {
    pub dimensions: Option<Vec<D>>,
    pub dimension: Option<D>,
}

impl<D> Default for CustomDimensions<D> {
    fn default() -> Self {
        Self {
            dimensions: None,
            dimension: None,
        }
    }
}

/// The chart's own dimensions, else the context's list, else its single
/// dimension. Empty when none are given.
pub fn get_dimensions<D: Clone>(dimensions: Option<&[D]>, custom: Option<&CustomDimensions<D>>) -> Vec<D> {
    if let Some(dims) = dimensions {
        return dims.to_vec();
    }
    let Some(custom) = custom else {
        return Vec::new();
    };
    match (&custom.dimensions, &custom.dimension) {
        (Some(dims), _) => dims.clone(),
        (None, Some(dim)) => vec![dim.clone()],
        (None, None) => Vec::new(),
    }
}

/// Fill in a missing colour from `color_scale` by series position. An
/// existing colour is kept, reading through `row.data` when `nested`.
pub fn default_dimension_values<D: ChartDimension>(
    dimension: &D,
    index: usize,
    color_scale: &mut OrdinalScale,
    nested: bool,
) -> D {
    let mut out = dimension.clone();
    let base = out.base_mut();
    base.color = match base.color.take() {
        Some(color) if nested => Some(color.nested()),
        Some(color) => Some(color),
        None => Some(Accessor::constant(color_scale.color_for_index(index))),
    };
    out
}
