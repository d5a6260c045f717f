//! chartkit
//!
//! The numeric core of a dashboard charting toolkit: smooth transitions
//! between chart states and text labels that fit their boxes. Pairs with the
//! `chartkit` CLI.
//!
//! ### Features
//! - Interpolate arbitrary JSON-like values (numbers, colours in HCL, dates,
//!   nested arrays and objects) and drive them over time with [`Tween`]
//! - Fit a label into a box: largest font size, up to three wrapped lines,
//!   ellipsis when nothing else works
//! - Accessors, label/value domains and stacking for data rows
//! - Dimension descriptors, legend/title padding, locale number formatting
//!
//! ### Example
//! ```
//! use chartkit::{build_interpolator, layout_label, HeuristicMeasurer, LabelOptions, Value};
//!
//! let interp = build_interpolator(&Value::from(vec![1.0, 2.0]), &Value::from(vec![1.0, 2.0, 3.0]))?;
//! assert_eq!(interp.at(0.0), Value::from(vec![1.0, 2.0, 0.0]));
//!
//! let layout = layout_label(&LabelOptions::new("Weekly active users", 120.0, 50.0), &HeuristicMeasurer::default());
//! assert!(!layout.lines.is_empty() && layout.lines.len() <= 3);
//! # Ok::<(), chartkit::InterpolateError>(())
//! ```

pub mod colors;
pub mod coords;
pub mod data;
pub mod dimensions;
pub mod error;
pub mod format;
pub mod interpolate;
pub mod labels;

pub use data::{Accessor, create_accessor, make_label_domain, make_value_domain};
pub use error::InterpolateError;
pub use interpolate::{Interpolator, Tween, Value, build_interpolator};
pub use labels::text::{HeuristicMeasurer, TextMeasurer};
pub use labels::{LabelLayout, LabelOptions, layout_label};
