//! Deep-structural interpolation for chart transitions.
//!
//! [`build_interpolator`] walks two values of matching shape once and returns an
//! [`Interpolator`]: an owned tree of small nodes mirroring the target's shape,
//! each holding its precomputed start/delta. Evaluating it at a progress `t`
//! is a depth-first walk that cannot fail.
//!
//! | pair | behaviour |
//! |---|---|
//! | equal values, or `a` is NaN | constant `a` |
//! | `undefined` -> anything | constant `b` (a value that just appeared) |
//! | numbers | `a + t * (b - a)` |
//! | colour strings | blended in HCL |
//! | other strings, booleans | jump to `b` |
//! | dates | epoch milliseconds, linearly |
//! | arrays | per index; new numeric elements grow from 0 |
//! | objects | per key of `b`; keys only in `a` are dropped |

pub mod tween;
pub mod value;

pub use tween::{Easing, Tween, TweenConfig, TweenOptions};
pub use value::Value;

use chrono::DateTime;
use log::{trace, warn};
use std::fmt::Write as _;

use crate::colors::{HclInterpolator, interpolate_hcl, is_color_spec};
use crate::error::InterpolateError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Constant(Value),
    Number { from: f64, delta: f64 },
    Date { from_ms: f64, delta_ms: f64 },
    Color(HclInterpolator),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    fn eval(&self, t: f64) -> Value {
        match self {
            Node::Constant(v) => v.clone(),
            Node::Number { from, delta } => Value::Number(from + t * delta),
            Node::Date { from_ms, delta_ms } => {
                let ms = (from_ms + t * delta_ms).trunc() as i64;
                DateTime::from_timestamp_millis(ms).map_or(Value::Null, Value::Date)
            }
            Node::Color(c) => Value::String(c.at(t)),
            Node::Array(nodes) => Value::Array(nodes.iter().map(|n| n.eval(t)).collect()),
            Node::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, n)| (k.clone(), n.eval(t)))
                    .collect(),
            ),
        }
    }
}

/// A built interpolation between two values. Cheap to evaluate, `Send + Sync`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    root: Node,
}

impl Interpolator {
    /// Value at progress `t` (normally `0.0..=1.0`; values outside extrapolate).
    pub fn at(&self, t: f64) -> Value {
        self.root.eval(t)
    }

    /// `steps` evenly spaced samples from `t = 0` to `t = 1` inclusive.
    pub fn samples(&self, steps: usize) -> Vec<Value> {
        match steps {
            0 => Vec::new(),
            1 => vec![self.at(1.0)],
            n => (0..n)
                .map(|i| self.at(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// True when every `t` yields the same value.
    pub fn is_constant(&self) -> bool {
        matches!(self.root, Node::Constant(_))
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of the node being built, rendered only when an error occurs.
#[derive(Debug, Default)]
struct NodePath(Vec<Segment>);

impl NodePath {
    fn render(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.0 {
            let _ = match seg {
                Segment::Key(k) => write!(out, ".{k}"),
                Segment::Index(i) => write!(out, "[{i}]"),
            };
        }
        out
    }

    fn nested<T>(&mut self, seg: Segment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.0.push(seg);
        let out = f(self);
        self.0.pop();
        out
    }
}

/// Build an interpolator from `a` (at `t = 0`) to `b` (at `t = 1`).
///
/// Fails when the shapes do not line up: different types at the same position
/// (unless `a` is [`Value::Undefined`]), or an object paired with `null`.
///
/// ```
/// use chartkit::interpolate::{build_interpolator, Value};
///
/// let from = Value::object([("x", Value::from(1.0)), ("label", "a".into())]);
/// let to = Value::object([("x", Value::from(5.0)), ("label", "b".into())]);
/// let interp = build_interpolator(&from, &to)?;
/// assert_eq!(
///     interp.at(0.5),
///     Value::object([("x", Value::from(3.0)), ("label", "b".into())])
/// );
/// # Ok::<(), chartkit::InterpolateError>(())
/// ```
pub fn build_interpolator(a: &Value, b: &Value) -> Result<Interpolator, InterpolateError> {
    let root = build_node(a, b, &mut NodePath::default())?;
    trace!("built interpolator {} -> {}", a.kind(), b.kind());
    Ok(Interpolator { root })
}

fn build_node(a: &Value, b: &Value, path: &mut NodePath) -> Result<Node, InterpolateError> {
    if a == b || a.is_nan() {
        return Ok(Node::Constant(a.clone()));
    }

    let node = match (a, b) {
        (Value::Undefined, _) => Node::Constant(b.clone()),
        (Value::Number(from), Value::Number(to)) => Node::Number {
            from: *from,
            delta: to - from,
        },
        (Value::String(from), Value::String(to)) => string_node(from, to),
        (Value::Bool(_), Value::Bool(_)) => Node::Constant(b.clone()),
        (Value::Array(from), Value::Array(to)) => Node::Array(
            to.iter()
                .enumerate()
                .map(|(i, item)| match from.get(i) {
                    Some(prev) => path.nested(Segment::Index(i), |p| build_node(prev, item, p)),
                    None => Ok(appearing_node(item)),
                })
                .collect::<Result<_, _>>()?,
        ),
        (Value::Null, Value::Object(_) | Value::Date(_))
        | (Value::Object(_) | Value::Date(_), Value::Null) => {
            return Err(InterpolateError::NullObject {
                path: path.render(),
            });
        }
        (Value::Date(from), Value::Date(to)) => {
            let from_ms = from.timestamp_millis() as f64;
            Node::Date {
                from_ms,
                delta_ms: to.timestamp_millis() as f64 - from_ms,
            }
        }
        (Value::Object(from), Value::Object(to)) => Node::Object(
            to.iter()
                .map(|(key, item)| {
                    let prev = from.get(key).unwrap_or(&Value::Undefined);
                    path.nested(Segment::Key(key.clone()), |p| build_node(prev, item, p))
                        .map(|node| (key.clone(), node))
                })
                .collect::<Result<_, _>>()?,
        ),
        _ => {
            return Err(InterpolateError::TypeMismatch {
                path: path.render(),
                from: a.kind(),
                to: b.kind(),
            });
        }
    };
    Ok(node)
}

/// An array element with no previous value: numbers grow from zero.
fn appearing_node(item: &Value) -> Node {
    match item {
        Value::Number(to) => Node::Number {
            from: 0.0,
            delta: *to,
        },
        other => Node::Constant(other.clone()),
    }
}

fn string_node(from: &str, to: &str) -> Node {
    if !is_color_spec(from) {
        return Node::Constant(Value::String(to.to_string()));
    }
    match interpolate_hcl(from, to) {
        Some(color) => Node::Color(color),
        None => {
            warn!("unparsable colour pair {from:?} -> {to:?}; jumping to target");
            Node::Constant(Value::String(to.to_string()))
        }
    }
}
