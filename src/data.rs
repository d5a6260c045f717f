//! Accessors and domains: how chart dimensions pull values out of raw rows.
//!
//! Rows are JSON values (typically objects straight from the API). An
//! [`Accessor`] is either a dotted field path (`"stats.total"`, `"items.0"`),
//! a function of the row and its index, or a constant.

use ahash::AHashSet;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// A materialised accessor: row and row index to value.
pub type AccessorFn = Arc<dyn Fn(&JsonValue, usize) -> JsonValue + Send + Sync>;
/// Post-processing applied to an accessor's output.
pub type ValueMap = Arc<dyn Fn(JsonValue) -> JsonValue + Send + Sync>;

#[derive(Clone)]
enum AccessorKind {
    Path(String),
    Func(AccessorFn),
    Constant(JsonValue),
}

/// Where a dimension reads its value from.
#[derive(Clone)]
pub struct Accessor {
    kind: AccessorKind,
    /// Read from the row's `data` field instead of the row itself (rows
    /// produced by stacking/layout wrap the original row there).
    nested: bool,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Accessor");
        match &self.kind {
            AccessorKind::Path(p) => d.field("path", p),
            AccessorKind::Func(_) => d.field("func", &"<fn>"),
            AccessorKind::Constant(v) => d.field("constant", v),
        };
        d.field("nested", &self.nested).finish()
    }
}

impl Accessor {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            kind: AccessorKind::Path(path.into()),
            nested: false,
        }
    }

    pub fn func(f: impl Fn(&JsonValue, usize) -> JsonValue + Send + Sync + 'static) -> Self {
        Self {
            kind: AccessorKind::Func(Arc::new(f)),
            nested: false,
        }
    }

    pub fn constant(value: impl Into<JsonValue>) -> Self {
        Self {
            kind: AccessorKind::Constant(value.into()),
            nested: false,
        }
    }

    /// The same accessor reading through `row.data`. Nesting an already
    /// nested accessor is a no-op.
    pub fn nested(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            nested: true,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// The field path, if this is a path accessor.
    pub fn as_path(&self) -> Option<&str> {
        match &self.kind {
            AccessorKind::Path(p) => Some(p),
            _ => None,
        }
    }

    /// The fixed value, if this is a constant accessor.
    pub fn as_constant(&self) -> Option<&JsonValue> {
        match &self.kind {
            AccessorKind::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Read the value for `row`; missing fields give `null`.
    pub fn get(&self, row: &JsonValue, index: usize) -> JsonValue {
        let row = if self.nested {
            row.get("data").unwrap_or(&JsonValue::Null)
        } else {
            row
        };
        match &self.kind {
            AccessorKind::Path(p) => get_value(row, p).cloned().unwrap_or(JsonValue::Null),
            AccessorKind::Func(f) => f(row, index),
            AccessorKind::Constant(v) => v.clone(),
        }
    }
}

impl From<&str> for Accessor {
    fn from(path: &str) -> Self {
        Accessor::path(path)
    }
}

impl From<String> for Accessor {
    fn from(path: String) -> Self {
        Accessor::path(path)
    }
}

/// The `select`ed accessor of every dimension, reading through `row.data`.
pub fn nested_accessors<D>(dimensions: &[D], select: impl Fn(&D) -> &Accessor) -> Vec<Accessor> {
    dimensions.iter().map(|d| select(d).nested()).collect()
}

/// Follow a dotted path through objects and arrays (`"a.b.0.c"`).
pub fn get_value<'a>(row: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(row, |current, seg| match current {
        JsonValue::Object(map) => map.get(seg),
        JsonValue::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Turn an accessor into a callable, optionally post-processing its output.
pub fn create_accessor(acc: &Accessor, map: Option<ValueMap>) -> AccessorFn {
    let acc = acc.clone();
    match map {
        Some(map) => Arc::new(move |row: &JsonValue, i: usize| map(acc.get(row, i))),
        None => Arc::new(move |row: &JsonValue, i: usize| acc.get(row, i)),
    }
}

/// Stable string form of a value used as a label or grouping key.
pub fn label_key(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Distinct labels over all accessors, in the order they occur in the data.
fn all_labels(accessors: &[AccessorFn], rows: &[JsonValue]) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut labels = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        for acc in accessors {
            let label = label_key(&acc(row, i));
            if seen.insert(label.clone()) {
                labels.push(label);
            }
        }
    }
    labels
}

/// Distinct labels read by `acc`, in first-seen order.
pub fn make_label_domain(acc: &Accessor, rows: &[JsonValue]) -> Vec<String> {
    all_labels(&[create_accessor(acc, None)], rows)
}

/// Domain of a value channel across several dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueDomain {
    /// Categorical values, in first-seen order.
    Labels(Vec<String>),
    /// Numeric extent, always starting at zero.
    Extent([f64; 2]),
}

/// Compute the domain the dimensions' `select`ed accessor spans over `rows`.
///
/// If the first value read is a string the domain is the list of distinct
/// labels. Otherwise it is `[0, max]`, where `max` is the largest single value
/// or, with `sum_accessors`, the largest per-row sum across dimensions (for
/// stacked charts). Non-numeric values are skipped.
pub fn make_value_domain<D>(
    dimensions: &[D],
    select: impl Fn(&D) -> &Accessor,
    rows: &[JsonValue],
    sum_accessors: bool,
) -> ValueDomain {
    let accessors: Vec<AccessorFn> = dimensions
        .iter()
        .map(|d| create_accessor(select(d), None))
        .collect();

    if let (Some(first), Some(row)) = (accessors.first(), rows.first()) {
        if first(row, 0).is_string() {
            return ValueDomain::Labels(all_labels(&accessors, rows));
        }
    }

    let mut max = f64::NEG_INFINITY;
    for (i, row) in rows.iter().enumerate() {
        let values = accessors.iter().filter_map(|acc| acc(row, i).as_f64());
        if sum_accessors {
            max = max.max(values.sum());
        } else {
            max = values.fold(max, f64::max);
        }
    }
    ValueDomain::Extent([0.0, max.max(0.0)])
}

/// Maps domain values to positions.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainScale {
    /// Each label maps to its index in the domain.
    Point(IndexSet<String>),
    /// Linear map of `[d0, d1]` onto `[0, 1]`.
    Linear { d0: f64, d1: f64 },
}

impl DomainScale {
    /// Position of `value`, or `None` for an unknown label / non-number.
    pub fn scale(&self, value: &JsonValue) -> Option<f64> {
        match self {
            DomainScale::Point(labels) => labels.get_index_of(&label_key(value)).map(|i| i as f64),
            DomainScale::Linear { d0, d1 } => {
                let v = value.as_f64()?;
                if d1 == d0 {
                    Some(0.5)
                } else {
                    Some((v - d0) / (d1 - d0))
                }
            }
        }
    }
}

pub fn domain_scale(domain: &ValueDomain) -> DomainScale {
    match domain {
        ValueDomain::Labels(labels) => DomainScale::Point(labels.iter().cloned().collect()),
        ValueDomain::Extent([d0, d1]) => DomainScale::Linear { d0: *d0, d1: *d1 },
    }
}

/// Stack the values read by `keys` on top of each other, row by row.
///
/// Returns one series per key, each holding `[lower, upper]` per row. The
/// first key sits on zero; missing or non-numeric values count as zero.
pub fn stack_series(keys: &[Accessor], rows: &[JsonValue]) -> Vec<Vec<[f64; 2]>> {
    let mut baseline = vec![0.0; rows.len()];
    keys.iter()
        .map(|key| {
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    let lower = baseline[i];
                    let upper = lower + key.get(row, i).as_f64().unwrap_or(0.0);
                    baseline[i] = upper;
                    [lower, upper]
                })
                .collect()
        })
        .collect()
}

/// Rows sharing one label, keyed by their dimension value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRows {
    pub label: JsonValue,
    pub dimensions: IndexMap<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedData {
    /// Distinct dimension values, in first-seen order.
    pub dimension_names: Vec<String>,
    pub rows: Vec<GroupedRows>,
}

/// Pivot rows on two columns.
///
/// Rows like `{week, org, count}` grouped by `("week", "org")` become one
/// entry per week whose `dimensions` map each org to its row. A later row
/// with the same label and dimension replaces the earlier one.
pub fn group_rows(label_column: &str, dimension_column: &str, rows: &[JsonValue]) -> GroupedData {
    let mut names: IndexSet<String> = IndexSet::new();
    let mut grouped: IndexMap<String, GroupedRows> = IndexMap::new();

    for row in rows {
        let label = row.get(label_column).cloned().unwrap_or(JsonValue::Null);
        let dimension = label_key(row.get(dimension_column).unwrap_or(&JsonValue::Null));
        names.insert(dimension.clone());

        grouped
            .entry(label_key(&label))
            .or_insert_with(|| GroupedRows {
                label,
                dimensions: IndexMap::new(),
            })
            .dimensions
            .insert(dimension, row.clone());
    }

    GroupedData {
        dimension_names: names.into_iter().collect(),
        rows: grouped.into_values().collect(),
    }
}
