//! Polar/rectangular conversion and chart padding.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::dimensions::{LegendOptions, Padding, Position, Title, TitlePosition};

/// Vertical space reserved for a chart title.
pub const TITLE_HEIGHT: f64 = 30.0;
/// Legend band height when a top/bottom legend sets none.
pub const DEFAULT_LEGEND_HEIGHT: f64 = 50.0;
/// Legend band width when a left/right legend sets none.
pub const DEFAULT_LEGEND_WIDTH: f64 = 200.0;
/// Gap between the legend band and the plot.
pub const LEGEND_GAP: f64 = 20.0;

pub fn polar_to_rect(r: f64, theta: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}

/// `(r, theta)` with theta measured from twelve o'clock, so that it lines up
/// with pie slice angles.
pub fn rect_to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x) + FRAC_PI_2)
}

/// Inputs to [`calculate_padding`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingOptions {
    /// The chart type's own padding.
    pub standard: Padding,
    /// Overrides passed in by the caller.
    pub prop: Option<Padding>,
    pub title: Option<Title>,
    pub legend: Option<LegendOptions>,
}

/// Padding around the plot area once the title and legend are accounted for.
/// Every side of the result is set.
pub fn calculate_padding(options: &PaddingOptions) -> Padding {
    let mut p = Padding::uniform(0.0).merged(&options.standard);
    if let Some(prop) = &options.prop {
        p = p.merged(prop);
    }

    if let Some(legend) = &options.legend {
        let band = match legend.position {
            Position::Top | Position::Bottom => legend.height.unwrap_or(DEFAULT_LEGEND_HEIGHT),
            Position::Left | Position::Right => legend.width.unwrap_or(DEFAULT_LEGEND_WIDTH),
        };
        *p.side_mut(legend.position) += band + LEGEND_GAP;
    }

    if let Some(title) = &options.title {
        let side = match title.position() {
            TitlePosition::Top => Position::Top,
            TitlePosition::Bottom => Position::Bottom,
        };
        *p.side_mut(side) += TITLE_HEIGHT;
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_round_trip_offsets_theta() {
        let (r, theta) = rect_to_polar(0.0, -1.0);
        assert!((r - 1.0).abs() < 1e-12);
        assert!(theta.abs() < 1e-12);

        let (x, y) = polar_to_rect(2.0, 0.0);
        assert!((x - 2.0).abs() < 1e-12 && y.abs() < 1e-12);
    }
}
