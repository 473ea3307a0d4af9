use std::f64::consts::{FRAC_PI_2, TAU};

use super::buckets::BucketMap;
use super::canvas::{palette_color, Color};

/// Radial position of wedge labels, as a fraction of the radius.
pub const LABEL_RADIUS: f64 = 0.6;

/// Largest angle between two consecutive outline points of an arc.
const ARC_STEP: f64 = TAU / 180.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    /// Angle where the wedge begins, measured clockwise from 12 o'clock.
    pub start: f64,
    pub sweep: f64,
    pub color: Color,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    pub fn percent(&self) -> f64 {
        self.sweep / TAU * 100.0
    }
}

/// Lay out one wedge per bucket, in bucket order.
///
/// Returns an empty vector when the total is zero. The last wedge takes
/// whatever is left of the turn so rounding never leaves a gap.
pub fn layout(buckets: &BucketMap) -> Vec<PieSlice> {
    let total = buckets.total();
    if total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    let count = buckets.len();

    let mut running = 0u64;
    buckets
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let start = running as f64 / total * TAU;
            running += value;
            let sweep = if i + 1 == count {
                TAU - start
            } else {
                value as f64 / total * TAU
            };
            PieSlice {
                label: label.to_string(),
                value,
                start,
                sweep,
                color: palette_color(i),
            }
        })
        .collect()
}

/// Point on a circle for a clockwise-from-top angle, in y-up coordinates.
pub fn point_at(center: (f32, f32), radius: f32, angle: f64) -> (f32, f32) {
    let theta = FRAC_PI_2 - angle;
    (
        center.0 + (radius as f64 * theta.cos()) as f32,
        center.1 + (radius as f64 * theta.sin()) as f32,
    )
}

/// Closed outline of a wedge: the centre followed by points along the arc.
pub fn wedge_outline(center: (f32, f32), radius: f32, slice: &PieSlice) -> Vec<(f32, f32)> {
    let steps = (slice.sweep / ARC_STEP).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let angle = slice.start + slice.sweep * i as f64 / steps as f64;
        points.push(point_at(center, radius, angle));
    }
    points
}

/// Where the percentage label of a wedge is anchored.
pub fn label_anchor(center: (f32, f32), radius: f32, slice: &PieSlice) -> (f32, f32) {
    point_at(center, radius * LABEL_RADIUS as f32, slice.mid_angle())
}
