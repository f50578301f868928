use crate::config::BrushConfig;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::smooth;

/// One sampled pointer position, in logical (CSS) pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Milliseconds, monotonic within a segment.
    #[serde(rename = "t")]
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            pressure: None,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Composite mode a segment is replayed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkMode {
    /// Source-over in the pen colour.
    #[default]
    Draw,
    /// Destination-out: removes whatever ink lies under the brush.
    Erase,
}

/// Points between one pointer-down and the matching pointer-up.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InkSegment {
    #[serde(default)]
    pub mode: InkMode,
    pub points: Vec<StrokePoint>,
}

impl InkSegment {
    pub fn new(mode: InkMode) -> Self {
        Self {
            mode,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this segment puts ink on the surface.
    pub fn is_ink(&self) -> bool {
        self.mode == InkMode::Draw && !self.points.is_empty()
    }

    /// Append `point` unless it lies closer than `min_distance` to the last kept point.
    /// The first point is always kept.
    pub fn push_filtered(&mut self, point: StrokePoint, min_distance: f64) -> bool {
        if !point.is_finite() {
            return false;
        }
        if let Some(last) = self.points.last() {
            if last.position().distance(point.position()) < min_distance {
                return false;
            }
        }
        self.points.push(point);
        true
    }
}

/// A filled primitive the brush leaves behind, in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stamp {
    Disc {
        center: Point,
        radius: f64,
    },
    /// Tapered quad joining two consecutive discs.
    Bridge {
        from: Point,
        from_radius: f64,
        to: Point,
        to_radius: f64,
    },
}

impl Stamp {
    /// Corner points of a bridge, or `None` for discs and degenerate bridges.
    pub fn bridge_corners(&self) -> Option<[Point; 4]> {
        let Stamp::Bridge {
            from,
            from_radius,
            to,
            to_radius,
        } = *self
        else {
            return None;
        };
        let d = to - from;
        let len = d.hypot();
        if len < 1e-9 {
            return None;
        }
        let n = Vec2::new(-d.y / len, d.x / len);
        Some([
            from + n * from_radius,
            to + n * to_radius,
            to - n * to_radius,
            from - n * from_radius,
        ])
    }
}

/// Brush radius per point, following the velocity-sensitive pen model: the faster the pointer
/// moves, the thinner the line. Each point takes its width directly; the width between two
/// points is interpolated by the tapered [`Stamp::Bridge`] joining them.
pub fn point_radii(points: &[StrokePoint], brush: &BrushConfig) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let Some(first) = points.first() else {
        return out;
    };

    let mut velocity = 0.0;
    let mut prev = *first;
    out.push(brush.dot_radius());

    for p in &points[1..] {
        let dt = p.timestamp_ms.saturating_sub(prev.timestamp_ms);
        let sample = if dt == 0 {
            0.0
        } else {
            prev.position().distance(p.position()) / dt as f64
        };
        velocity = smooth(brush.velocity_filter_weight, sample, velocity);
        out.push((brush.max_width / (velocity + 1.0)).max(brush.min_width));
        prev = *p;
    }
    out
}

/// Decompose a segment into discs and bridges.
pub fn stamps(segment: &InkSegment, brush: &BrushConfig) -> Vec<Stamp> {
    let points = &segment.points;
    if points.len() == 1 {
        return vec![Stamp::Disc {
            center: points[0].position(),
            radius: brush.dot_radius(),
        }];
    }

    let radii = point_radii(points, brush);
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, (p, r)) in points.iter().zip(radii.iter()).enumerate() {
        out.push(Stamp::Disc {
            center: p.position(),
            radius: *r,
        });
        if i + 1 < points.len() {
            out.push(Stamp::Bridge {
                from: p.position(),
                from_radius: *r,
                to: points[i + 1].position(),
                to_radius: radii[i + 1],
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ink/stroke.rs"]
mod tests;
