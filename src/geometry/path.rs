use std::f32::consts::PI;

use super::Point;

/// Half-angle between the shaft and each side of an arrowhead
const ARROW_HEAD_ANGLE: f32 = PI / 6.0;

/// One quadratic segment of a smoothed path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub control: Point,
    pub end: Point,
}

/// A multi-point stroke expressed as quadratic curves
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothPath {
    pub start: Point,
    pub curves: Vec<QuadCurve>,
}

pub fn quadratic_control_point(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    Point::new(p1.x + (p2.x - p0.x) * t, p1.y + (p2.y - p0.y) * t)
}

/// Build smoothing curves through a freehand point sequence.
///
/// Every interior point gets a curve ending on it whose control point
/// follows the neighbouring tangent; the last curve runs straight from the
/// second-last point to the last one.
pub fn smooth_path(points: &[Point]) -> Option<SmoothPath> {
    if points.len() < 2 {
        return None;
    }

    let mut curves = Vec::with_capacity(points.len());
    for window in points.windows(3) {
        curves.push(QuadCurve {
            control: quadratic_control_point(window[0], window[1], window[2], 0.5),
            end: window[1],
        });
    }

    let last = points[points.len() - 1];
    let second_last = points[points.len() - 2];
    curves.push(QuadCurve {
        control: second_last,
        end: last,
    });

    Some(SmoothPath {
        start: points[0],
        curves,
    })
}

/// Triangle vertices of an arrowhead: `[left, end, right]`
pub fn arrow_head_points(start: Point, end: Point, head_size: f32) -> [Point; 3] {
    let angle = super::angle(start, end);

    let left = Point::new(
        end.x - head_size * (angle - ARROW_HEAD_ANGLE).cos(),
        end.y - head_size * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    let right = Point::new(
        end.x - head_size * (angle + ARROW_HEAD_ANGLE).cos(),
        end.y - head_size * (angle + ARROW_HEAD_ANGLE).sin(),
    );

    [left, end, right]
}
