//! Plane geometry on [`Point`]s, [`Segment`]s and [`Circle`]s.
//!
//! Everything here is pure and total: degenerate inputs (zero-length segments,
//! zero-radius circles, parallel lines) yield "no intersection" instead of failing.

use nalgebra::{ComplexField, RealField};

use super::*;

/// Slack on a line/circle discriminant, relative to its value for a line through
/// the center, under which the line is considered tangent to the circle.
const TANGENT_TOLERANCE: Float = 1e-9;

#[inline]
#[must_use]
pub fn distance(a: &Point, b: &Point) -> Float {
    (b - a).norm()
}

#[inline]
#[must_use]
pub fn length(segment: &Segment) -> Float {
    distance(&segment.start, &segment.end)
}

/// The direction of travel along `segment`, in radians, in `(-π, π]`.
///
/// Degenerate segments have an angle of `0`.
#[inline]
#[must_use]
pub fn angle(segment: &Segment) -> Float {
    let d = segment.delta();
    RealField::atan2(d.y, d.x)
}

/// Maps `a` to the equivalent angle in `(-π, π]`.
#[inline]
#[must_use]
pub fn normalize_angle(a: Float) -> Float {
    let (sin, cos) = ComplexField::sin_cos(a);
    RealField::atan2(sin, cos)
}

/// Law of reflection on a line directed by `mirror`, with angles in radians.
///
/// The returned direction is normalized with [`normalize_angle`]. Since lines are
/// undirected, `mirror` and `mirror + π` give the same result.
#[inline]
#[must_use]
pub fn reflect(incoming: Float, mirror: Float) -> Float {
    normalize_angle(2.0 * mirror - incoming)
}

/// The point where `a` and `b` cross, endpoints included.
///
/// Returns `None` if they don't cross, are parallel (or colinear) or if
/// any of them is degenerate.
#[must_use]
pub fn intersect_segments(a: &Segment, b: &Segment) -> Option<Point> {
    let r = a.delta();
    let s = b.delta();

    let denom = r.perp(&s);

    if denom == 0.0 {
        return None;
    }

    // solving `a.start + t * r = b.start + u * s` for `t` and `u`
    let q = b.start - a.start;
    let t = q.perp(&s) / denom;
    let u = q.perp(&r) / denom;

    let unit = 0.0..=1.0;
    (unit.contains(&t) && unit.contains(&u)).then(|| a.at(t))
}

/// The point of `segment` on `circle`'s boundary closest to `segment.start`.
///
/// If `segment` starts inside `circle`, that is where it leaves it.
#[must_use]
pub fn intersect_segment_circle(segment: &Segment, circle: &Circle) -> Option<Point> {
    let r = circle.radius();
    let d = segment.delta();
    let a = d.norm_squared();

    if r <= 0.0 || a == 0.0 {
        return None;
    }

    // substituting `P` for `start + t * d` in the circle equation:
    // `||P - C||^2 = r^2` results in a quadratic equation in `t`.
    let v = segment.start - circle.center;
    let half_b = v.dot(&d);
    let c = v.norm_squared() - r * r;

    let mut delta = half_b * half_b - a * c;

    if delta < 0.0 {
        if delta < -TANGENT_TOLERANCE * a * r * r {
            return None;
        }
        delta = 0.0;
    }

    let root = ComplexField::sqrt(delta);

    // `a > 0`, so these are in increasing order
    [(-half_b - root) / a, (-half_b + root) / a]
        .into_iter()
        .find(|t| (0.0..=1.0).contains(t))
        .map(|t| segment.at(t))
}

/// Shapes a [`Segment`] can be intersected with.
pub trait Intersect<Rhs: ?Sized> {
    /// The intersection point closest to the start of the segment involved, if any.
    fn intersect(&self, other: &Rhs) -> Option<Point>;
}

impl Intersect<Segment> for Segment {
    #[inline]
    fn intersect(&self, other: &Segment) -> Option<Point> {
        intersect_segments(self, other)
    }
}

impl Intersect<Circle> for Segment {
    #[inline]
    fn intersect(&self, other: &Circle) -> Option<Point> {
        intersect_segment_circle(self, other)
    }
}

impl Intersect<Segment> for Circle {
    #[inline]
    fn intersect(&self, other: &Segment) -> Option<Point> {
        intersect_segment_circle(other, self)
    }
}
