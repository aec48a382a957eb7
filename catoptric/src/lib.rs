#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use nalgebra;

use nalgebra::{ComplexField, RealField, SVector, Unit};

mod geom;
mod registry;
mod trace;
mod unfold;

pub use geom::*;
pub use registry::*;
pub use trace::*;
pub use unfold::*;

pub type Float = f64;

/// A point, or a displacement, in the plane.
pub type Point = SVector<Float, 2>;

/// Drags shorter than this (in scene units) are not turned into casts.
pub const CAST_THRESHOLD: Float = 40.0;

/// An ordered pair of points.
///
/// Mirrors and walls are segments, and so is every leg of a traced path,
/// in which case `start` is where the light comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    #[must_use]
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `end - start`
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Point {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        length(self)
    }

    /// Direction of travel from `start` to `end`, see [`angle`].
    #[inline]
    #[must_use]
    pub fn angle(&self) -> Float {
        angle(self)
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The unit vector pointing from `start` to `end`, `None` if `self` is degenerate.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Option<Unit<Point>> {
        Unit::try_new(self.delta(), 0.0)
    }

    /// `start + t * (end - start)`
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Point {
        self.start + self.delta() * t
    }
}

impl<P: Into<Point>> From<[P; 2]> for Segment {
    #[inline]
    fn from([start, end]: [P; 2]) -> Self {
        Self::new(start, end)
    }
}

/// All points at distance `radius` from `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    radius: Float,
}

impl Circle {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Point>, radius: Float) -> Self {
        Self {
            center: center.into(),
            radius: ComplexField::abs(radius),
        }
    }

    #[inline]
    #[must_use]
    pub const fn radius(&self) -> Float {
        self.radius
    }

    /// Whether `p` lies inside this circle or on its boundary.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }
}

/// A light ray, represented as a half-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub origin: Point,
    /// The direction of the half-line
    pub dir: Unit<Point>,
}

impl Ray {
    /// Returns `None` if `dir` is zero.
    #[inline]
    #[must_use]
    pub fn try_new(origin: impl Into<Point>, dir: impl Into<Point>) -> Option<Self> {
        Unit::try_new(dir.into(), 0.0).map(|dir| Self {
            origin: origin.into(),
            dir,
        })
    }

    /// A ray leaving `origin` at `angle` radians from the x axis.
    #[inline]
    #[must_use]
    pub fn from_angle(origin: impl Into<Point>, angle: Float) -> Self {
        let (sin, cos) = ComplexField::sin_cos(angle);
        Self {
            origin: origin.into(),
            // cos² + sin² = 1
            dir: Unit::new_unchecked(Point::new(cos, sin)),
        }
    }

    /// The ray cast from `segment.start` through `segment.end`.
    ///
    /// Returns `None` if `segment` is degenerate.
    #[inline]
    #[must_use]
    pub fn try_from_segment(segment: &Segment) -> Option<Self> {
        Self::from_cast(segment.start, segment.end, 0.0)
    }

    /// The ray a drag from `start` to `end` fires, if the drag is strictly
    /// longer than `min_len`.
    #[inline]
    #[must_use]
    pub fn from_cast(start: impl Into<Point>, end: impl Into<Point>, min_len: Float) -> Option<Self> {
        let start = start.into();
        let delta = end.into() - start;
        (delta.norm() > min_len)
            .then(|| Self::try_new(start, delta))
            .flatten()
    }

    /// Direction of travel, in radians, in `(-π, π]`.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> Float {
        RealField::atan2(self.dir.y, self.dir.x)
    }

    /// Move the ray's origin forward (or backward if `t < 0.0`) by `t`
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.origin = self.at(t);
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Point {
        self.origin + self.dir.as_ref() * t
    }

    /// The segment covering the first `reach` units of this ray.
    #[inline]
    #[must_use]
    pub fn reach(&self, reach: Float) -> Segment {
        Segment::new(self.origin, self.at(reach))
    }
}
