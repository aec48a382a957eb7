use alloc::vec::Vec;
use core::cmp::Ordering;

use super::*;

/// How a trace ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The last segment ends on a wall.
    HitWall,
    /// The last segment ends on the goal's boundary.
    HitGoal,
    /// Nothing was hit, the last segment ends at the scene's extent.
    Escaped,
    /// The ray was still bouncing when the bounce limit was reached.
    BounceLimitReached,
}

/// What happens to a ray when it hits a [`Collider`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Response<'a> {
    /// Keep tracing, reflected off the given mirror.
    Reflect(&'a Segment),
    /// Stop tracing.
    Terminate(Outcome),
}

/// Something a ray can run into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider<'a> {
    Mirror(&'a Segment),
    Wall(&'a Segment),
    Goal(&'a Circle),
}

impl<'a> Collider<'a> {
    #[inline]
    #[must_use]
    pub const fn response(&self) -> Response<'a> {
        match *self {
            Self::Mirror(m) => Response::Reflect(m),
            Self::Wall(_) => Response::Terminate(Outcome::HitWall),
            Self::Goal(_) => Response::Terminate(Outcome::HitGoal),
        }
    }

    /// Breaks exact distance ties between colliders, lowest first:
    /// mirrors, then walls, then the goal.
    #[inline]
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Mirror(_) => 0,
            Self::Wall(_) => 1,
            Self::Goal(_) => 2,
        }
    }

    #[inline]
    #[must_use]
    pub fn intersect(&self, segment: &Segment) -> Option<Point> {
        match self {
            Self::Mirror(s) | Self::Wall(s) => segment.intersect(*s),
            Self::Goal(c) => segment.intersect(*c),
        }
    }
}

/// The closest collider on a ray's way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit<'a> {
    pub point: Point,
    /// Distance from the ray's origin to `point`
    pub dist: Float,
    pub collider: Collider<'a>,
    /// Position of `collider` among those of its kind in the snapshot.
    pub index: usize,
}

impl Hit<'_> {
    /// Nearest first, then by [`Collider::priority`], then by input order.
    #[inline]
    fn rank(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.collider.priority().cmp(&other.collider.priority()))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// The obstacles of a scene, frozen for the duration of a trace.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    pub mirrors: Vec<Segment>,
    pub walls: Vec<Segment>,
    pub goal: Circle,
    /// How far rays reach from where they are cast before escaping.
    pub extent: Float,
}

impl ObstacleSnapshot {
    #[inline]
    #[must_use]
    pub fn new(goal: Circle, extent: Float) -> Self {
        Self {
            mirrors: Vec::new(),
            walls: Vec::new(),
            goal,
            extent,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_mirrors(mut self, mirrors: impl IntoIterator<Item = impl Into<Segment>>) -> Self {
        self.mirrors.extend(mirrors.into_iter().map(Into::into));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = impl Into<Segment>>) -> Self {
        self.walls.extend(walls.into_iter().map(Into::into));
        self
    }

    /// Every collider in the scene, paired with its index among those of its kind.
    pub fn colliders(&self) -> impl Iterator<Item = (usize, Collider<'_>)> + '_ {
        let mirrors = self.mirrors.iter().map(Collider::Mirror).enumerate();
        let walls = self.walls.iter().map(Collider::Wall).enumerate();

        mirrors
            .chain(walls)
            .chain(core::iter::once((0, Collider::Goal(&self.goal))))
    }

    /// The first collider `ray` runs into within [`Self::extent`] of its origin.
    ///
    /// Colliders touching the origin itself are ignored, so a ray cast from a
    /// mirror or a wall leaves it.
    #[must_use]
    pub fn closest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let reach = ray.reach(self.extent);

        self.colliders()
            .filter_map(|(index, collider)| {
                collider.intersect(&reach).map(|point| Hit {
                    point,
                    dist: distance(&ray.origin, &point),
                    collider,
                    index,
                })
            })
            .filter(|hit| hit.dist > 0.0)
            .min_by(Hit::rank)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceParams {
    /// Maximum number of segments in a path.
    pub bounce_limit: usize,
    /// How far behind a bounce point the next collision search starts.
    pub backoff: Float,
}

impl TraceParams {
    pub const DEFAULT_BOUNCE_LIMIT: usize = 35;
    pub const DEFAULT_BACKOFF: Float = 1e-6;
}

impl Default for TraceParams {
    #[inline]
    fn default() -> Self {
        Self {
            bounce_limit: Self::DEFAULT_BOUNCE_LIMIT,
            backoff: Self::DEFAULT_BACKOFF,
        }
    }
}

/// The path followed by a ray and how it ended.
///
/// `segments` is never empty, and every segment starts where the previous one ends.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceResult {
    segments: Vec<Segment>,
    outcome: Outcome,
}

impl TraceResult {
    /// Returns `None` if `segments` is empty, or if one of them doesn't start
    /// where the previous one ends.
    #[must_use]
    pub fn new(segments: Vec<Segment>, outcome: Outcome) -> Option<Self> {
        let continuous = segments.windows(2).all(|w| w[0].end == w[1].start);
        (!segments.is_empty() && continuous).then_some(Self { segments, outcome })
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    #[inline]
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Number of mirrors bounced off.
    #[inline]
    #[must_use]
    pub fn bounces(&self) -> usize {
        self.segments.len() - 1
    }

    /// Where the path ends.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Point {
        // non-empty by construction
        self.segments[self.segments.len() - 1].end
    }

    #[inline]
    #[must_use]
    pub fn total_length(&self) -> Float {
        self.segments.iter().map(Segment::length).sum()
    }
}

/// [`trace_with`], using [`TraceParams::default`].
#[inline]
#[must_use]
pub fn trace(ray: &Ray, obstacles: &ObstacleSnapshot) -> TraceResult {
    trace_with(ray, obstacles, &TraceParams::default())
}

/// Follows `ray` through `obstacles` until it hits a wall or the goal, escapes
/// the scene, or `params.bounce_limit` segments have been produced.
#[must_use]
pub fn trace_with(ray: &Ray, obstacles: &ObstacleSnapshot, params: &TraceParams) -> TraceResult {
    let limit = params.bounce_limit.max(1);

    let mut segments = Vec::with_capacity(limit.min(8));
    let mut search = *ray;
    let mut start = ray.origin;

    let outcome = loop {
        if segments.len() >= limit {
            break Outcome::BounceLimitReached;
        }

        let Some(hit) = obstacles.closest_hit(&search) else {
            segments.push(Segment::new(start, search.at(obstacles.extent)));
            break Outcome::Escaped;
        };

        segments.push(Segment::new(start, hit.point));

        match hit.collider.response() {
            Response::Terminate(outcome) => break outcome,
            Response::Reflect(mirror) => {
                let outgoing = reflect(search.angle(), mirror.angle());
                // only the search origin is backed off, the recorded path stays continuous
                let origin = hit.point - search.dir.as_ref() * params.backoff;
                search = Ray::from_angle(origin, outgoing);
                start = hit.point;
            }
        }
    };

    log::debug!(
        "trace from ({}, {}) finished: {outcome:?} after {} segment(s)",
        ray.origin.x,
        ray.origin.y,
        segments.len(),
    );

    TraceResult { segments, outcome }
}
