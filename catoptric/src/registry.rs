use alloc::vec::Vec;

use super::*;

/// Default maximum distance between corresponding endpoints of similar paths.
pub const DEFAULT_TOLERANCE: Float = 60.0;

/// Whether `a` and `b` follow approximately the same route: they have the same
/// number of segments, and corresponding endpoints are at most `tolerance` apart.
///
/// This relation is reflexive and symmetric, but not transitive.
#[must_use]
pub fn paths_similar(a: &[Segment], b: &[Segment], tolerance: Float) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(s, t)| {
            distance(&s.start, &t.start) <= tolerance && distance(&s.end, &t.end) <= tolerance
        })
}

/// A path that reached the goal.
///
/// Two persisted paths are equal if their geometry is.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedPath {
    segments: Vec<Segment>,
}

impl PersistedPath {
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn is_similar(&self, other: &Self, tolerance: Float) -> bool {
        paths_similar(&self.segments, &other.segments, tolerance)
    }

    #[inline]
    #[must_use]
    pub fn unfold(&self, progress: Float) -> UnfoldedPath {
        unfold(&self.segments, progress)
    }

    /// See [`virtual_source_position`].
    #[inline]
    #[must_use]
    pub fn virtual_source(&self) -> Point {
        // a trace always has at least one segment
        virtual_source_position(&self.segments).unwrap_or(self.segments[0].start)
    }
}

impl TryFrom<TraceResult> for PersistedPath {
    type Error = TraceResult;

    /// Fails, giving back `result`, unless it reached the goal.
    #[inline]
    fn try_from(result: TraceResult) -> Result<Self, Self::Error> {
        if result.outcome() == Outcome::HitGoal {
            Ok(Self {
                segments: result.into_segments(),
            })
        } else {
            Err(result)
        }
    }
}

/// The goal-reaching paths traced so far, at most one per route.
#[derive(Clone, Debug, PartialEq)]
pub struct PathRegistry {
    paths: Vec<PersistedPath>,
    tolerance: Float,
}

impl Default for PathRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PathRegistry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    #[inline]
    #[must_use]
    pub const fn with_tolerance(tolerance: Float) -> Self {
        Self {
            paths: Vec::new(),
            tolerance,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tolerance(&self) -> Float {
        self.tolerance
    }

    /// Retains `result` if it reached the goal, after evicting every retained path similar to it.
    ///
    /// Returns whether `result` was retained.
    pub fn admit(&mut self, result: TraceResult) -> bool {
        let Ok(path) = PersistedPath::try_from(result) else {
            return false;
        };

        let before = self.paths.len();
        let tolerance = self.tolerance;

        self.paths.retain(|p| !p.is_similar(&path, tolerance));

        let evicted = before - self.paths.len();
        if evicted > 0 {
            log::debug!("{evicted} path(s) superseded by a similar one");
        }

        self.paths.push(path);
        true
    }

    /// Retained paths, oldest first.
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &[PersistedPath] {
        &self.paths
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Forgets every retained path.
    #[inline]
    pub fn reset(&mut self) {
        self.paths.clear();
    }

    /// The apparent source position of every retained path, oldest first.
    #[must_use]
    pub fn virtual_source_positions(&self) -> Vec<Point> {
        self.paths.iter().map(PersistedPath::virtual_source).collect()
    }

    /// Every retained path, unfolded by `progress`, oldest first.
    #[must_use]
    pub fn unfold_all(&self, progress: Float) -> Vec<UnfoldedPath> {
        self.paths.iter().map(|p| p.unfold(progress)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: Float = 2000.;

    fn goal_result(segments: Vec<Segment>) -> TraceResult {
        TraceResult::new(segments, Outcome::HitGoal).unwrap()
    }

    fn bent(offset: Float) -> Vec<Segment> {
        vec![
            Segment::new([0., offset], [100., 50.]),
            Segment::new([100., 50.], [200., offset]),
        ]
    }

    /// two vertical mirrors bracketing both the source and the goal
    fn corridor() -> ObstacleSnapshot {
        ObstacleSnapshot::new(Circle::new([0., 200.], 35.), EXTENT).with_mirrors([
            Segment::new([-200., -240.], [-200., 140.]),
            Segment::new([200., -240.], [200., 140.]),
        ])
    }

    fn cast_at(obstacles: &ObstacleSnapshot, target: [Float; 2]) -> TraceResult {
        trace(&Ray::from_cast([0., -300.], target, 0.).unwrap(), obstacles)
    }

    #[test]
    fn test_similarity_is_reflexive_and_symmetric() {
        let a = bent(0.);
        let b = bent(10.);

        assert!(paths_similar(&a, &a, DEFAULT_TOLERANCE));
        assert_eq!(
            paths_similar(&a, &b, DEFAULT_TOLERANCE),
            paths_similar(&b, &a, DEFAULT_TOLERANCE),
        );
    }

    #[test]
    fn test_similarity_tolerance() {
        assert!(paths_similar(&bent(0.), &bent(10.), DEFAULT_TOLERANCE));
        assert!(!paths_similar(&bent(0.), &bent(100.), DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_different_lengths_are_never_similar() {
        let a = bent(0.);
        assert!(!paths_similar(&a, &a[..1], DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_only_goal_paths_are_admitted() {
        let mut registry = PathRegistry::new();

        for outcome in [
            Outcome::HitWall,
            Outcome::Escaped,
            Outcome::BounceLimitReached,
        ] {
            assert!(!registry.admit(TraceResult::new(bent(0.), outcome).unwrap()));
        }

        assert!(registry.is_empty());
        assert!(registry.admit(goal_result(bent(0.))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_similar_path_evicts_older() {
        let mut registry = PathRegistry::new();

        registry.admit(goal_result(bent(0.)));
        registry.admit(goal_result(bent(10.)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.paths()[0].segments(), bent(10.).as_slice());
    }

    #[test]
    fn test_distinct_paths_accumulate() {
        let mut registry = PathRegistry::new();

        registry.admit(goal_result(bent(0.)));
        registry.admit(goal_result(bent(100.)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.paths()[0].segments(), bent(0.).as_slice());
    }

    #[test]
    fn test_reset() {
        let mut registry = PathRegistry::new();
        registry.admit(goal_result(bent(0.)));
        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.virtual_source_positions().is_empty());
    }

    #[test]
    fn test_custom_tolerance() {
        let mut registry = PathRegistry::with_tolerance(5.);

        registry.admit(goal_result(bent(0.)));
        registry.admit(goal_result(bent(10.)));

        assert_eq!(registry.tolerance(), 5.);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_corridor_routes() {
        let obstacles = corridor();
        let mut registry = PathRegistry::new();

        // straight at the goal, then at its images through one and two mirrors
        let direct = cast_at(&obstacles, [0., 200.]);
        let once = cast_at(&obstacles, [400., 200.]);
        let twice = cast_at(&obstacles, [-800., 200.]);

        for (result, segments) in [(&direct, 1), (&once, 2), (&twice, 3)] {
            assert_eq!(result.outcome(), Outcome::HitGoal);
            assert_eq!(result.segments().len(), segments);
        }

        registry.admit(direct);
        registry.admit(once);
        registry.admit(twice);

        // a near-identical cast replaces the earlier one-bounce path
        registry.admit(cast_at(&obstacles, [402., 201.]));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.paths()[2].segments().len(), 2);

        let positions = registry.virtual_source_positions();
        let expected = [
            Point::new(0., -300.),
            Point::new(800., -300.),
            Point::new(400., -300.),
        ];

        for (p, e) in positions.iter().zip(expected) {
            assert!((p - e).norm() < 1e-2, "{p:?} != {e:?}");
        }
    }

    #[test]
    fn test_unfold_all() {
        let mut registry = PathRegistry::new();
        registry.admit(goal_result(bent(0.)));
        registry.admit(goal_result(bent(100.)));

        let unfolded = registry.unfold_all(0.);
        assert_eq!(unfolded.len(), 2);
        assert_eq!(unfolded[0].segments(), bent(0.).as_slice());
    }
}
