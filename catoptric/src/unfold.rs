//! Straightening of bent paths.
//!
//! At every bounce, a path reaching the goal is optically equivalent to a straight
//! path through a mirrored copy of the scene. Unfolding re-angles the segments
//! preceding the last one toward its direction, chaining them back from the goal,
//! until (at full progress) the path is a single straight line whose start is where
//! the source appears to be.

use alloc::vec::Vec;

use nalgebra::Rotation2;

use super::*;

/// A path, partially or fully unfolded, see [`unfold`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnfoldedPath {
    segments: Vec<Segment>,
}

impl UnfoldedPath {
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The start of the first segment.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        self.segments.first().map(|s| s.start)
    }
}

/// Unfolds `segments` by `progress` (clamped to `[0, 1]`).
///
/// The last segment is kept as is. Every other segment keeps its length, is turned
/// from its own direction toward the last one's by `progress` (linearly in angle),
/// and is placed so that it ends where the following one starts.
///
/// At `progress == 0`, a continuous path is reproduced exactly. At `progress == 1`,
/// all segments are colinear.
#[must_use]
pub fn unfold(segments: &[Segment], progress: Float) -> UnfoldedPath {
    let Some((last, rest)) = segments.split_last() else {
        return UnfoldedPath::default();
    };

    let progress = progress.clamp(0.0, 1.0);
    let target = last.angle();

    let mut unfolded = Vec::with_capacity(segments.len());
    unfolded.push(*last);

    let mut end = last.start;

    for segment in rest.iter().rev() {
        let turn = progress * (target - segment.angle());
        let placed = pivot(segment, end, turn);
        end = placed.start;
        unfolded.push(placed);
    }

    unfolded.reverse();

    UnfoldedPath { segments: unfolded }
}

/// Where the source of `segments` appears to be, when seen from its end,
/// i. e. the start of the fully unfolded path.
///
/// Returns `None` if `segments` is empty.
#[inline]
#[must_use]
pub fn virtual_source_position(segments: &[Segment]) -> Option<Point> {
    unfold(segments, 1.0).origin()
}

/// `segment`, rotated by `turn` around its end, then moved to end at `end`.
#[inline]
fn pivot(segment: &Segment, end: Point, turn: Float) -> Segment {
    let arm = segment.start - segment.end;
    // zero when `turn` is, making the start unchanged when `end` is too
    let swing = Rotation2::new(turn) * arm - arm;

    Segment {
        start: segment.start + (end - segment.end) + swing,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zigzag() -> Vec<Segment> {
        vec![
            Segment::new([0., 0.], [3., 4.]),
            Segment::new([3., 4.], [10., 4.]),
            Segment::new([10., 4.], [7., -2.5]),
            Segment::new([7., -2.5], [7., -20.]),
        ]
    }

    fn colinear(segments: &[Segment]) -> bool {
        let Some(dir) = segments.last().and_then(Segment::direction) else {
            return true;
        };
        let origin = segments[segments.len() - 1].end;

        segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .all(|p| (p - origin).perp(dir.as_ref()).abs() < 1e-6)
    }

    #[test]
    fn test_empty_path() {
        assert!(unfold(&[], 0.5).is_empty());
        assert_eq!(virtual_source_position(&[]), None);
    }

    #[test]
    fn test_single_segment_is_kept() {
        let path = [Segment::new([1., 2.], [3., 4.])];

        for progress in [0., 0.5, 1.] {
            assert_eq!(unfold(&path, progress).segments(), &path);
        }
        assert_eq!(virtual_source_position(&path), Some(Point::new(1., 2.)));
    }

    #[test]
    fn test_no_progress_reproduces_path() {
        let path = zigzag();
        assert_eq!(unfold(&path, 0.).segments(), path.as_slice());
    }

    #[test]
    fn test_full_progress_straightens_path() {
        let path = zigzag();
        let unfolded = unfold(&path, 1.);

        assert_eq!(unfolded.len(), path.len());
        assert!(colinear(unfolded.segments()));

        let total = |s: &[Segment]| s.iter().map(Segment::length).sum::<Float>();
        assert!((total(unfolded.segments()) - total(&path)).abs() < 1e-9);

        // chained end to end
        for pair in unfolded.segments().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_last_segment_is_anchored() {
        let path = zigzag();

        for progress in [0., 0.3, 1.] {
            let unfolded = unfold(&path, progress);
            assert_eq!(unfolded.segments().last(), path.last());
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let path = zigzag();

        assert_eq!(unfold(&path, -1.), unfold(&path, 0.));
        assert_eq!(unfold(&path, 2.), unfold(&path, 1.));
    }

    #[test]
    fn test_virtual_source_behind_horizontal_mirror() {
        // from (0, 10) down to a mirror on the x axis, then up to (10, 10)
        let path = [
            Segment::new([0., 10.], [5., 0.]),
            Segment::new([5., 0.], [10., 10.]),
        ];

        let source = virtual_source_position(&path).unwrap();
        assert!((source - Point::new(0., -10.)).norm() < 1e-9);
    }

    #[test]
    fn test_half_progress_is_between() {
        let path = [
            Segment::new([0., 10.], [5., 0.]),
            Segment::new([5., 0.], [10., 10.]),
        ];

        let half = unfold(&path, 0.5);
        let first = half.segments()[0];
        let expected = (path[0].angle() + path[1].angle()) / 2.;

        assert!((first.angle() - expected).abs() < 1e-9);
        assert!((first.length() - path[0].length()).abs() < 1e-9);
        assert_eq!(first.end, path[1].start);
    }

    fn arb_path() -> impl Strategy<Value = Vec<Segment>> {
        prop::collection::vec((-500.0..500.0f64, -500.0..500.0f64), 2..12).prop_map(|points| {
            points
                .windows(2)
                .map(|w| Segment::new([w[0].0, w[0].1], [w[1].0, w[1].1]))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn unfolding_preserves_lengths(path in arb_path(), progress in 0.0..=1.0f64) {
            let unfolded = unfold(&path, progress);

            prop_assert_eq!(unfolded.len(), path.len());

            for (a, b) in unfolded.segments().iter().zip(&path) {
                prop_assert!((a.length() - b.length()).abs() < 1e-6);
            }
        }

        #[test]
        fn unfolding_round_trip(path in arb_path()) {
            let folded = unfold(&path, 0.);
            let straight = unfold(&path, 1.);

            prop_assert_eq!(folded.segments(), path.as_slice());
            prop_assert!(colinear(straight.segments()));
        }
    }
}
