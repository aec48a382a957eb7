use catoptric::*;

use core::{f64::consts::TAU, iter};
use catoptric::nalgebra::SVector;
pub use rand;

/// Largest absolute coordinate of randomly placed obstacles.
pub const MAX_COORD_MAG: Float = 500.0;

/// Distance from the source of randomly generated cast targets.
pub const CAST_REACH: Float = 1000.0;

const MIN_SEGMENT_LENGTH: Float = 20.0;

pub trait Random: Sized {
    /// Generate a randomized version of this obstacle using the provided `rng`
    ///
    /// This method must not fail. If creating an obstacle is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for Segment {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        loop {
            let start = rand_vect::<2>(rng, MAX_COORD_MAG);
            let segment = Segment::new(start, rand_vect::<2>(rng, MAX_COORD_MAG));
            if segment.length() >= MIN_SEGMENT_LENGTH {
                break segment;
            }
        }
    }
}

impl Random for Circle {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Circle::new(rand_vect::<2>(rng, MAX_COORD_MAG), rng.gen_range(10.0..60.0))
    }
}

/// A ray starting at `origin`, heading in a uniformly distributed direction.
pub fn random_cast(rng: &mut (impl rand::Rng + ?Sized), origin: impl Into<Point>) -> Ray {
    Ray::from_angle(origin, rng.gen_range(0.0..TAU))
}

/// Where a random cast from `origin` is dragged to, [`CAST_REACH`] units away from it.
pub fn random_cast_target(rng: &mut (impl rand::Rng + ?Sized), origin: impl Into<Point>) -> Point {
    random_cast(rng, origin).at(CAST_REACH)
}

/// A random goal, `num_mirrors` random mirrors and `num_walls` random walls.
pub fn random_scene(
    rng: &mut (impl rand::Rng + ?Sized),
    num_mirrors: usize,
    num_walls: usize,
    extent: Float,
) -> ObstacleSnapshot {
    let goal = Circle::random(rng);
    let mirrors = Vec::from_iter(iter::repeat_with(|| Segment::random(rng)).take(num_mirrors));
    let walls = Vec::from_iter(iter::repeat_with(|| Segment::random(rng)).take(num_walls));

    ObstacleSnapshot::new(goal, extent)
        .with_mirrors(mirrors)
        .with_walls(walls)
}

pub fn rand_vect<const D: usize>(
    rng: &mut (impl rand::Rng + ?Sized),
    max_coord_mag: Float,
) -> SVector<Float, D> {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly

    SVector::<Float, D>::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}
