use catoptric::*;
use catoptric_json::{serde_json, serialize_report, JsonDes, Scene};
use catoptric_random::{rand, random_cast};

use rand::{rngs::StdRng, SeedableRng};
use std::{error::Error, fs::File, io, iter};

fn run_scene(
    scene: &Scene,
    num_random_casts: usize,
    rng: &mut (impl rand::Rng + ?Sized),
) -> Result<serde_json::Value, Box<dyn Error>> {
    let random_rays = match scene.source {
        Some(source) => Vec::from_iter(
            iter::repeat_with(|| random_cast(rng, source)).take(num_random_casts),
        ),
        None if num_random_casts > 0 => return Err("random casts require a source".into()),
        None => Vec::new(),
    };

    let mut registry = PathRegistry::new();

    let traces = Vec::from_iter(scene.rays().chain(random_rays).map(|ray| {
        let result = trace_with(&ray, &scene.obstacles, &scene.params);
        registry.admit(result.clone());
        result
    }));

    log::info!(
        "traced {} ray(s), {} distinct path(s) reach the goal",
        traces.len(),
        registry.len(),
    );

    Ok(serialize_report(&traces, &registry))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("expected a file path as a first argument.")?;

    let num_random_casts = args
        .next()
        .map(|arg| arg.parse())
        .transpose()
        .map_err(|_| "expected a number of random casts as second argument")?
        .unwrap_or(0);

    let seed = args
        .next()
        .map(|arg| arg.parse())
        .transpose()
        .map_err(|_| "expected a seed as third argument")?;

    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let scene = Scene::from_json(&serde_json::from_reader(File::open(file_path)?)?)?;

    let report = run_scene(&scene, num_random_casts, &mut rng)?;

    serde_json::to_writer_pretty(io::stdout().lock(), &report)?;
    println!();

    Ok(())
}
