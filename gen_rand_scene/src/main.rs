use core::iter;
use std::{env, error::Error, fs::File};

use catoptric_json::{serde_json, JsonSer, Scene};
use catoptric_random::*;

const EXTENT: catoptric::Float = 2000.0;

fn generate_random_scene(
    num_mirrors: usize,
    num_walls: usize,
    num_casts: usize,
) -> serde_json::Value {
    let mut rng = rand::thread_rng();

    let mut scene = Scene::new(random_scene(&mut rng, num_mirrors, num_walls, EXTENT));

    let source = rand_vect::<2>(&mut rng, MAX_COORD_MAG);
    scene.source = Some(source);
    scene.casts = iter::repeat_with(|| random_cast_target(&mut rng, source))
        .take(num_casts)
        .collect();

    scene.to_json()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the scene json data")?;

    let num_mirrors = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(12);

    let num_walls = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(2);

    let num_casts = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(4);

    let json = generate_random_scene(num_mirrors, num_walls, num_casts);

    serde_json::to_writer_pretty(File::create(&file_path)?, &json)?;

    log::info!("wrote a scene with {num_mirrors} mirror(s) and {num_walls} wall(s) to {file_path}");

    Ok(())
}
