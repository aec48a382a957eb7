use catoptric::*;
use std::error::Error;

pub use serde_json;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()?;
    }
    Some(coords)
}

pub fn json_array_to_point(json_array: &[serde_json::Value]) -> Option<Point> {
    json_array_to_float_array(json_array).map(Point::from)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

fn field<'a>(json: &'a serde_json::Value, name: &str) -> Result<&'a serde_json::Value, Box<dyn Error>> {
    json.get(name)
        .ok_or_else(|| format!("missing field \"{name}\"").into())
}

fn float_field(json: &serde_json::Value, name: &str) -> Result<Float, Box<dyn Error>> {
    field(json, name)?
        .as_f64()
        .ok_or_else(|| format!("field \"{name}\" must be a number").into())
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        map_json_array(json, T::from_json)
    }
}

impl JsonSer for Point {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.x, self.y])
    }
}

impl JsonDes for Point {
    /// A point is an array of two numbers: `[x, y]`
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        json.as_array()
            .map(Vec::as_slice)
            .and_then(json_array_to_point)
            .ok_or_else(|| "a point must be an array of 2 numbers".into())
    }
}

impl JsonSer for Segment {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "start": self.start.to_json(),
            "end": self.end.to_json(),
        })
    }
}

impl JsonDes for Segment {
    /// ```json
    /// { "start": [x, y], "end": [x, y] }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(
            Point::from_json(field(json, "start")?)?,
            Point::from_json(field(json, "end")?)?,
        ))
    }
}

impl JsonSer for Circle {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "center": self.center.to_json(),
            "radius": self.radius(),
        })
    }
}

impl JsonDes for Circle {
    /// ```json
    /// { "center": [x, y], "radius": 35.0 }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(
            Point::from_json(field(json, "center")?)?,
            float_field(json, "radius")?,
        ))
    }
}

impl JsonSer for Ray {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.to_json(),
            "direction": self.dir.as_ref().to_json(),
        })
    }
}

impl JsonDes for Ray {
    /// ```json
    /// {
    ///     "origin": [x, y],
    ///     "direction": [x, y], // must not be zero
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let origin = Point::from_json(field(json, "origin")?)?;
        let direction = Point::from_json(field(json, "direction")?)?;

        Ray::try_new(origin, direction).ok_or_else(|| "ray direction must not be zero".into())
    }
}

impl JsonSer for TraceParams {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "bounce_limit": self.bounce_limit,
            "backoff": self.backoff,
        })
    }
}

impl JsonDes for TraceParams {
    /// Both fields are optional and default to those of [`TraceParams::default`]:
    ///
    /// ```json
    /// { "bounce_limit": 35, "backoff": 1e-6 }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let mut params = Self::default();

        if let Some(limit) = json.get("bounce_limit") {
            params.bounce_limit = limit
                .as_u64()
                .filter(|&n| n > 0)
                .ok_or("bounce_limit must be a positive integer")?
                .try_into()?;
        }

        if json.get("backoff").is_some() {
            params.backoff = float_field(json, "backoff")?;
            if !(params.backoff >= 0.) {
                return Err("backoff must not be negative".into());
            }
        }

        Ok(params)
    }
}

impl JsonSer for Outcome {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::String(
            match self {
                Outcome::HitWall => "hit_wall",
                Outcome::HitGoal => "hit_goal",
                Outcome::Escaped => "escaped",
                Outcome::BounceLimitReached => "bounce_limit_reached",
            }
            .into(),
        )
    }
}

impl JsonDes for Outcome {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        match json.as_str().ok_or("outcome must be a string")? {
            "hit_wall" => Ok(Outcome::HitWall),
            "hit_goal" => Ok(Outcome::HitGoal),
            "escaped" => Ok(Outcome::Escaped),
            "bounce_limit_reached" => Ok(Outcome::BounceLimitReached),
            other => Err(format!("unknown outcome: {other}").into()),
        }
    }
}

impl JsonSer for TraceResult {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "outcome": self.outcome().to_json(),
            "segments": self.segments().to_json(),
        })
    }
}

impl JsonDes for TraceResult {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        TraceResult::new(
            Vec::from_json(field(json, "segments")?)?,
            Outcome::from_json(field(json, "outcome")?)?,
        )
        .ok_or_else(|| "a path must have at least one segment, and be continuous".into())
    }
}

impl JsonSer for ObstacleSnapshot {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "extent": self.extent,
            "goal": self.goal.to_json(),
            "mirrors": self.mirrors.to_json(),
            "walls": self.walls.to_json(),
        })
    }
}

impl JsonDes for ObstacleSnapshot {
    /// ```json
    /// {
    ///     "extent": 2000.0,
    ///     "goal": { "center": [x, y], "radius": 35.0 },
    ///     "mirrors": [ { "start": [x, y], "end": [x, y] }, ... ], // optional
    ///     "walls": [ { "start": [x, y], "end": [x, y] }, ... ], // optional
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let extent = float_field(json, "extent")?;

        if !(extent > 0. && extent.is_finite()) {
            return Err("extent must be positive".into());
        }

        let segments = |name: &str| -> Result<Vec<Segment>, Box<dyn Error>> {
            json.get(name).map_or(Ok(Vec::new()), Vec::from_json)
        };

        Ok(Self::new(Circle::from_json(field(json, "goal")?)?, extent)
            .with_mirrors(segments("mirrors")?)
            .with_walls(segments("walls")?))
    }
}

/// A scene file: obstacles, and optionally, where rays are cast from and toward.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub obstacles: ObstacleSnapshot,
    pub source: Option<Point>,
    /// The end points of the drags cast from `source`
    pub casts: Vec<Point>,
    pub params: TraceParams,
}

impl Scene {
    #[inline]
    pub fn new(obstacles: ObstacleSnapshot) -> Self {
        Self {
            obstacles,
            source: None,
            casts: Vec::new(),
            params: TraceParams::default(),
        }
    }

    /// The rays fired by this scene's casts.
    ///
    /// Casts no longer than [`CAST_THRESHOLD`] are skipped.
    pub fn rays(&self) -> impl Iterator<Item = Ray> + '_ {
        self.source.into_iter().flat_map(move |source| {
            self.casts.iter().filter_map(move |&cast| {
                let ray = Ray::from_cast(source, cast, CAST_THRESHOLD);
                if ray.is_none() {
                    log::warn!("skipping cast toward ({}, {}): too short", cast.x, cast.y);
                }
                ray
            })
        })
    }
}

impl JsonSer for Scene {
    fn to_json(&self) -> serde_json::Value {
        let mut json = self.obstacles.to_json();

        if let Some(object) = json.as_object_mut() {
            if let Some(source) = &self.source {
                object.insert("source".into(), source.to_json());
            }
            object.insert("casts".into(), self.casts.to_json());
            object.insert("params".into(), self.params.to_json());
        }

        json
    }
}

impl JsonDes for Scene {
    /// A scene is a serialized [`ObstacleSnapshot`] with the following optional, additional fields:
    ///
    /// ```json
    /// {
    ///     "source": [x, y],
    ///     "casts": [ [x, y], ... ], // requires "source"
    ///     "params": { "bounce_limit": 35, "backoff": 1e-6 },
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let source = json.get("source").map(Point::from_json).transpose()?;

        let casts = json
            .get("casts")
            .map_or(Ok(Vec::new()), Vec::<Point>::from_json)?;

        if source.is_none() && !casts.is_empty() {
            return Err("casts require a source".into());
        }

        let params = json
            .get("params")
            .map_or(Ok(TraceParams::default()), TraceParams::from_json)?;

        Ok(Self {
            obstacles: ObstacleSnapshot::from_json(json)?,
            source,
            casts,
            params,
        })
    }
}

/// The report printed after running a scene: every trace, then every retained
/// path with its virtual source position.
pub fn serialize_report(traces: &[TraceResult], registry: &PathRegistry) -> serde_json::Value {
    serde_json::json!({
        "traces": traces.to_json(),
        "retained": Vec::from_iter(registry.paths().iter().map(|path| serde_json::json!({
            "segments": path.segments().to_json(),
            "virtual_source": path.virtual_source().to_json(),
        }))),
    })
}
