//! The in-memory map document and its on-disk JSON form.
//!
//! A map file looks like:
//!
//! ```json
//! {
//! "lines":[[x1,y1,x2,y2],...],
//! "powerups":[],
//! "spawns":[[x,y],...]
//! }
//! ```
//!
//! All coordinates are in normalized map space. An optional trailing
//! `"end zone":{x,y,w,h}` object is part of the schema; consumers must
//! tolerate its absence. There is no schema version field.

use crate::geometry::MapPoint;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A line obstacle: an ordered pair of grid-snapped map-space endpoints.
/// Degenerate segments (`p1 == p2`) are legal and preserved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p1: MapPoint,
    pub p2: MapPoint,
}

impl Segment {
    pub fn new(p1: MapPoint, p2: MapPoint) -> Self {
        Segment { p1, p2 }
    }
}

/// Collectible categories understood by the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PowerupKind {
    Hp,
    Bullet,
    Speed,
}

impl PowerupKind {
    fn as_str(self) -> &'static str {
        match self {
            PowerupKind::Hp => "hp",
            PowerupKind::Bullet => "bullet",
            PowerupKind::Speed => "speed",
        }
    }
}

/// A typed collectible. The schema is reserved; the editor has no UI to
/// place these, so its output always carries an empty `powerups` array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Powerup {
    pub p: MapPoint,
    pub kind: PowerupKind,
}

/// Optional goal rectangle in map space. Never emitted by the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndZone {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// The map under edit: an append-only list of segments in draw order,
/// plus the fixed spawn list. Owned by the editor session; created empty
/// and serialized once at exit.
#[derive(Clone, Debug)]
pub struct MapModel {
    segments: Vec<Segment>,
    powerups: Vec<Powerup>,
    spawns: Vec<MapPoint>,
    end_zone: Option<EndZone>,
}

impl MapModel {
    /// An empty map with the single center spawn.
    pub fn new() -> Self {
        MapModel {
            segments: Vec::new(),
            powerups: Vec::new(),
            spawns: vec![MapPoint::new(0.5, 0.5)],
            end_zone: None,
        }
    }

    /// Appends a completed segment. Insertion order is draw order and is
    /// preserved through serialization. There is no removal operation.
    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The editor never calls this; it exists so the full documented
    /// schema can be produced programmatically.
    pub fn add_powerup(&mut self, powerup: Powerup) {
        self.powerups.push(powerup);
    }

    pub fn set_end_zone(&mut self, end_zone: Option<EndZone>) {
        self.end_zone = end_zone;
    }
}

impl Default for MapModel {
    fn default() -> Self {
        MapModel::new()
    }
}

/// The output file could not be opened or written.
#[derive(Debug, Error)]
#[error("cannot write map to {}: {source}", path.display())]
pub struct WriteMapError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Serializes `model` to `path` in one pass. The file handle is scoped to
/// this call and flushed before returning on the success path.
pub fn write_map(model: &MapModel, path: &Path) -> Result<(), WriteMapError> {
    let io_err = |source| WriteMapError {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_map_to(model, &mut writer).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Streams the JSON text layout without building an intermediate tree.
/// Field order is `lines`, `powerups`, `spawns`, then `end zone` when set.
/// Numbers use the default `f64` formatting, so output is human-diffable
/// but not guaranteed byte-stable across platforms.
pub fn write_map_to(model: &MapModel, w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"{\n")?;
    w.write_all(b"\"lines\":[")?;
    for (i, seg) in model.segments.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        write!(w, "[{},{},{},{}]", seg.p1.x, seg.p1.y, seg.p2.x, seg.p2.y)?;
    }
    w.write_all(b"],\n\"powerups\":[")?;
    for (i, powerup) in model.powerups.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        write!(
            w,
            "{{\"p\":{{\"x\":{},\"y\":{}}},\"type\":\"{}\"}}",
            powerup.p.x,
            powerup.p.y,
            powerup.kind.as_str()
        )?;
    }
    w.write_all(b"],\n\"spawns\":[")?;
    for (i, spawn) in model.spawns.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        write!(w, "[{},{}]", spawn.x, spawn.y)?;
    }
    w.write_all(b"]")?;
    if let Some(zone) = model.end_zone {
        write!(
            w,
            ",\n\"end zone\":{{\"x\":{},\"y\":{},\"w\":{},\"h\":{}}}",
            zone.x, zone.y, zone.w, zone.h
        )?;
    }
    w.write_all(b"\n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn serialize(model: &MapModel) -> String {
        let mut buf = Vec::new();
        write_map_to(model, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn parse(model: &MapModel) -> Value {
        serde_json::from_str(&serialize(model)).unwrap()
    }

    // Integer-valued coordinates serialize without a decimal point, so
    // compare as f64 rather than relying on Value equality.
    fn tuples(value: &Value) -> Vec<Vec<f64>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|t| {
                t.as_array()
                    .unwrap()
                    .iter()
                    .map(|n| n.as_f64().unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_map() {
        let doc = parse(&MapModel::new());
        assert!(tuples(&doc["lines"]).is_empty());
        assert!(doc["powerups"].as_array().unwrap().is_empty());
        assert_eq!(tuples(&doc["spawns"]), vec![vec![0.5, 0.5]]);
        assert!(doc.get("end zone").is_none());
    }

    #[test]
    fn test_single_segment() {
        let mut model = MapModel::new();
        model.append(Segment::new(MapPoint::new(0.0, 0.0), MapPoint::new(0.25, 0.25)));
        let doc = parse(&model);
        assert_eq!(tuples(&doc["lines"]), vec![vec![0.0, 0.0, 0.25, 0.25]]);
    }

    #[test]
    fn test_degenerate_segment_kept() {
        let mut model = MapModel::new();
        let p = MapPoint::new(0.5, 0.5);
        model.append(Segment::new(p, p));
        let doc = parse(&model);
        assert_eq!(tuples(&doc["lines"]), vec![vec![0.5, 0.5, 0.5, 0.5]]);
    }

    #[test]
    fn test_segments_keep_commit_order() {
        let mut model = MapModel::new();
        model.append(Segment::new(MapPoint::new(0.0, 0.0), MapPoint::new(0.1, 0.1)));
        model.append(Segment::new(MapPoint::new(0.2, 0.2), MapPoint::new(0.3, 0.3)));
        let doc = parse(&model);
        assert_eq!(
            tuples(&doc["lines"]),
            vec![vec![0.0, 0.0, 0.1, 0.1], vec![0.2, 0.2, 0.3, 0.3]]
        );
    }

    #[test]
    fn test_field_order() {
        let out = serialize(&MapModel::new());
        let lines = out.find("\"lines\"").unwrap();
        let powerups = out.find("\"powerups\"").unwrap();
        let spawns = out.find("\"spawns\"").unwrap();
        assert!(lines < powerups && powerups < spawns);
    }

    #[test]
    fn test_end_zone_trails_when_set() {
        let mut model = MapModel::new();
        model.set_end_zone(Some(EndZone {
            x: 0.8,
            y: 0.8,
            w: 0.1,
            h: 0.1,
        }));
        let doc = parse(&model);
        assert_eq!(doc["end zone"]["x"].as_f64(), Some(0.8));
        assert_eq!(doc["end zone"]["w"].as_f64(), Some(0.1));
        let out = serialize(&model);
        assert!(out.find("\"spawns\"").unwrap() < out.find("\"end zone\"").unwrap());
    }

    #[test]
    fn test_powerup_shape() {
        let mut model = MapModel::new();
        model.add_powerup(Powerup {
            p: MapPoint::new(0.1, 0.2),
            kind: PowerupKind::Bullet,
        });
        let doc = parse(&model);
        assert_eq!(doc["powerups"][0]["p"]["x"].as_f64(), Some(0.1));
        assert_eq!(doc["powerups"][0]["type"], "bullet");
    }

    #[test]
    fn test_write_map_round_trip_through_file() {
        let path = std::env::temp_dir().join("mapedit-test-write.json");
        let mut model = MapModel::new();
        model.append(Segment::new(MapPoint::new(0.0, 0.0), MapPoint::new(0.25, 0.25)));
        write_map(&model, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(tuples(&doc["lines"]), vec![vec![0.0, 0.0, 0.25, 0.25]]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_map_unwritable_path() {
        let path = std::env::temp_dir().join("mapedit-no-such-dir/out.json");
        let err = write_map(&MapModel::new(), &path).unwrap_err();
        assert_eq!(err.path, path);
    }
}
