//! Level description files
//!
//! Levels live in a directory as `level1.json`, `level2.json`, ... and are
//! only read at state-transition boundaries, never inside a tick.
//! A missing or corrupt file is a recoverable `LevelError`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::Rect;
use crate::sim::state::EnemyKind;

/// Validation limits for hand-authored level files
pub mod limits {
    /// Maximum entities of any one kind in a level
    pub const MAX_ENTITIES: usize = 4096;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// A point in a level file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Enemy placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    /// Behavior tag ("basic", "wanderer"); unknown tags patrol like "basic"
    #[serde(default, rename = "type")]
    pub kind: EnemyKind,
    /// Override for the patrol radius of "basic" enemies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol_radius: Option<f32>,
}

/// One level as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Display name (defaults to "Level N")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Level width in pixels (defaults to the settings' level width)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Player spawn point (defaults to the settings' spawn point)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn: Option<Point>,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub coins: Vec<Point>,
    /// Goal flag position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_position: Option<Point>,
}

impl LevelData {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Reject geometry the simulation can't work with
    pub fn validate(&self) -> Result<(), LevelError> {
        let counts = [
            ("platforms", self.platforms.len()),
            ("enemies", self.enemies.len()),
            ("coins", self.coins.len()),
        ];
        for (what, count) in counts {
            if count > limits::MAX_ENTITIES {
                return Err(LevelError::Invalid(format!(
                    "too many {} ({} > {})",
                    what,
                    count,
                    limits::MAX_ENTITIES
                )));
            }
        }

        for (i, p) in self.platforms.iter().enumerate() {
            if !is_valid_coord(p.x) || !is_valid_coord(p.y) {
                return Err(LevelError::Invalid(format!("platform {}: bad position", i)));
            }
            if !(p.w >= 0.0 && p.h >= 0.0 && p.w.is_finite() && p.h.is_finite()) {
                return Err(LevelError::Invalid(format!(
                    "platform {}: negative or invalid size {}x{}",
                    i, p.w, p.h
                )));
            }
        }
        for (i, e) in self.enemies.iter().enumerate() {
            if !is_valid_coord(e.x) || !is_valid_coord(e.y) {
                return Err(LevelError::Invalid(format!("enemy {}: bad position", i)));
            }
            if let Some(radius) = e.patrol_radius {
                if !(radius >= 0.0 && radius.is_finite()) {
                    return Err(LevelError::Invalid(format!(
                        "enemy {}: invalid patrol radius {}",
                        i, radius
                    )));
                }
            }
        }
        for (i, c) in self.coins.iter().enumerate() {
            if !is_valid_coord(c.x) || !is_valid_coord(c.y) {
                return Err(LevelError::Invalid(format!("coin {}: bad position", i)));
            }
        }
        if let Some(width) = self.width {
            if !(width > 0.0 && is_valid_coord(width)) {
                return Err(LevelError::Invalid(format!("invalid level width {}", width)));
            }
        }
        for point in self.spawn.iter().chain(self.end_position.iter()) {
            if !is_valid_coord(point.x) || !is_valid_coord(point.y) {
                return Err(LevelError::Invalid("bad spawn or goal position".to_string()));
            }
        }
        Ok(())
    }
}

/// Check if a coordinate is usable (not NaN/Inf, not absurdly large)
fn is_valid_coord(v: f32) -> bool {
    v.is_finite() && v.abs() <= limits::MAX_COORD
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    /// No level with this number exists
    NotFound(u32),
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::NotFound(n) => write!(f, "Level {} not found", n),
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::Invalid(e) => write!(f, "Invalid level: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::IoError(e) => Some(e),
            LevelError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

/// Anything that can hand out numbered levels (1-based)
pub trait LevelSource {
    /// Highest level number available (0 when there are none)
    fn max_level(&self) -> u32;

    /// Load level `number`
    fn load(&self, number: u32) -> Result<LevelData, LevelError>;
}

/// Levels read from `levelN.json` files in a directory
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    dir: PathBuf,
    max_level: u32,
}

impl LevelLibrary {
    /// Scan a directory for level files
    ///
    /// An unreadable directory yields an empty library rather than an error,
    /// so the menu still comes up.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let max_level = scan_max_level(&dir);
        log::info!("Level library {}: {} level(s)", dir.display(), max_level);
        Self { dir, max_level }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, number: u32) -> PathBuf {
        self.dir.join(format!("level{}.json", number))
    }
}

/// Highest N among `levelN.json` entries in `dir`
fn scan_max_level(dir: &Path) -> u32 {
    let Ok(entries) = fs::read_dir(dir) else {
        log::warn!("Cannot read level directory {}", dir.display());
        return 0;
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| level_number(&entry.file_name().to_string_lossy()))
        .max()
        .unwrap_or(0)
}

/// Parse `level12.json` into 12
fn level_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("level")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

impl LevelSource for LevelLibrary {
    fn max_level(&self) -> u32 {
        self.max_level
    }

    fn load(&self, number: u32) -> Result<LevelData, LevelError> {
        let path = self.path_for(number);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LevelError::NotFound(number));
            }
            Err(e) => return Err(e.into()),
        };
        let data = LevelData::from_json(&json)?;
        log::info!("Loaded level {} from {}", number, path.display());
        Ok(data)
    }
}

/// Levels held in memory (tests, embedded campaigns)
#[derive(Debug, Clone, Default)]
pub struct InMemoryLevels {
    levels: Vec<LevelData>,
}

impl InMemoryLevels {
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }
}

impl LevelSource for InMemoryLevels {
    fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    fn load(&self, number: u32) -> Result<LevelData, LevelError> {
        let index = number.checked_sub(1).ok_or(LevelError::NotFound(number))?;
        let data = self
            .levels
            .get(index as usize)
            .cloned()
            .ok_or(LevelError::NotFound(number))?;
        data.validate()?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL_JSON: &str = r#"{
        "name": "Green Hills",
        "platforms": [{"x": 0, "y": 650, "width": 800, "height": 70}],
        "enemies": [
            {"x": 400, "y": 570},
            {"x": 900, "y": 570, "type": "wanderer"},
            {"x": 1200, "y": 570, "type": "spiky"}
        ],
        "coins": [{"x": 300, "y": 500}],
        "end_position": {"x": 3700, "y": 600}
    }"#;

    #[test]
    fn test_parse_level() {
        let data = LevelData::from_json(LEVEL_JSON).unwrap();
        assert_eq!(data.name.as_deref(), Some("Green Hills"));
        assert_eq!(data.platforms.len(), 1);
        assert_eq!(data.platforms[0].w, 800.0);
        assert_eq!(data.enemies[0].kind, EnemyKind::Basic);
        assert_eq!(data.enemies[1].kind, EnemyKind::Wanderer);
        // Unknown tags fall back to the default patrol
        assert_eq!(data.enemies[2].kind, EnemyKind::Basic);
        assert_eq!(data.end_position, Some(Point { x: 3700.0, y: 600.0 }));
        assert!(data.width.is_none());
    }

    #[test]
    fn test_empty_object_is_a_valid_level() {
        let data = LevelData::from_json("{}").unwrap();
        assert!(data.platforms.is_empty());
        assert!(data.end_position.is_none());
    }

    #[test]
    fn test_negative_platform_rejected() {
        let json = r#"{"platforms": [{"x": 0, "y": 0, "width": -5, "height": 10}]}"#;
        assert!(matches!(LevelData::from_json(json), Err(LevelError::Invalid(_))));
    }

    #[test]
    fn test_corrupt_json_is_parse_error() {
        assert!(matches!(
            LevelData::from_json("{\"platforms\": [}"),
            Err(LevelError::ParseError(_))
        ));
    }

    #[test]
    fn test_level_number() {
        assert_eq!(level_number("level1.json"), Some(1));
        assert_eq!(level_number("level12.json"), Some(12));
        assert_eq!(level_number("level.json"), None);
        assert_eq!(level_number("bonus1.json"), None);
        assert_eq!(level_number("level3.json.bak"), None);
    }

    #[test]
    fn test_library_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("level1.json"), LEVEL_JSON).unwrap();
        fs::write(dir.path().join("level3.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        let library = LevelLibrary::open(dir.path());
        assert_eq!(library.max_level(), 3);
        assert!(library.load(1).is_ok());
        assert!(matches!(library.load(2), Err(LevelError::NotFound(2))));
        assert!(library.load(3).is_ok());
    }

    #[test]
    fn test_library_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("level1.json"), "not json").unwrap();

        let library = LevelLibrary::open(dir.path());
        let err = library.load(1).unwrap_err();
        assert!(matches!(err, LevelError::ParseError(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let library = LevelLibrary::open("/no/such/level/dir");
        assert_eq!(library.max_level(), 0);
        assert!(matches!(library.load(1), Err(LevelError::NotFound(1))));
    }

    #[test]
    fn test_in_memory_levels() {
        let levels = InMemoryLevels::new(vec![LevelData::default(), LevelData::default()]);
        assert_eq!(levels.max_level(), 2);
        assert!(levels.load(1).is_ok());
        assert!(matches!(levels.load(0), Err(LevelError::NotFound(0))));
        assert!(matches!(levels.load(3), Err(LevelError::NotFound(3))));
    }
}
