//! Sonchi's Adventure - a side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, patrol AI, game state)
//! - `level`: Level description files and level libraries
//! - `settings`: Immutable gameplay configuration
//! - `ui`: Menu button layout and pointer hit-testing
//! - `audio`: Sound cues derived from simulation events

pub mod audio;
pub mod level;
pub mod settings;
pub mod sim;
pub mod ui;

pub use level::{InMemoryLevels, LevelData, LevelError, LevelLibrary, LevelSource};
pub use settings::Settings;

/// Default tuning values (pixels, pixels per tick, ticks)
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;

    /// Viewport dimensions
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;
    /// Default level width, in viewports
    pub const LEVEL_WIDTH_SCREENS: f32 = 3.0;

    /// Player
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 500.0;
    pub const JUMP_FORCE: f32 = -15.0;
    pub const DOUBLE_JUMP_FORCE: f32 = -12.0;
    pub const GRAVITY: f32 = 0.8;
    pub const MAX_LIVES: u32 = 3;
    /// One second of invincibility after a hit
    pub const INVINCIBILITY_TICKS: u64 = 60;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;
    /// Gap between the player's bounding box and a freshly fired projectile
    pub const PROJECTILE_SPAWN_GAP: f32 = 2.0;

    /// Enemies
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_SIZE: f32 = 80.0;
    pub const PATROL_RADIUS: f32 = 300.0;
    pub const ENEMY_JUMP_FORCE: f32 = -10.0;
    /// Per-tick chance that a grounded wanderer hops
    pub const ENEMY_JUMP_CHANCE: f64 = 0.01;
    /// Wanderer direction countdown range (ticks, inclusive)
    pub const WANDER_TURN_MIN: u32 = 60;
    pub const WANDER_TURN_MAX: u32 = 180;

    /// Pickups and markers
    pub const COIN_SIZE: f32 = 30.0;
    pub const GOAL_SIZE: f32 = 50.0;
}
