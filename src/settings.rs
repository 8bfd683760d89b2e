//! Gameplay settings
//!
//! One immutable configuration struct built at startup and passed by
//! reference to everything that needs speeds, gravity or window size.
//! Stored as JSON; any field missing from the file keeps its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    /// Viewport width in pixels
    pub window_width: f32,
    /// Viewport height in pixels (its bottom edge is the implicit floor)
    pub window_height: f32,
    /// Level width used when a level file doesn't specify one, in viewports
    pub level_width_screens: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    /// Spawn point used when a level file doesn't specify one
    pub spawn: Vec2,
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub gravity: f32,
    pub max_lives: u32,
    pub invincibility_ticks: u64,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_size: f32,
    pub patrol_radius: f32,
    pub enemy_jump_force: f32,
    pub enemy_jump_chance: f64,
    pub wander_turn_min: u32,
    pub wander_turn_max: u32,

    // === Pickups ===
    pub coin_size: f32,
    pub goal_size: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            level_width_screens: LEVEL_WIDTH_SCREENS,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            spawn: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            jump_force: JUMP_FORCE,
            double_jump_force: DOUBLE_JUMP_FORCE,
            gravity: GRAVITY,
            max_lives: MAX_LIVES,
            invincibility_ticks: INVINCIBILITY_TICKS,

            projectile_speed: PROJECTILE_SPEED,
            projectile_size: PROJECTILE_SIZE,

            enemy_speed: ENEMY_SPEED,
            enemy_size: ENEMY_SIZE,
            patrol_radius: PATROL_RADIUS,
            enemy_jump_force: ENEMY_JUMP_FORCE,
            enemy_jump_chance: ENEMY_JUMP_CHANCE,
            wander_turn_min: WANDER_TURN_MIN,
            wander_turn_max: WANDER_TURN_MAX,

            coin_size: COIN_SIZE,
            goal_size: GOAL_SIZE,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
        }
    }
}

impl Settings {
    /// Default level width in pixels
    pub fn default_level_width(&self) -> f32 {
        self.window_width * self.level_width_screens
    }

    /// Parse settings from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Keep hand-edited values inside ranges the simulation can work with
    fn sanitize(&mut self) {
        self.player_width = self.player_width.max(1.0);
        self.player_height = self.player_height.max(1.0);
        self.enemy_size = self.enemy_size.max(1.0);
        self.projectile_size = self.projectile_size.max(1.0);
        self.level_width_screens = self.level_width_screens.max(1.0);
        if self.wander_turn_min > self.wander_turn_max {
            std::mem::swap(&mut self.wander_turn_min, &mut self.wander_turn_max);
        }
        self.wander_turn_min = self.wander_turn_min.max(1);
        self.enemy_jump_chance = self.enemy_jump_chance.clamp(0.0, 1.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }
}
