//! Game state and core simulation types
//!
//! Everything the tick mutates lives here and is owned by `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Contact, step_body};
use super::patrol::PatrolPolicy;
use super::rect::Rect;
use crate::level::LevelData;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives, waiting for confirm to retry the level
    GameOver,
    /// Goal reached, waiting for confirm to advance
    LevelComplete,
}

/// Horizontal facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Where the player is in the jump chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    #[default]
    Grounded,
    SingleJumped,
    DoubleJumped,
}

/// Which jump of the chain was performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JumpKind {
    Single,
    Double,
}

/// Enemy behavior tag from level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Randomized walker
    #[serde(alias = "random")]
    Wanderer,
    /// Deterministic back-and-forth patrol (also used for unknown tags)
    #[default]
    #[serde(other)]
    Basic,
}

/// Something that happened during a tick, for audio/UI to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Jumped { kind: JumpKind },
    Shot,
    CoinCollected { total: u32 },
    PlayerHit { lives_left: u32 },
    EnemyDefeated { enemy_id: u32 },
    LevelCompleted { level: u32 },
    GameOver,
    /// Advanced past the last level
    AllLevelsComplete,
    /// A level file was missing or corrupt
    LevelLoadFailed { level: u32 },
    Paused,
    Resumed,
    ReturnedToMenu,
    /// The player clicked Quit on the title screen
    QuitRequested,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub facing: Facing,
    pub jump_state: JumpState,
    pub lives: u32,
    pub coins: u32,
    /// Tick at which the current invincibility window ends
    pub invincible_until: Option<u64>,
    /// Horizontal scroll derived from the player position each tick
    pub camera_x: f32,
}

impl Player {
    pub fn new(spawn: Vec2, settings: &Settings) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, settings.player_width, settings.player_height),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            jump_state: JumpState::Grounded,
            lives: settings.max_lives,
            coins: 0,
            invincible_until: None,
            camera_x: 0.0,
        }
    }

    /// Put the player back at a spawn point, clearing transient state
    ///
    /// Lives and coins are kept.
    pub fn respawn(&mut self, spawn: Vec2, settings: &Settings) {
        let lives = self.lives;
        let coins = self.coins;
        *self = Self::new(spawn, settings);
        self.lives = lives;
        self.coins = coins;
    }

    /// Advance the jump chain
    ///
    /// Returns the jump performed, or `None` once both jumps are spent.
    pub fn jump(&mut self, settings: &Settings) -> Option<JumpKind> {
        match self.jump_state {
            JumpState::Grounded => {
                self.vel.y = settings.jump_force;
                self.jump_state = JumpState::SingleJumped;
                Some(JumpKind::Single)
            }
            JumpState::SingleJumped => {
                self.vel.y = settings.double_jump_force;
                self.jump_state = JumpState::DoubleJumped;
                Some(JumpKind::Double)
            }
            JumpState::DoubleJumped => None,
        }
    }

    /// Landing re-arms the jump chain
    pub fn land(&mut self) {
        self.jump_state = JumpState::Grounded;
    }

    pub fn is_invincible(&self, now: u64) -> bool {
        matches!(self.invincible_until, Some(until) if now < until)
    }

    /// Lose a life and start the invincibility window
    ///
    /// Returns true when this hit used up the last life.
    pub fn take_hit(&mut self, now: u64, settings: &Settings) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.invincible_until = Some(now + settings.invincibility_ticks);
        self.lives == 0
    }

    /// Build a projectile just outside the bounding box on the facing side
    pub fn shoot(&self, id: u32, settings: &Settings) -> Projectile {
        let size = settings.projectile_size;
        let gap = crate::consts::PROJECTILE_SPAWN_GAP;
        let x = match self.facing {
            Facing::Right => self.rect.right() + gap,
            Facing::Left => self.rect.left() - gap - size,
        };
        Projectile {
            id,
            rect: Rect::new(x, self.rect.center_y() - size / 2.0, size, size),
            direction: self.facing,
            speed: settings.projectile_speed,
        }
    }
}

/// A patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub vel: Vec2,
    pub facing: Facing,
    pub speed: f32,
    /// Standing on something after the last physics step
    pub grounded: bool,
    pub policy: PatrolPolicy,
}

impl Enemy {
    /// Steer, run physics, then let the policy react to what was touched
    pub fn update(
        &mut self,
        platforms: &[Platform],
        bounds: Bounds,
        settings: &Settings,
        rng: &mut Pcg32,
    ) -> Contact {
        if let Some(jump_vel) = self.policy.steer(&mut self.facing, self.grounded, settings, rng) {
            self.vel.y = jump_vel;
        }
        self.vel.x = self.speed * self.facing.sign();

        let contact = step_body(
            &mut self.rect,
            &mut self.vel,
            platforms.iter().map(|p| &p.rect),
            settings.gravity,
            bounds,
        );
        self.grounded = contact.grounded;

        let support = contact.ground.and_then(|i| platforms.get(i)).map(|p| &p.rect);
        self.policy.react(&mut self.facing, &self.rect, support, contact);

        contact
    }
}

/// A player projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub rect: Rect,
    pub direction: Facing,
    pub speed: f32,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.rect.x += self.speed * self.direction.sign();
    }

    /// Fully outside `[0, level_width]`
    pub fn out_of_bounds(&self, level_width: f32) -> bool {
        self.rect.right() < 0.0 || self.rect.left() > level_width
    }
}

/// Static level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
}

/// A collectible coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
}

/// The level-end flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub rect: Rect,
}

/// The active level: static geometry plus live enemies and coins
#[derive(Debug, Clone)]
pub struct Level {
    /// 1-based level number (0 when no level is loaded)
    pub number: u32,
    pub name: String,
    pub width: f32,
    pub spawn: Vec2,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub goal: Option<Goal>,
}

impl Level {
    /// Placeholder while sitting in the menu
    pub fn empty(settings: &Settings) -> Self {
        Self {
            number: 0,
            name: String::new(),
            width: settings.default_level_width(),
            spawn: settings.spawn,
            platforms: Vec::new(),
            enemies: Vec::new(),
            coins: Vec::new(),
            goal: None,
        }
    }

    pub fn bounds(&self, settings: &Settings) -> Bounds {
        Bounds {
            level_width: self.width,
            floor_y: settings.window_height,
        }
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of all gameplay randomness
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    pub level: Level,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    /// Gameplay ticks simulated (frozen outside `Playing`)
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Coins banked when the current level started, restored on retry
    pub coins_at_level_start: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game sitting in the menu
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            level: Level::empty(settings),
            player: Player::new(settings.spawn, settings),
            projectiles: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            coins_at_level_start: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Build the runtime level and reset every per-level collection
    ///
    /// Player lives and coins survive; position, velocity, jump chain and
    /// invincibility do not.
    pub fn start_level(&mut self, number: u32, data: &LevelData, settings: &Settings) {
        let spawn = data
            .spawn
            .map(|p| Vec2::new(p.x, p.y))
            .unwrap_or(settings.spawn);

        let platforms = data
            .platforms
            .iter()
            .map(|&rect| Platform { rect })
            .collect();

        let mut enemies = Vec::with_capacity(data.enemies.len());
        for spawn_point in &data.enemies {
            let id = self.next_entity_id();
            let radius = spawn_point.patrol_radius.unwrap_or(settings.patrol_radius);
            enemies.push(Enemy {
                id,
                kind: spawn_point.kind,
                rect: Rect::new(
                    spawn_point.x,
                    spawn_point.y,
                    settings.enemy_size,
                    settings.enemy_size,
                ),
                vel: Vec2::ZERO,
                facing: Facing::Right,
                speed: settings.enemy_speed,
                grounded: false,
                policy: PatrolPolicy::for_kind(
                    spawn_point.kind,
                    spawn_point.x,
                    radius,
                    settings,
                    &mut self.rng,
                ),
            });
        }

        let mut coins = Vec::with_capacity(data.coins.len());
        for point in &data.coins {
            let id = self.next_entity_id();
            coins.push(Coin {
                id,
                rect: Rect::new(point.x, point.y, settings.coin_size, settings.coin_size),
            });
        }

        let goal = data.end_position.map(|p| Goal {
            rect: Rect::new(p.x, p.y, settings.goal_size, settings.goal_size),
        });

        self.level = Level {
            number,
            name: data
                .name
                .clone()
                .unwrap_or_else(|| format!("Level {}", number)),
            // Never narrower than one viewport, so every body fits between the walls
            width: data
                .width
                .unwrap_or_else(|| settings.default_level_width())
                .max(settings.window_width),
            spawn,
            platforms,
            enemies,
            coins,
            goal,
        };
        self.projectiles.clear();
        self.player.respawn(spawn, settings);
        self.coins_at_level_start = self.player.coins;

        log::info!(
            "Level {} '{}': {} platforms, {} enemies, {} coins",
            number,
            self.level.name,
            self.level.platforms.len(),
            self.level.enemies.len(),
            self.level.coins.len()
        );
    }

    /// Drop the active level (back to the title screen)
    pub fn clear_level(&mut self, settings: &Settings) {
        self.level = Level::empty(settings);
        self.projectiles.clear();
    }
}
