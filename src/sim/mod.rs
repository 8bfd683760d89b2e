//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per 1/60 s)
//! - Seeded RNG only (wanderer enemies draw from `GameState::rng`)
//! - Stable iteration order (level-data order, ids assigned at load)
//! - No rendering, audio or filesystem access; levels come in through `LevelSource`

pub mod collision;
pub mod patrol;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{Bounds, Contact, camera_x, step_body};
pub use patrol::PatrolPolicy;
pub use rect::Rect;
pub use state::{
    Coin, Enemy, EnemyKind, Facing, GameEvent, GamePhase, GameState, Goal, JumpKind, JumpState,
    Level, Platform, Player, Projectile,
};
pub use tick::{PlayerOutcome, TickInput, tick};
pub use view::{FrameView, Hud, Sprite, SpriteKind, build_frame_view};
