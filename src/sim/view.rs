//! Per-frame draw data for the presentation layer
//!
//! The simulation never draws. Each frame the frontend asks for a
//! `FrameView`: visible sprites in world space with their screen x, the
//! camera offset, HUD values and whatever menu chrome the phase shows.

use serde::Serialize;

use super::rect::Rect;
use super::state::{Facing, GamePhase, GameState};
use crate::settings::Settings;
use crate::ui::{self, Button, Overlay};

/// Heart icons in the HUD
pub const HEART_SIZE: f32 = 30.0;
pub const HEART_SPACING: f32 = 40.0;
pub const HEART_ORIGIN: f32 = 30.0;

/// Background scrolls at half the camera speed
pub const BACKGROUND_PARALLAX: f32 = 0.5;

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Platform,
    Projectile,
    Enemy,
    Coin,
    Goal,
    Player,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// World-space rectangle
    pub rect: Rect,
    /// `rect.x - camera_x`
    pub screen_x: f32,
    /// Mirror horizontally (facing left)
    pub flip: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub lives: u32,
    /// One rectangle per remaining life, in screen space
    pub hearts: Vec<Rect>,
    pub coins: u32,
    pub level: u32,
    pub level_name: String,
    /// Player is inside an invincibility window (frontends may blink it)
    pub invincible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub camera_x: f32,
    /// Background scroll offset, `camera_x * BACKGROUND_PARALLAX`
    pub background_x: f32,
    /// Back-to-front draw order
    pub sprites: Vec<Sprite>,
    pub hud: Option<Hud>,
    pub buttons: Vec<Button>,
    pub overlay: Option<Overlay>,
}

/// HUD heart rectangles for `lives`
pub fn heart_rects(lives: u32) -> Vec<Rect> {
    (0..lives)
        .map(|i| {
            Rect::new(
                HEART_ORIGIN + i as f32 * HEART_SPACING,
                HEART_ORIGIN,
                HEART_SIZE,
                HEART_SIZE,
            )
        })
        .collect()
}

/// Build the draw data for the current state
pub fn build_frame_view(state: &GameState, settings: &Settings) -> FrameView {
    let phase = state.phase;
    let buttons = ui::buttons_for(phase, settings);
    let overlay = ui::overlay_for(phase);

    if phase == GamePhase::Menu {
        return FrameView {
            phase,
            camera_x: 0.0,
            background_x: 0.0,
            sprites: Vec::new(),
            hud: None,
            buttons,
            overlay,
        };
    }

    let camera_x = state.player.camera_x;
    let view_right = camera_x + settings.window_width;
    let level = &state.level;

    let capacity = level.platforms.len()
        + state.projectiles.len()
        + level.enemies.len()
        + level.coins.len()
        + 2;
    let mut sprites = Vec::with_capacity(capacity);
    let mut push = |kind: SpriteKind, rect: Rect, facing: Facing| {
        if rect.overlaps_span(camera_x, view_right) {
            sprites.push(Sprite {
                kind,
                rect,
                screen_x: rect.x - camera_x,
                flip: facing == Facing::Left,
            });
        }
    };

    for platform in &level.platforms {
        push(SpriteKind::Platform, platform.rect, Facing::Right);
    }
    for projectile in &state.projectiles {
        push(SpriteKind::Projectile, projectile.rect, projectile.direction);
    }
    for enemy in &level.enemies {
        push(SpriteKind::Enemy, enemy.rect, enemy.facing);
    }
    for coin in &level.coins {
        push(SpriteKind::Coin, coin.rect, Facing::Right);
    }
    if let Some(goal) = &level.goal {
        push(SpriteKind::Goal, goal.rect, Facing::Right);
    }
    push(SpriteKind::Player, state.player.rect, state.player.facing);

    FrameView {
        phase,
        camera_x,
        background_x: camera_x * BACKGROUND_PARALLAX,
        sprites,
        hud: Some(Hud {
            lives: state.player.lives,
            hearts: heart_rects(state.player.lives),
            coins: state.player.coins,
            level: level.number,
            level_name: level.name.clone(),
            invincible: state.player.is_invincible(state.time_ticks),
        }),
        buttons,
        overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EnemySpawn, LevelData, Point};
    use crate::sim::state::EnemyKind;

    fn started(data: &LevelData, settings: &Settings) -> GameState {
        let mut state = GameState::new(5, settings);
        state.start_level(1, data, settings);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_menu_has_no_world() {
        let settings = Settings::default();
        let state = GameState::new(5, &settings);
        let view = build_frame_view(&state, &settings);
        assert!(view.sprites.is_empty());
        assert!(view.hud.is_none());
        assert_eq!(view.buttons.len(), 2);
    }

    #[test]
    fn test_culls_offscreen_sprites() {
        let settings = Settings::default();
        let data = LevelData {
            platforms: vec![
                Rect::new(0.0, 680.0, 500.0, 40.0),
                Rect::new(3000.0, 680.0, 500.0, 40.0),
            ],
            coins: vec![Point { x: 300.0, y: 500.0 }, Point { x: 3100.0, y: 500.0 }],
            enemies: vec![EnemySpawn {
                x: 2500.0,
                y: 600.0,
                kind: EnemyKind::Basic,
                patrol_radius: None,
            }],
            ..Default::default()
        };
        let state = started(&data, &settings);
        let view = build_frame_view(&state, &settings);

        let kinds: Vec<SpriteKind> = view.sprites.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SpriteKind::Platform, SpriteKind::Coin, SpriteKind::Player]
        );
    }

    #[test]
    fn test_screen_space_follows_camera() {
        let settings = Settings::default();
        let data = LevelData {
            coins: vec![Point { x: 2000.0, y: 500.0 }],
            ..Default::default()
        };
        let mut state = started(&data, &settings);
        state.player.camera_x = 1500.0;
        state.player.rect.x = 2100.0;

        let view = build_frame_view(&state, &settings);
        let coin = view
            .sprites
            .iter()
            .find(|s| s.kind == SpriteKind::Coin)
            .unwrap();
        assert_eq!(coin.screen_x, 500.0);
        assert_eq!(view.background_x, 750.0);
    }

    #[test]
    fn test_hud_hearts() {
        let settings = Settings::default();
        let mut state = started(&LevelData::default(), &settings);
        state.player.lives = 2;
        let hud = build_frame_view(&state, &settings).hud.unwrap();
        assert_eq!(hud.hearts.len(), 2);
        assert_eq!(hud.hearts[1], Rect::new(70.0, 30.0, 30.0, 30.0));
        assert_eq!(hud.level_name, "Level 1");
    }

    #[test]
    fn test_player_flip() {
        let settings = Settings::default();
        let mut state = started(&LevelData::default(), &settings);
        state.player.facing = Facing::Left;
        let view = build_frame_view(&state, &settings);
        let player = view.sprites.last().unwrap();
        assert_eq!(player.kind, SpriteKind::Player);
        assert!(player.flip);
    }
}
