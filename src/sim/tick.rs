//! Fixed timestep simulation tick
//!
//! Runs the phase state machine and, while playing, advances the player,
//! enemies and projectiles by one frame. Level files are only touched at
//! phase transitions, through a `LevelSource`.

use glam::Vec2;

use super::collision::{camera_x, step_body};
use super::state::{Facing, GameEvent, GamePhase, GameState};
use crate::level::LevelSource;
use crate::settings::Settings;
use crate::ui::{self, MenuAction};

/// Input for a single tick
///
/// `left`/`right` are held keys; everything else is a one-shot press the
/// caller clears after the tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Pause toggle (ESC)
    pub pause: bool,
    /// Confirm (ENTER) on the menu and end-of-level screens
    pub confirm: bool,
    /// Pointer click in screen space
    pub click: Option<Vec2>,
}

/// What the player update asks the state machine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    Continue,
    GameOver,
    LevelComplete,
}

/// Advance the game by one tick
pub fn tick<L: LevelSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    settings: &Settings,
    levels: &L,
) {
    state.events.clear();

    match state.phase {
        GamePhase::Menu => {
            let clicked = click_action(state.phase, input, settings);
            if input.confirm || clicked == Some(MenuAction::StartGame) {
                new_game(state, settings, levels);
            } else if clicked == Some(MenuAction::Quit) {
                state.emit(GameEvent::QuitRequested);
            }
        }

        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                state.emit(GameEvent::Paused);
                return;
            }
            match step_playing(state, input, settings) {
                PlayerOutcome::Continue => {}
                PlayerOutcome::GameOver => {
                    log::info!("Game over on level {}", state.level.number);
                    state.phase = GamePhase::GameOver;
                    state.emit(GameEvent::GameOver);
                }
                PlayerOutcome::LevelComplete => {
                    log::info!(
                        "Level {} complete with {} coins",
                        state.level.number,
                        state.player.coins
                    );
                    state.phase = GamePhase::LevelComplete;
                    let level = state.level.number;
                    state.emit(GameEvent::LevelCompleted { level });
                }
            }
        }

        GamePhase::Paused => {
            let clicked = click_action(state.phase, input, settings);
            if input.pause || clicked == Some(MenuAction::Resume) {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::Resumed);
            } else if clicked == Some(MenuAction::QuitToMenu) {
                return_to_menu(state, settings);
            }
        }

        GamePhase::GameOver => {
            if input.confirm {
                // Retry the same level with full lives and the coins banked
                // when it started
                state.player.lives = settings.max_lives;
                state.player.coins = state.coins_at_level_start;
                let level = state.level.number;
                begin_level(state, level, settings, levels);
            }
        }

        GamePhase::LevelComplete => {
            if input.confirm {
                let next = state.level.number + 1;
                begin_level(state, next, settings, levels);
            }
        }
    }
}

/// Map a click to a button action for the buttons shown in `phase`
fn click_action(phase: GamePhase, input: &TickInput, settings: &Settings) -> Option<MenuAction> {
    let point = input.click?;
    ui::hit_test(&ui::buttons_for(phase, settings), point)
}

/// Fresh run from the title screen
fn new_game<L: LevelSource + ?Sized>(state: &mut GameState, settings: &Settings, levels: &L) {
    state.player.lives = settings.max_lives;
    state.player.coins = 0;
    state.coins_at_level_start = 0;
    begin_level(state, 1, settings, levels);
}

/// Load `number` and enter `Playing`, or fall back to the menu
fn begin_level<L: LevelSource + ?Sized>(
    state: &mut GameState,
    number: u32,
    settings: &Settings,
    levels: &L,
) -> bool {
    let max_level = levels.max_level();
    if number == 0 || max_level == 0 {
        log::warn!("Level {} not available (max {})", number, max_level);
        state.emit(GameEvent::LevelLoadFailed { level: number });
        return_to_menu(state, settings);
        return false;
    }
    if number > max_level {
        log::info!("No level {} (max {}), back to menu", number, max_level);
        state.emit(GameEvent::AllLevelsComplete);
        return_to_menu(state, settings);
        return false;
    }

    match levels.load(number) {
        Ok(data) => {
            state.start_level(number, &data, settings);
            state.phase = GamePhase::Playing;
            state.emit(GameEvent::LevelStarted { level: number });
            true
        }
        Err(e) => {
            log::warn!("Failed to load level {}: {}", number, e);
            state.emit(GameEvent::LevelLoadFailed { level: number });
            return_to_menu(state, settings);
            false
        }
    }
}

fn return_to_menu(state: &mut GameState, settings: &Settings) {
    state.clear_level(settings);
    state.phase = GamePhase::Menu;
    state.emit(GameEvent::ReturnedToMenu);
}

/// One frame of gameplay
fn step_playing(state: &mut GameState, input: &TickInput, settings: &Settings) -> PlayerOutcome {
    state.time_ticks += 1;

    if input.jump {
        if let Some(kind) = state.player.jump(settings) {
            state.emit(GameEvent::Jumped { kind });
        }
    }
    if input.shoot {
        let id = state.next_entity_id();
        let projectile = state.player.shoot(id, settings);
        state.projectiles.push(projectile);
        state.emit(GameEvent::Shot);
    }

    let outcome = update_player(state, input, settings);
    update_enemies(state, settings);
    update_projectiles(state);

    outcome
}

/// Move the player and resolve enemy, coin and goal overlaps
pub fn update_player(state: &mut GameState, input: &TickInput, settings: &Settings) -> PlayerOutcome {
    let now = state.time_ticks;
    let GameState {
        player,
        level,
        events,
        ..
    } = state;

    player.vel.x = 0.0;
    if input.left {
        player.vel.x = -settings.player_speed;
        player.facing = Facing::Left;
    }
    if input.right {
        player.vel.x = settings.player_speed;
        player.facing = Facing::Right;
    }

    let contact = step_body(
        &mut player.rect,
        &mut player.vel,
        level.platforms.iter().map(|p| &p.rect),
        settings.gravity,
        level.bounds(settings),
    );
    if contact.grounded {
        player.land();
    }
    player.camera_x = camera_x(player.rect.center_x(), level.width, settings.window_width);

    let mut outcome = PlayerOutcome::Continue;

    if !player.is_invincible(now) && level.enemies.iter().any(|e| e.rect.intersects(&player.rect)) {
        let out_of_lives = player.take_hit(now, settings);
        log::debug!("Player hit, {} lives left", player.lives);
        events.push(GameEvent::PlayerHit {
            lives_left: player.lives,
        });
        if out_of_lives {
            outcome = PlayerOutcome::GameOver;
        }
    }

    let player_rect = player.rect;
    level.coins.retain(|coin| {
        if coin.rect.intersects(&player_rect) {
            player.coins += 1;
            events.push(GameEvent::CoinCollected {
                total: player.coins,
            });
            false
        } else {
            true
        }
    });

    if outcome == PlayerOutcome::Continue
        && level
            .goal
            .is_some_and(|goal| goal.rect.intersects(&player.rect))
    {
        outcome = PlayerOutcome::LevelComplete;
    }

    outcome
}

/// Patrol AI plus shared physics for every enemy
pub fn update_enemies(state: &mut GameState, settings: &Settings) {
    let bounds = state.level.bounds(settings);
    for enemy in state.level.enemies.iter_mut() {
        enemy.update(&state.level.platforms, bounds, settings, &mut state.rng);
    }
}

/// Move projectiles; a hit removes the projectile and every enemy it touches
///
/// Removal is deferred to a compaction pass so an enemy killed by one
/// projectile can't absorb a second one in the same tick.
pub fn update_projectiles(state: &mut GameState) {
    let GameState {
        level,
        projectiles,
        events,
        ..
    } = state;

    let mut dead_enemies: Vec<u32> = Vec::new();
    let mut spent: Vec<u32> = Vec::new();

    for projectile in projectiles.iter_mut() {
        projectile.advance();

        let mut hit = false;
        for enemy in &level.enemies {
            if dead_enemies.contains(&enemy.id) || !projectile.rect.intersects(&enemy.rect) {
                continue;
            }
            dead_enemies.push(enemy.id);
            events.push(GameEvent::EnemyDefeated { enemy_id: enemy.id });
            hit = true;
        }

        if hit || projectile.out_of_bounds(level.width) {
            spent.push(projectile.id);
        }
    }

    if !dead_enemies.is_empty() {
        log::debug!("Enemies defeated: {:?}", dead_enemies);
        level.enemies.retain(|e| !dead_enemies.contains(&e.id));
    }
    projectiles.retain(|p| !spent.contains(&p.id));
}
