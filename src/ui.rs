//! Menu buttons and overlay text
//!
//! Only geometry and hit-testing live here; drawing is up to the frontend.

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GamePhase, Rect};

pub const BUTTON_WIDTH: f32 = 200.0;
pub const BUTTON_HEIGHT: f32 = 50.0;

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuAction {
    StartGame,
    Quit,
    Resume,
    QuitToMenu,
}

/// A clickable button in screen space
#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
    pub action: MenuAction,
}

impl Button {
    fn centered(settings: &Settings, dy: f32, label: &'static str, action: MenuAction) -> Self {
        Self {
            rect: Rect::new(
                settings.window_width / 2.0 - BUTTON_WIDTH / 2.0,
                settings.window_height / 2.0 + dy,
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
            ),
            label,
            action,
        }
    }

    pub fn is_clicked(&self, point: Vec2) -> bool {
        self.rect.contains_point(point)
    }
}

/// Buttons shown during `phase`
pub fn buttons_for(phase: GamePhase, settings: &Settings) -> Vec<Button> {
    match phase {
        GamePhase::Menu => vec![
            Button::centered(settings, 0.0, "Start Game", MenuAction::StartGame),
            Button::centered(settings, 70.0, "Quit", MenuAction::Quit),
        ],
        GamePhase::Paused => vec![
            Button::centered(settings, -50.0, "Resume", MenuAction::Resume),
            Button::centered(settings, 20.0, "Quit to Menu", MenuAction::QuitToMenu),
        ],
        _ => Vec::new(),
    }
}

/// First button under `point`
pub fn hit_test(buttons: &[Button], point: Vec2) -> Option<MenuAction> {
    buttons
        .iter()
        .find(|b| b.is_clicked(point))
        .map(|b| b.action)
}

/// Centered text drawn over the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub title: &'static str,
    pub hint: Option<&'static str>,
    /// Dim the scene behind the text
    pub dimmed: bool,
}

pub fn overlay_for(phase: GamePhase) -> Option<Overlay> {
    let (title, hint, dimmed) = match phase {
        GamePhase::Menu => ("Sonchi's Adventure", None, false),
        GamePhase::Playing => return None,
        GamePhase::Paused => ("PAUSED", Some("Press ESC to continue"), true),
        GamePhase::GameOver => ("GAME OVER", Some("Press ENTER to restart"), true),
        GamePhase::LevelComplete => ("LEVEL COMPLETE!", Some("Press ENTER to continue"), true),
    };
    Some(Overlay { title, hint, dimmed })
}
