//! Sound cues
//!
//! The simulation reports what happened as `GameEvent`s; this module turns
//! them into discrete cues with a resolved volume. A backend drains the
//! queue once per frame and plays whatever it got. Nothing here blocks.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Single or double jump
    Jump,
    /// Coin picked up
    Coin,
    /// Player touched an enemy
    Hit,
    /// Projectile fired
    Shoot,
    /// Projectile killed an enemy
    EnemyDefeated,
    /// Goal reached
    LevelComplete,
    /// Last life lost
    GameOver,
}

impl SoundEffect {
    /// Effect for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped { .. } => Some(SoundEffect::Jump),
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::EnemyDefeated { .. } => Some(SoundEffect::EnemyDefeated),
            GameEvent::LevelCompleted { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Background music transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MusicCue {
    Start,
    Stop,
}

/// One queued instruction for the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AudioCue {
    Effect { effect: SoundEffect, volume: f32 },
    Music { cue: MusicCue, volume: f32 },
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
    queue: Vec<AudioCue>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: false,
            music_playing: false,
            queue: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Queue a sound effect; silent cues are dropped
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_sfx_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push(AudioCue::Effect { effect, volume });
    }

    /// Queue effects for a tick's events, in event order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Music runs while playing and keeps going through pause
    pub fn sync_music(&mut self, phase: GamePhase) {
        let wanted = matches!(phase, GamePhase::Playing | GamePhase::Paused);
        if wanted == self.music_playing {
            return;
        }
        self.music_playing = wanted;
        let cue = if wanted { MusicCue::Start } else { MusicCue::Stop };
        self.queue.push(AudioCue::Music {
            cue,
            volume: self.effective_music_volume(),
        });
    }

    /// Take everything queued since the last drain
    pub fn drain(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.queue)
    }
}
