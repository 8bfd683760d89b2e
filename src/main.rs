//! Sonchi's Adventure entry point
//!
//! Headless native runner. Loads settings and the level directory, then
//! drives an autopilot session through the simulation at the fixed tick
//! rate, logging events and audio cues.
//!
//! Usage: `sonchi-adventure [LEVELS_DIR] [--ticks N] [--seed N] [--trace]`

use std::process::ExitCode;

use sonchi_adventure::audio::AudioManager;
use sonchi_adventure::consts::SIM_HZ;
use sonchi_adventure::sim::{GameEvent, GamePhase, GameState, TickInput, build_frame_view, tick};
use sonchi_adventure::{LevelLibrary, LevelSource, Settings};

const SETTINGS_PATH: &str = "settings.json";
const DEFAULT_LEVELS_DIR: &str = "levels";
const DEFAULT_TICKS: u64 = 60 * SIM_HZ as u64;
/// Frame views are dumped once per simulated second in trace mode
const TRACE_INTERVAL: u64 = SIM_HZ as u64;

struct Options {
    levels_dir: String,
    ticks: u64,
    seed: u64,
    trace: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Options {
            levels_dir: DEFAULT_LEVELS_DIR.to_string(),
            ticks: DEFAULT_TICKS,
            seed: 0x5eed,
            trace: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ticks" => options.ticks = parse_number(&arg, args.next())?,
                "--seed" => options.seed = parse_number(&arg, args.next())?,
                "--trace" => options.trace = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
                dir => options.levels_dir = dir.to_string(),
            }
        }
        Ok(options)
    }
}

fn parse_number(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|e| format!("bad value for {flag}: {value} ({e})"))
}

/// Game instance holding all state
struct Game {
    settings: Settings,
    levels: LevelLibrary,
    state: GameState,
    audio: AudioManager,
    /// Left the title screen at least once
    started: bool,
    finished: bool,
}

impl Game {
    fn new(settings: Settings, levels: LevelLibrary, seed: u64) -> Self {
        let state = GameState::new(seed, &settings);
        let audio = AudioManager::new(&settings);
        Self {
            settings,
            levels,
            state,
            audio,
            started: false,
            finished: false,
        }
    }

    /// Scripted input: run right, hop and fire on a rhythm, confirm every prompt
    fn autopilot(&self) -> TickInput {
        let t = self.state.time_ticks;
        match self.state.phase {
            GamePhase::Menu | GamePhase::GameOver | GamePhase::LevelComplete => TickInput {
                confirm: true,
                ..Default::default()
            },
            GamePhase::Playing => TickInput {
                right: true,
                jump: t % 45 == 0 || t % 45 == 8,
                shoot: t % 30 == 0,
                ..Default::default()
            },
            GamePhase::Paused => TickInput {
                pause: true,
                ..Default::default()
            },
        }
    }

    fn step(&mut self) {
        if self.state.phase == GamePhase::Menu && self.started {
            self.finished = true;
            return;
        }

        let input = self.autopilot();
        tick(&mut self.state, &input, &self.settings, &self.levels);

        if self.state.phase != GamePhase::Menu {
            self.started = true;
        }

        for event in &self.state.events {
            match event {
                GameEvent::LevelStarted { level } => {
                    log::info!("Level {} started: {}", level, self.state.level.name)
                }
                GameEvent::AllLevelsComplete => log::info!("All levels complete"),
                GameEvent::LevelLoadFailed { level } => {
                    log::error!("Level {} failed to load, stopping", level);
                    self.finished = true;
                }
                GameEvent::QuitRequested => self.finished = true,
                other => log::debug!("{:?}", other),
            }
        }

        self.audio.handle_events(&self.state.events);
        self.audio.sync_music(self.state.phase);
        for cue in self.audio.drain() {
            log::trace!("audio {:?}", cue);
        }
    }

    fn trace_frame(&self) -> Result<(), serde_json::Error> {
        let view = build_frame_view(&self.state, &self.settings);
        println!("{}", serde_json::to_string(&view)?);
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: sonchi-adventure [LEVELS_DIR] [--ticks N] [--seed N] [--trace]");
            return ExitCode::from(2);
        }
    };

    log::info!("Sonchi's Adventure (headless) starting...");
    let settings = Settings::load(SETTINGS_PATH);
    let levels = LevelLibrary::open(&options.levels_dir);
    if levels.max_level() == 0 {
        log::error!("No levels found in {}", options.levels_dir);
        return ExitCode::FAILURE;
    }
    log::info!("Found {} levels in {}", levels.max_level(), options.levels_dir);

    let mut game = Game::new(settings, levels, options.seed);
    let mut ran = 0;
    while ran < options.ticks && !game.finished {
        game.step();
        ran += 1;
        if options.trace && ran % TRACE_INTERVAL == 0 {
            if let Err(e) = game.trace_frame() {
                log::error!("Failed to serialize frame: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let player = &game.state.player;
    println!(
        "ticks={} phase={:?} level={} lives={} coins={}",
        ran, game.state.phase, game.state.level.number, player.lives, player.coins
    );
    ExitCode::SUCCESS
}
