use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};

use crate::render::render;
use crate::terminal::{Command, parse_line};
use trimatch_core::game::snapshot::FrameSnapshot;
use trimatch_core::model::player::GameMode;
use trimatch_core::{AppInfo, Flow, GameConfig, GameSession, InputEvent, SetupError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid game setup: {0}")]
    Setup(#[from] SetupError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Play against the computer.
    Ai,
    /// Two people share the terminal.
    Friend,
}

impl From<ModeArg> for GameMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Ai => GameMode::VsOpponent,
            ModeArg::Friend => GameMode::VsPlayer,
        }
    }
}

/// Three-card memory matching in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "trimatch", author, version, about = "Memory Match - 3 Card Matching")]
pub struct Cli {
    /// Seed for board shuffles and the computer's random picks.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Board rows.
    #[arg(long, default_value_t = 6)]
    pub rows: u8,

    /// Board columns. Rows times columns must be divisible by 3.
    #[arg(long, default_value_t = 6)]
    pub cols: u8,

    /// Skip the menu and start straight away in this mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Do not sleep between ticks, and skip the display delays.
    #[arg(long)]
    pub no_delay: bool,

    /// Print the final frame as JSON on exit.
    #[arg(long)]
    pub frame_json: bool,

    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `trimatch_core=trace`).
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        let config = GameConfig::with_grid(self.rows, self.cols);
        if self.no_delay {
            config.without_delays()
        } else {
            config
        }
    }

    pub fn session(&self) -> Result<GameSession, CliError> {
        let config = self.game_config();
        let mut session = match self.seed {
            Some(seed) => GameSession::with_seed(config, seed)?,
            None => GameSession::new(config)?,
        };
        if let Some(mode) = self.mode {
            session.choose_mode(mode.into())?;
        }
        Ok(session)
    }
}

/// Drives a session from typed lines until the player quits or input runs out.
/// Returns the last frame.
pub fn run<R: BufRead, W: Write>(
    cli: &Cli,
    input: R,
    mut out: W,
) -> Result<FrameSnapshot, CliError> {
    let mut session = cli.session()?;
    let tick = Duration::from_millis(session.config().tick_millis);
    let mut lines = input.lines();
    info!(
        target: "trimatch_app",
        version = AppInfo::version(),
        seed = session.seed(),
        rows = cli.rows,
        cols = cli.cols,
        "session ready"
    );

    loop {
        let flow = if session.awaiting_input() {
            write!(out, "{}> ", render(&session.snapshot()))?;
            out.flush()?;
            let events = match lines.next() {
                None => vec![InputEvent::QuitRequested],
                Some(line) => match parse_line(&line?, &session) {
                    Command::Events(events) => events,
                    Command::Unknown(text) => {
                        writeln!(out, "Unrecognised input: {text}")?;
                        continue;
                    }
                },
            };
            debug!(target: "trimatch_app", events = events.len(), "input received");
            session.step(&events)
        } else {
            let flow = session.step(&[]);
            if !cli.no_delay {
                thread::sleep(tick);
            }
            flow
        };

        if flow == Flow::Exit {
            break;
        }
    }

    let last = session.snapshot();
    writeln!(out)?;
    write!(out, "{}", render(&last))?;
    if cli.frame_json {
        writeln!(out, "{}", last.to_json()?)?;
    }
    Ok(last)
}
