mod human;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use trimatch_core::model::player::{GameMode, PlayerSlot};
use trimatch_core::model::score::MatchOutcome;
use trimatch_core::{GameSession, InputEvent, SessionState, SetupError};

use crate::config::{AgentConfig, AgentKind, BenchConfig, ResolvedOutputs};
use crate::logging::{GAME_TARGET, TELEMETRY_FILE, telemetry_dir};

pub use human::SimulatedHuman;

const HUMAN_SLOT: PlayerSlot = PlayerSlot::One;
const OPPONENT_SLOT: PlayerSlot = PlayerSlot::Two;

/// Plays many headless games of a stand-in human against the memory opponent.
pub struct SimulationRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    human: AgentConfig,
    opponent: AgentConfig,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub tally: Tally,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

/// Win, tie and point totals across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub games: usize,
    pub human_wins: usize,
    pub opponent_wins: usize,
    pub ties: usize,
    pub human_points: u64,
    pub opponent_points: u64,
}

impl Tally {
    fn record(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        match outcome.outcome {
            MatchOutcome::Winner(HUMAN_SLOT) => self.human_wins += 1,
            MatchOutcome::Winner(_) => self.opponent_wins += 1,
            MatchOutcome::Tie => self.ties += 1,
        }
        self.human_points += u64::from(outcome.scores[HUMAN_SLOT.index()]);
        self.opponent_points += u64::from(outcome.scores[OPPONENT_SLOT.index()]);
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.games as f64
        }
    }

    fn mean(&self, points: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            points as f64 / self.games as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GameOutcome {
    scores: [u32; 2],
    outcome: MatchOutcome,
    turns: u32,
    steps: usize,
}

#[derive(Debug, Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_index: usize,
    seed: u64,
    human: &'a str,
    human_kind: AgentKind,
    opponent: &'a str,
    scores: [u32; 2],
    winner: &'a str,
    turns: u32,
    steps: usize,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let human = config
            .human()
            .cloned()
            .ok_or(RunnerError::MissingAgent { role: "human" })?;
        let opponent = config
            .opponent()
            .cloned()
            .ok_or(RunnerError::MissingAgent { role: "opponent" })?;
        config.games.board.validate()?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            human,
            opponent,
        })
    }

    /// Plays every game, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut tally = Tally::default();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let seed = rng.next_u64();
            let outcome = self.play_game(game_index, seed)?;
            tally.record(&outcome);
            self.write_row(&mut writer, game_index, seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;
        self.write_markdown(&self.outputs.summary_md, &tally)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join(TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: tally.games,
            rows_written,
            tally,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_game(&self, game_index: usize, seed: u64) -> Result<GameOutcome, RunnerError> {
        let mut session = GameSession::with_seed(self.config.games.board, seed)?;
        session.choose_mode(GameMode::VsOpponent)?;
        let mut human = SimulatedHuman::new(self.human.kind, seed)
            .ok_or(RunnerError::MissingAgent { role: "human" })?;

        let mut steps = 0usize;
        while session.state() == SessionState::Playing {
            if steps >= self.config.games.max_steps {
                return Err(RunnerError::StepCap { game_index, steps });
            }

            let mut events = Vec::new();
            if let Some(board) = session.board() {
                human.observe(board);
                if session.awaiting_input() {
                    let press = human
                        .choose(board, session.turns_played())
                        .and_then(|id| board.card(id))
                        .map(|card| session.cell_center(card.pos().row, card.pos().col));
                    events.extend(press.map(InputEvent::PointerDown));
                }
            }
            session.step(&events);
            steps += 1;
        }

        let scores = session.scores();
        let outcome = GameOutcome {
            scores: *scores.standings(),
            outcome: scores.outcome(),
            turns: session.turns_played(),
            steps,
        };

        if self.logging_enabled && tracing::enabled!(target: GAME_TARGET, Level::INFO) {
            event!(
                target: GAME_TARGET,
                Level::INFO,
                run_id = %self.config.run_id,
                game_index = game_index as u64,
                seed,
                human_score = outcome.scores[HUMAN_SLOT.index()],
                opponent_score = outcome.scores[OPPONENT_SLOT.index()],
                winner = self.winner_label(outcome.outcome),
                turns = outcome.turns,
                steps = outcome.steps as u64
            );
        }

        Ok(outcome)
    }

    fn winner_label(&self, outcome: MatchOutcome) -> &str {
        match outcome {
            MatchOutcome::Winner(HUMAN_SLOT) => self.human.name.as_str(),
            MatchOutcome::Winner(_) => self.opponent.name.as_str(),
            MatchOutcome::Tie => "tie",
        }
    }

    fn write_row(
        &self,
        writer: &mut BufWriter<File>,
        game_index: usize,
        seed: u64,
        outcome: &GameOutcome,
    ) -> Result<(), RunnerError> {
        let row = GameLogRow {
            run_id: &self.config.run_id,
            game_index,
            seed,
            human: &self.human.name,
            human_kind: self.human.kind,
            opponent: &self.opponent.name,
            scores: outcome.scores,
            winner: self.winner_label(outcome.outcome),
            turns: outcome.turns,
            steps: outcome.steps,
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn write_markdown(&self, path: &Path, tally: &Tally) -> Result<(), RunnerError> {
        let board = &self.config.games.board;
        let mut rows = String::new();
        rows.push_str("# Simulation Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} games on a {}x{} board\n\n",
            self.config.run_id, tally.games, board.rows, board.cols
        ));
        rows.push_str("| Agent | Kind | Seat | Wins | Win % | Mean score |\n");
        rows.push_str("|-------|------|------|------|-------|------------|\n");
        for (agent, slot, wins, points) in [
            (&self.human, HUMAN_SLOT, tally.human_wins, tally.human_points),
            (&self.opponent, OPPONENT_SLOT, tally.opponent_wins, tally.opponent_points),
        ] {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {slot} | {wins} | {rate:.1}% | {mean:.2} |\n",
                name = agent.name,
                kind = agent.kind,
                rate = tally.rate(wins),
                mean = tally.mean(points),
            ));
        }
        rows.push_str(&format!(
            "\nTies: {} ({:.1}%)\n",
            tally.ties,
            tally.rate(tally.ties)
        ));
        fs::write(path, rows)?;
        Ok(())
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("configuration has no {role} agent")]
    MissingAgent { role: &'static str },
    #[error("game {game_index} did not finish within {steps} steps")]
    StepCap { game_index: usize, steps: usize },
}
