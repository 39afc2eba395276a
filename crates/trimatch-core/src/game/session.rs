use crate::config::GameConfig;
use crate::error::SetupError;
use crate::game::input::{InputEvent, Key};
use crate::game::snapshot::FrameSnapshot;
use crate::game::turn::{TurnContext, TurnController, TurnPhase, TurnResult};
use crate::memory::OpponentMemory;
use crate::model::board::Board;
use crate::model::clock::AnimationClock;
use crate::model::layout::{BoardLayout, Point};
use crate::model::player::{Actor, GameMode, PlayerSlot};
use crate::model::score::{MatchOutcome, ScoreBoard};
use core::fmt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Menu,
    Playing,
    GameOver,
    Exited,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Menu => "menu",
            SessionState::Playing => "playing",
            SessionState::GameOver => "game over",
            SessionState::Exited => "exited",
        };
        f.write_str(label)
    }
}

/// What the front-end should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone)]
struct Episode {
    board: Board,
    memory: OpponentMemory,
    scores: ScoreBoard,
    current: PlayerSlot,
    turn: TurnController,
    turns_played: u32,
}

impl Episode {
    fn new(board: Board, mode: GameMode) -> Self {
        Self {
            board,
            memory: OpponentMemory::new(),
            scores: ScoreBoard::new(),
            current: PlayerSlot::One,
            turn: TurnController::new(mode.actor_for(PlayerSlot::One)),
            turns_played: 0,
        }
    }
}

/// Menu, then a game, then the final scores, until the player quits.
///
/// The session owns every piece of game state. A front-end calls [`GameSession::step`]
/// once per frame with whatever input arrived, and renders a [`FrameSnapshot`].
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    layout: BoardLayout,
    clock: AnimationClock,
    rng: StdRng,
    seed: u64,
    state: SessionState,
    mode: GameMode,
    episode: Option<Episode>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, SetupError> {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            layout: BoardLayout::for_config(&config),
            clock: AnimationClock::from_config(&config),
            rng: StdRng::seed_from_u64(seed),
            config,
            seed,
            state: SessionState::Menu,
            mode: GameMode::default(),
            episode: None,
        })
    }

    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Consumes one frame of input and advances the session by one tick.
    pub fn step(&mut self, events: &[InputEvent]) -> Flow {
        if events
            .iter()
            .any(|event| matches!(event, InputEvent::QuitRequested))
        {
            self.quit();
        }

        match self.state {
            SessionState::Menu => self.step_menu(events),
            SessionState::Playing => self.step_playing(events),
            SessionState::GameOver => self.step_game_over(events),
            SessionState::Exited => {}
        }

        if self.state == SessionState::Exited {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    /// Starts a fresh game on a newly shuffled board. Only valid from the menu.
    pub fn choose_mode(&mut self, mode: GameMode) -> Result<(), SetupError> {
        self.ensure_menu()?;
        let board = Board::generate(&self.config, &mut self.rng)?;
        self.start_with_board(mode, board)
    }

    /// Starts a game on a prepared board. Only valid from the menu.
    pub fn start_with_board(&mut self, mode: GameMode, board: Board) -> Result<(), SetupError> {
        self.ensure_menu()?;
        info!(
            target: "trimatch_core::session",
            mode = %mode,
            rows = board.rows(),
            cols = board.cols(),
            seed = self.seed,
            "game started"
        );
        self.mode = mode;
        self.episode = Some(Episode::new(board, mode));
        self.state = SessionState::Playing;
        Ok(())
    }

    fn ensure_menu(&self) -> Result<(), SetupError> {
        match self.state {
            SessionState::Menu => Ok(()),
            state => Err(SetupError::NotInMenu { state }),
        }
    }

    /// Back to the menu; the finished board and memory are dropped.
    pub fn replay(&mut self) {
        if self.state == SessionState::Exited {
            return;
        }
        self.episode = None;
        self.state = SessionState::Menu;
    }

    pub fn quit(&mut self) {
        if self.state != SessionState::Exited {
            debug!(target: "trimatch_core::session", from = %self.state, "quit requested");
        }
        self.state = SessionState::Exited;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> ScoreBoard {
        self.episode
            .as_ref()
            .map(|episode| episode.scores)
            .unwrap_or_default()
    }

    pub fn current_player(&self) -> PlayerSlot {
        self.episode
            .as_ref()
            .map_or(PlayerSlot::One, |episode| episode.current)
    }

    pub fn current_actor(&self) -> Option<Actor> {
        self.playing().map(|episode| episode.turn.actor())
    }

    pub fn turn_phase(&self) -> Option<TurnPhase> {
        self.playing().map(|episode| episode.turn.phase())
    }

    pub fn turns_played(&self) -> u32 {
        self.episode
            .as_ref()
            .map_or(0, |episode| episode.turns_played)
    }

    pub fn board(&self) -> Option<&Board> {
        self.episode.as_ref().map(|episode| &episode.board)
    }

    /// Direct board access for scripted setups.
    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.episode.as_mut().map(|episode| &mut episode.board)
    }

    pub fn memory(&self) -> Option<&OpponentMemory> {
        self.episode.as_ref().map(|episode| &episode.memory)
    }

    pub fn memory_mut(&mut self) -> Option<&mut OpponentMemory> {
        self.episode.as_mut().map(|episode| &mut episode.memory)
    }

    /// True when nothing will happen until a person acts: a menu or game-over choice,
    /// or a human turn with no card still turning.
    pub fn awaiting_input(&self) -> bool {
        match self.state {
            SessionState::Menu | SessionState::GameOver => true,
            SessionState::Exited => false,
            SessionState::Playing => self.playing().is_some_and(|episode| {
                !episode.board.all_matched()
                    && !episode.board.is_animating()
                    && episode.turn.wants_human_selection(&episode.board)
            }),
        }
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.state {
            SessionState::GameOver => Some(self.scores().outcome()),
            _ => None,
        }
    }

    /// Pointer position at the centre of a cell, for front-ends that select by grid.
    pub fn cell_center(&self, row: u8, col: u8) -> Point {
        self.layout
            .cell_center(crate::model::card::GridPos::new(row, col))
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    fn playing(&self) -> Option<&Episode> {
        match self.state {
            SessionState::Playing => self.episode.as_ref(),
            _ => None,
        }
    }

    fn step_menu(&mut self, events: &[InputEvent]) {
        for event in events {
            let mode = match event {
                InputEvent::KeyPressed(Key::Char('1')) => GameMode::VsOpponent,
                InputEvent::KeyPressed(Key::Char('2')) => GameMode::VsPlayer,
                InputEvent::KeyPressed(Key::Escape) => {
                    self.quit();
                    return;
                }
                _ => continue,
            };
            if let Err(err) = self.choose_mode(mode) {
                warn!(target: "trimatch_core::session", error = %err, "could not start game");
            }
            return;
        }
    }

    fn step_game_over(&mut self, events: &[InputEvent]) {
        for event in events {
            match event {
                InputEvent::KeyPressed(Key::Enter | Key::Char('r' | 'R')) => {
                    self.replay();
                    return;
                }
                InputEvent::KeyPressed(Key::Escape) => {
                    self.quit();
                    return;
                }
                _ => {}
            }
        }
    }

    fn step_playing(&mut self, events: &[InputEvent]) {
        let Some(episode) = self.episode.as_mut() else {
            self.state = SessionState::Menu;
            return;
        };

        if episode.board.all_matched() {
            let scores = episode.scores;
            info!(
                target: "trimatch_core::session",
                player_one = scores.score(PlayerSlot::One),
                player_two = scores.score(PlayerSlot::Two),
                outcome = ?scores.outcome(),
                turns = episode.turns_played,
                "game over"
            );
            self.state = SessionState::GameOver;
            return;
        }

        let mut ctx = TurnContext {
            board: &mut episode.board,
            memory: &mut episode.memory,
            clock: &self.clock,
            config: &self.config,
            mode: self.mode,
            rng: &mut self.rng,
        };

        for event in events {
            if let InputEvent::PointerDown(point) = *event {
                let Some(id) = ctx.board.card_at(point, &self.layout).map(|card| card.id()) else {
                    continue;
                };
                episode.turn.select(&mut ctx, id);
            }
        }

        if let TurnPhase::Resolved(result) = episode.turn.advance(&mut ctx) {
            Self::apply_result(episode, self.mode, result);
        }
    }

    fn apply_result(episode: &mut Episode, mode: GameMode, result: TurnResult) {
        episode
            .scores
            .add_points(episode.current, result.points_awarded);
        if !result.continue_turn {
            episode.current = episode.current.other();
        }
        episode.turns_played += 1;
        episode.turn = TurnController::new(mode.actor_for(episode.current));
        debug!(
            target: "trimatch_core::session",
            next = %episode.current,
            scores = ?episode.scores.standings(),
            "turn applied"
        );
    }
}
