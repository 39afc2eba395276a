use crate::error::SetupError;
use serde::{Deserialize, Serialize};

pub const CARDS_PER_MATCH: u16 = 3;
pub const MIN_DISTINCT_VALUES: u16 = 3;

const DEFAULT_GRID: u8 = 6;
const DEFAULT_FLIP_STEP: u8 = 10;
const DEFAULT_FADE_STEP: u8 = 5;
const DEFAULT_TICK_MILLIS: u64 = 30;
const MISMATCH_DISPLAY_MILLIS: u64 = 1_000;
const OPPONENT_PAUSE_MILLIS: u64 = 500;

/// Startup constants for one game. Delays are counted in ticks so the engine never sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: u8,
    pub cols: u8,
    pub flip_step: u8,
    pub fade_step: u8,
    pub tick_millis: u64,
    pub mismatch_delay_ticks: u32,
    pub match_pause_ticks: u32,
    pub pick_delay_ticks: u32,
}

impl GameConfig {
    pub fn with_grid(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Same grid and steps, but no display delays. Turns resolve as soon as animations finish.
    pub fn without_delays(self) -> Self {
        Self {
            mismatch_delay_ticks: 0,
            match_pause_ticks: 0,
            pick_delay_ticks: 0,
            ..self
        }
    }

    pub const fn card_count(&self) -> u16 {
        self.rows as u16 * self.cols as u16
    }

    pub const fn distinct_values(&self) -> u16 {
        self.card_count() / CARDS_PER_MATCH
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SetupError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let cards = self.card_count();
        if cards % CARDS_PER_MATCH != 0 {
            return Err(SetupError::NotDivisibleByThree {
                rows: self.rows,
                cols: self.cols,
                cards,
            });
        }

        if self.distinct_values() < MIN_DISTINCT_VALUES {
            return Err(SetupError::TooFewValues {
                values: self.distinct_values(),
                min: MIN_DISTINCT_VALUES,
            });
        }

        if self.flip_step == 0 {
            return Err(SetupError::ZeroStep { field: "flip_step" });
        }
        if self.fade_step == 0 {
            return Err(SetupError::ZeroStep { field: "fade_step" });
        }
        if self.tick_millis == 0 {
            return Err(SetupError::ZeroStep {
                field: "tick_millis",
            });
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID,
            cols: DEFAULT_GRID,
            flip_step: DEFAULT_FLIP_STEP,
            fade_step: DEFAULT_FADE_STEP,
            tick_millis: DEFAULT_TICK_MILLIS,
            mismatch_delay_ticks: ticks_for(MISMATCH_DISPLAY_MILLIS, DEFAULT_TICK_MILLIS),
            match_pause_ticks: ticks_for(OPPONENT_PAUSE_MILLIS, DEFAULT_TICK_MILLIS),
            pick_delay_ticks: ticks_for(OPPONENT_PAUSE_MILLIS, DEFAULT_TICK_MILLIS),
        }
    }
}

/// Converts a wall-clock delay into whole ticks, rounding up.
pub const fn ticks_for(millis: u64, tick_millis: u64) -> u32 {
    if tick_millis == 0 {
        return 0;
    }
    millis.div_ceil(tick_millis) as u32
}
