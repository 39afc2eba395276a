use crate::model::player::PlayerSlot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(PlayerSlot),
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add_points(&mut self, slot: PlayerSlot, points: u32) {
        self.totals[slot.index()] += points;
    }

    pub fn score(&self, slot: PlayerSlot) -> u32 {
        self.totals[slot.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    pub fn total(&self) -> u32 {
        self.totals.iter().sum()
    }

    pub fn outcome(&self) -> MatchOutcome {
        let [one, two] = self.totals;
        match one.cmp(&two) {
            core::cmp::Ordering::Greater => MatchOutcome::Winner(PlayerSlot::One),
            core::cmp::Ordering::Less => MatchOutcome::Winner(PlayerSlot::Two),
            core::cmp::Ordering::Equal => MatchOutcome::Tie,
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
