use super::OpponentMemory;
use crate::model::board::Board;
use crate::model::card::CardId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PICKS_PER_TURN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickSource {
    KnownTriplet,
    RememberedPartner,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedPick {
    pub card: CardId,
    pub source: PickSource,
}

/// The opponent's choices for one turn, handed out one pick at a time.
///
/// A remembered triplet is played outright. Otherwise the first card is random, and the
/// second and third come from memory when memory holds a partner for what is already face-up,
/// falling back to random. Random picks are remembered as soon as they are chosen.
#[derive(Debug, Clone, Default)]
pub struct OpponentPlanner {
    known_triplet: Option<[CardId; 3]>,
    picks: Vec<CardId>,
}

impl OpponentPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picks(&self) -> &[CardId] {
        &self.picks
    }

    pub fn is_complete(&self) -> bool {
        self.picks.len() >= PICKS_PER_TURN
    }

    /// The next card to flip, or `None` once three are chosen or nothing is left to pick.
    pub fn next_pick<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        memory: &mut OpponentMemory,
        rng: &mut R,
    ) -> Option<PlannedPick> {
        if self.is_complete() {
            return None;
        }

        if self.picks.is_empty() {
            self.known_triplet = memory.find_triplet(board);
        }

        let pick = match self.known_triplet {
            Some(triplet) => Some(PlannedPick {
                card: triplet[self.picks.len()],
                source: PickSource::KnownTriplet,
            }),
            None => self
                .partner_pick(board, memory)
                .or_else(|| self.random_pick(board, memory, rng)),
        }?;

        debug!(
            target: "trimatch_core::opponent",
            card = %pick.card,
            source = ?pick.source,
            pick_index = self.picks.len(),
            "opponent pick"
        );
        self.picks.push(pick.card);
        Some(pick)
    }

    fn partner_pick(&self, board: &Board, memory: &OpponentMemory) -> Option<PlannedPick> {
        let (&first, rest) = self.picks.split_first()?;
        let value = board.value_of(first)?;

        // The third card only chases memory when the first two already agree.
        if let Some(&second) = rest.first() {
            if board.value_of(second)? != value {
                return None;
            }
        }

        memory
            .find_partner(board, value, &self.picks)
            .map(|card| PlannedPick {
                card,
                source: PickSource::RememberedPartner,
            })
    }

    fn random_pick<R: Rng + ?Sized>(
        &self,
        board: &Board,
        memory: &mut OpponentMemory,
        rng: &mut R,
    ) -> Option<PlannedPick> {
        let card = *board.hidden_cards(&self.picks).choose(rng)?;
        if let Some(seen) = board.card(card) {
            memory.remember(seen);
        }
        Some(PlannedPick {
            card,
            source: PickSource::Random,
        })
    }
}
