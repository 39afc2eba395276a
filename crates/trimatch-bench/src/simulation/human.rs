use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use trimatch_core::memory::{OpponentMemory, OpponentPlanner};
use trimatch_core::model::board::Board;
use trimatch_core::model::card::{Card, CardId};

use crate::config::AgentKind;

// Keeps the stand-in's random stream apart from the session's.
const HUMAN_SEED_SALT: u64 = 0x7472_696d_6174_6368;

enum Strategy {
    Random,
    Recall {
        memory: OpponentMemory,
        planner: OpponentPlanner,
        turn: Option<u32>,
    },
}

/// Plays the human seat by choosing cards the way a person at the table could.
pub struct SimulatedHuman {
    strategy: Strategy,
    rng: StdRng,
}

impl SimulatedHuman {
    /// `None` for kinds that do not stand in for a person.
    pub fn new(kind: AgentKind, game_seed: u64) -> Option<Self> {
        let strategy = match kind {
            AgentKind::Opponent => return None,
            AgentKind::Random => Strategy::Random,
            AgentKind::Recall => Strategy::Recall {
                memory: OpponentMemory::new(),
                planner: OpponentPlanner::new(),
                turn: None,
            },
        };
        Some(Self {
            strategy,
            rng: StdRng::seed_from_u64(game_seed ^ HUMAN_SEED_SALT),
        })
    }

    /// Takes in whatever is face-up right now, including the opponent's cards.
    pub fn observe(&mut self, board: &Board) {
        let Strategy::Recall { memory, .. } = &mut self.strategy else {
            return;
        };
        for card in board.cards() {
            if card.is_matched() {
                memory.forget(card.value());
            } else if card.is_revealed() {
                memory.remember(card);
            }
        }
    }

    /// Next card to press. `turn` identifies the current turn so a fresh plan starts with it.
    pub fn choose(&mut self, board: &Board, turn: u32) -> Option<CardId> {
        match &mut self.strategy {
            Strategy::Random => board
                .cards()
                .iter()
                .filter(|card| card.is_hidden())
                .map(Card::id)
                .choose(&mut self.rng),
            Strategy::Recall {
                memory,
                planner,
                turn: planned_turn,
            } => {
                if *planned_turn != Some(turn) {
                    *planner = OpponentPlanner::new();
                    *planned_turn = Some(turn);
                }
                planner
                    .next_pick(board, memory, &mut self.rng)
                    .map(|pick| pick.card)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimatch_core::model::clock::AnimationClock;

    fn board() -> Board {
        Board::from_values(3, 3, &[1, 2, 3, 1, 2, 3, 1, 2, 3]).unwrap()
    }

    #[test]
    fn opponent_kind_is_not_a_stand_in() {
        assert!(SimulatedHuman::new(AgentKind::Opponent, 1).is_none());
    }

    #[test]
    fn random_stand_in_only_picks_hidden_cards() {
        let mut board = board();
        board.flip_up(CardId::new(4));
        AnimationClock::default().settle(&mut board);
        let mut human = SimulatedHuman::new(AgentKind::Random, 3).unwrap();
        for turn in 0..32 {
            let pick = human.choose(&board, turn).unwrap();
            assert_ne!(pick, CardId::new(4));
        }
    }

    #[test]
    fn recall_stand_in_plays_what_it_has_seen() {
        let mut board = board();
        let clock = AnimationClock::default();
        for index in [1, 4, 7] {
            board.flip_up(CardId::new(index));
        }
        clock.settle(&mut board);
        let mut human = SimulatedHuman::new(AgentKind::Recall, 3).unwrap();
        human.observe(&board);
        for index in [1, 4, 7] {
            board.flip_down(CardId::new(index));
        }
        clock.settle(&mut board);

        let picks: Vec<_> = (0..3)
            .map(|_| human.choose(&board, 5).unwrap())
            .collect();
        assert_eq!(picks, vec![CardId::new(1), CardId::new(4), CardId::new(7)]);
    }
}
