use crate::config::GameConfig;
use crate::model::board::Board;
use crate::model::card::{CardFace, FULL_PROGRESS};

/// Steps flip and fade progress by one tick. Nothing else writes progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    flip_step: u8,
    fade_step: u8,
}

impl AnimationClock {
    pub const fn new(flip_step: u8, fade_step: u8) -> Self {
        Self {
            flip_step,
            fade_step,
        }
    }

    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.flip_step, config.fade_step)
    }

    /// Advances every animating card once. Returns whether any card is still animating.
    pub fn tick(&self, board: &mut Board) -> bool {
        let mut animating = false;
        for card in board.cards_mut() {
            if !card.is_animating() {
                continue;
            }
            let next = self.advance(card.face());
            card.replace_face(next);
            animating |= next.is_animating();
        }
        board.prune_selection();
        animating
    }

    /// Ticks until nothing animates, returning the number of ticks taken.
    pub fn settle(&self, board: &mut Board) -> u32 {
        let mut ticks = 0;
        while board.is_animating() {
            self.tick(board);
            ticks += 1;
        }
        ticks
    }

    pub fn advance(&self, face: CardFace) -> CardFace {
        match face {
            CardFace::FlippingUp(progress) => {
                let next = progress.saturating_add(self.flip_step);
                if next >= FULL_PROGRESS {
                    CardFace::Revealed
                } else {
                    CardFace::FlippingUp(next)
                }
            }
            CardFace::FlippingDown(progress) => match progress.checked_sub(self.flip_step) {
                Some(next) if next > 0 => CardFace::FlippingDown(next),
                _ => CardFace::Hidden,
            },
            CardFace::MatchedFading(progress) => {
                let next = progress.saturating_add(self.fade_step);
                if next >= FULL_PROGRESS {
                    CardFace::Matched
                } else {
                    CardFace::MatchedFading(next)
                }
            }
            stable => stable,
        }
    }

    /// Ticks a flip takes from either end to the other.
    pub fn flip_ticks(&self) -> u32 {
        u32::from(FULL_PROGRESS).div_ceil(u32::from(self.flip_step.max(1)))
    }

    pub fn fade_ticks(&self) -> u32 {
        u32::from(FULL_PROGRESS).div_ceil(u32::from(self.fade_step.max(1)))
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
