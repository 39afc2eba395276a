use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerSlot {
    One = 0,
    Two = 1,
}

impl PlayerSlot {
    pub const LOOP: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerSlot::One),
            1 => Some(PlayerSlot::Two),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Player number as shown to people (1 or 2).
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    pub const fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Who is choosing cards this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Human,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    VsOpponent,
    VsPlayer,
}

impl GameMode {
    pub const fn actor_for(self, slot: PlayerSlot) -> Actor {
        match (self, slot) {
            (GameMode::VsOpponent, PlayerSlot::Two) => Actor::Opponent,
            _ => Actor::Human,
        }
    }

    /// Score-panel label for a slot in this mode.
    pub const fn label(self, slot: PlayerSlot) -> &'static str {
        match (self, slot) {
            (GameMode::VsOpponent, PlayerSlot::One) => "Player",
            (GameMode::VsOpponent, PlayerSlot::Two) => "AI",
            (GameMode::VsPlayer, PlayerSlot::One) => "Player 1",
            (GameMode::VsPlayer, PlayerSlot::Two) => "Player 2",
        }
    }

    pub const fn shares_memory(self) -> bool {
        matches!(self, GameMode::VsOpponent)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameMode::VsOpponent => "vs AI",
            GameMode::VsPlayer => "vs Friend",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_alternates() {
        assert_eq!(PlayerSlot::One.other(), PlayerSlot::Two);
        assert_eq!(PlayerSlot::Two.other(), PlayerSlot::One);
    }

    #[test]
    fn index_roundtrip() {
        for (i, slot) in PlayerSlot::LOOP.iter().enumerate() {
            assert_eq!(PlayerSlot::from_index(i), Some(*slot));
            assert_eq!(slot.index(), i);
        }
        assert_eq!(PlayerSlot::from_index(2), None);
    }

    #[test]
    fn opponent_only_plays_second_slot_in_opponent_mode() {
        assert_eq!(GameMode::VsOpponent.actor_for(PlayerSlot::One), Actor::Human);
        assert_eq!(GameMode::VsOpponent.actor_for(PlayerSlot::Two), Actor::Opponent);
        assert_eq!(GameMode::VsPlayer.actor_for(PlayerSlot::Two), Actor::Human);
    }

    #[test]
    fn labels_follow_mode() {
        assert_eq!(GameMode::VsOpponent.label(PlayerSlot::Two), "AI");
        assert_eq!(GameMode::VsPlayer.label(PlayerSlot::Two), "Player 2");
        assert_eq!(PlayerSlot::Two.to_string(), "Player 2");
    }
}
