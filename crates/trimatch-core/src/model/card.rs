use core::fmt;
use serde::{Deserialize, Serialize};

pub type CardValue = u16;

pub const FULL_PROGRESS: u8 = 100;
const FACE_VISIBLE_FROM: u8 = FULL_PROGRESS / 2;

/// Scan-order index of a card. Stable for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u16);

impl CardId {
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u8,
    pub col: u8,
}

impl GridPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

/// Animation state of a card. Progress only exists in the variants where it means something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "progress")]
pub enum CardFace {
    Hidden,
    FlippingUp(u8),
    Revealed,
    FlippingDown(u8),
    MatchedFading(u8),
    Matched,
}

impl CardFace {
    pub const fn is_animating(self) -> bool {
        matches!(
            self,
            Self::FlippingUp(_) | Self::FlippingDown(_) | Self::MatchedFading(_)
        )
    }

    /// Face-up for selection purposes, including while still turning.
    pub const fn is_revealed_like(self) -> bool {
        matches!(
            self,
            Self::Revealed | Self::FlippingUp(_) | Self::FlippingDown(_)
        )
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched | Self::MatchedFading(_))
    }

    pub const fn flip_progress(self) -> Option<u8> {
        match self {
            Self::FlippingUp(progress) | Self::FlippingDown(progress) => Some(progress),
            Self::Revealed => Some(FULL_PROGRESS),
            _ => None,
        }
    }

    pub const fn fade_progress(self) -> Option<u8> {
        match self {
            Self::MatchedFading(progress) => Some(progress),
            Self::Matched => Some(FULL_PROGRESS),
            _ => None,
        }
    }

    /// Whether a renderer should draw the value. Mid-flip the front shows past the halfway point.
    pub const fn shows_face(self) -> bool {
        match self {
            Self::Revealed | Self::MatchedFading(_) => true,
            Self::FlippingUp(progress) | Self::FlippingDown(progress) => {
                progress >= FACE_VISIBLE_FROM
            }
            Self::Hidden | Self::Matched => false,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::FlippingUp(_) => "flipping-up",
            Self::Revealed => "revealed",
            Self::FlippingDown(_) => "flipping-down",
            Self::MatchedFading(_) => "matched-fading",
            Self::Matched => "matched",
        }
    }
}

impl Default for CardFace {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    pos: GridPos,
    value: CardValue,
    face: CardFace,
}

impl Card {
    pub const fn new(id: CardId, pos: GridPos, value: CardValue) -> Self {
        Self {
            id,
            pos,
            value,
            face: CardFace::Hidden,
        }
    }

    pub const fn id(&self) -> CardId {
        self.id
    }

    pub const fn pos(&self) -> GridPos {
        self.pos
    }

    pub const fn value(&self) -> CardValue {
        self.value
    }

    pub const fn face(&self) -> CardFace {
        self.face
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.face, CardFace::Hidden)
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.face, CardFace::Revealed)
    }

    pub const fn is_animating(&self) -> bool {
        self.face.is_animating()
    }

    pub const fn is_revealed_like(&self) -> bool {
        self.face.is_revealed_like()
    }

    pub const fn is_matched(&self) -> bool {
        self.face.is_matched()
    }

    /// Hidden → FlippingUp. Returns false (and changes nothing) from any other state.
    pub fn flip_up(&mut self) -> bool {
        if !self.is_hidden() {
            return false;
        }
        self.face = CardFace::FlippingUp(0);
        true
    }

    /// Revealed → FlippingDown.
    pub fn flip_down(&mut self) -> bool {
        if !self.is_revealed() {
            return false;
        }
        self.face = CardFace::FlippingDown(FULL_PROGRESS);
        true
    }

    /// Revealed → MatchedFading.
    pub fn set_matched(&mut self) -> bool {
        if !self.is_revealed() {
            return false;
        }
        self.face = CardFace::MatchedFading(0);
        true
    }

    pub(crate) fn replace_face(&mut self, face: CardFace) {
        self.face = face;
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}={}", self.id, self.pos, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::new(CardId::new(0), GridPos::new(0, 0), 7)
    }

    #[test]
    fn hidden_accepts_only_flip_up() {
        let mut card = card();
        assert!(!card.flip_down());
        assert!(!card.set_matched());
        assert_eq!(card.face(), CardFace::Hidden);

        assert!(card.flip_up());
        assert_eq!(card.face(), CardFace::FlippingUp(0));
        assert_eq!(card.face().flip_progress(), Some(0));
    }

    #[test]
    fn revealed_accepts_flip_down_or_matched() {
        let mut card = card();
        card.replace_face(CardFace::Revealed);
        assert!(!card.flip_up());

        let mut down = card.clone();
        assert!(down.flip_down());
        assert_eq!(down.face(), CardFace::FlippingDown(100));

        assert!(card.set_matched());
        assert_eq!(card.face(), CardFace::MatchedFading(0));
        assert_eq!(card.face().fade_progress(), Some(0));
    }

    #[test]
    fn animating_states_reject_every_transition() {
        for face in [
            CardFace::FlippingUp(40),
            CardFace::FlippingDown(40),
            CardFace::MatchedFading(40),
            CardFace::Matched,
        ] {
            let mut card = card();
            card.replace_face(face);
            assert!(!card.flip_up());
            assert!(!card.flip_down());
            assert!(!card.set_matched());
            assert_eq!(card.face(), face);
        }
    }

    #[test]
    fn queries_partition_states() {
        let face = CardFace::FlippingUp(10);
        assert!(face.is_animating() && face.is_revealed_like() && !face.is_matched());

        let face = CardFace::Revealed;
        assert!(!face.is_animating() && face.is_revealed_like());

        let face = CardFace::MatchedFading(50);
        assert!(face.is_animating() && face.is_matched() && !face.is_revealed_like());

        let face = CardFace::Matched;
        assert!(!face.is_animating() && face.is_matched());
        assert_eq!(face.flip_progress(), None);
    }

    #[test]
    fn face_shows_past_midpoint_only() {
        assert!(!CardFace::FlippingUp(40).shows_face());
        assert!(CardFace::FlippingUp(50).shows_face());
        assert!(CardFace::FlippingDown(60).shows_face());
        assert!(!CardFace::Hidden.shows_face());
        assert!(!CardFace::Matched.shows_face());
    }
}
