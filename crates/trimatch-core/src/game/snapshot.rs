use crate::game::session::{GameSession, SessionState};
use crate::model::card::{Card, CardFace, CardValue};
use crate::model::player::{GameMode, PlayerSlot};
use crate::model::score::MatchOutcome;
use serde::{Deserialize, Serialize};

/// One card as a renderer needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub row: u8,
    pub col: u8,
    pub value: CardValue,
    pub face: CardFace,
    pub flip_progress: Option<u8>,
    pub fade_progress: Option<u8>,
    pub shows_face: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        let face = card.face();
        Self {
            row: card.pos().row,
            col: card.pos().col,
            value: card.value(),
            face,
            flip_progress: face.flip_progress(),
            fade_progress: face.fade_progress(),
            shows_face: face.shows_face(),
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub session: SessionState,
    pub mode: GameMode,
    pub scores: [u32; 2],
    pub current_player: PlayerSlot,
    pub awaiting_input: bool,
    pub outcome: Option<MatchOutcome>,
    pub rows: u8,
    pub cols: u8,
    pub cards: Vec<CardView>,
}

impl FrameSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        let (rows, cols, cards) = match session.board() {
            Some(board) => (
                board.rows(),
                board.cols(),
                board.cards().iter().map(CardView::from).collect(),
            ),
            None => (session.config().rows, session.config().cols, Vec::new()),
        };
        Self {
            session: session.state(),
            mode: session.mode(),
            scores: *session.scores().standings(),
            current_player: session.current_player(),
            awaiting_input: session.awaiting_input(),
            outcome: session.outcome(),
            rows,
            cols,
            cards,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn card(&self, row: u8, col: u8) -> Option<&CardView> {
        self.cards
            .iter()
            .find(|view| view.row == row && view.col == col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::input::InputEvent;

    #[test]
    fn menu_snapshot_has_no_cards() {
        let session = GameSession::with_seed(GameConfig::with_grid(3, 3), 4).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.session, SessionState::Menu);
        assert!(snapshot.cards.is_empty());
        assert!(snapshot.awaiting_input);
        assert_eq!(snapshot.outcome, None);
    }

    #[test]
    fn snapshot_reports_flip_progress_and_serializes() {
        let mut session = GameSession::with_seed(GameConfig::with_grid(3, 3), 4).unwrap();
        session.step(&[InputEvent::key('2')]);
        let center = session.cell_center(0, 1);
        session.step(&[InputEvent::PointerDown(center)]);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.cards.len(), 9);
        let view = snapshot.card(0, 1).unwrap();
        assert_eq!(view.face, CardFace::FlippingUp(10));
        assert_eq!(view.flip_progress, Some(10));
        assert_eq!(view.fade_progress, None);
        assert!(!view.shows_face);

        let json = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["session"], "Playing");
        assert_eq!(value["mode"], "VsPlayer");
        assert_eq!(value["cards"][1]["face"]["state"], "FlippingUp");
        assert_eq!(value["cards"][1]["face"]["progress"], 10);
        assert_eq!(value["cards"][0]["face"]["state"], "Hidden");
    }
}
