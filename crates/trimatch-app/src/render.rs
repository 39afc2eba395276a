use std::fmt::Write as _;

use trimatch_core::game::snapshot::{CardView, FrameSnapshot};
use trimatch_core::model::card::CardFace;
use trimatch_core::model::player::{GameMode, PlayerSlot};
use trimatch_core::model::score::MatchOutcome;
use trimatch_core::{AppInfo, SessionState};

pub const HIDDEN_CELL: &str = "##";
pub const TURNING_CELL: &str = "..";

/// Turn indicator under the score panel.
pub fn turn_label(mode: GameMode, slot: PlayerSlot) -> String {
    match (mode, slot) {
        (GameMode::VsOpponent, PlayerSlot::One) => "Player's Turn".to_string(),
        (GameMode::VsOpponent, PlayerSlot::Two) => "AI's Turn".to_string(),
        (GameMode::VsPlayer, slot) => format!("Player {}'s Turn", slot.number()),
    }
}

pub fn outcome_label(mode: GameMode, outcome: MatchOutcome) -> String {
    match (mode, outcome) {
        (_, MatchOutcome::Tie) => "It's a Tie!".to_string(),
        (GameMode::VsOpponent, MatchOutcome::Winner(PlayerSlot::One)) => "You Win!".to_string(),
        (GameMode::VsOpponent, MatchOutcome::Winner(PlayerSlot::Two)) => "AI Wins!".to_string(),
        (GameMode::VsPlayer, MatchOutcome::Winner(slot)) => format!("Player {} Wins!", slot.number()),
    }
}

fn cell_text(view: &CardView) -> String {
    match view.face {
        CardFace::Hidden => HIDDEN_CELL.to_string(),
        CardFace::Matched => String::new(),
        CardFace::FlippingUp(_) | CardFace::FlippingDown(_) => TURNING_CELL.to_string(),
        CardFace::Revealed | CardFace::MatchedFading(_) => view.value.to_string(),
    }
}

pub fn render(snapshot: &FrameSnapshot) -> String {
    let mut out = String::new();
    match snapshot.session {
        SessionState::Menu => render_menu(&mut out),
        SessionState::Playing => {
            render_scores(&mut out, snapshot);
            let _ = writeln!(out, "{}", turn_label(snapshot.mode, snapshot.current_player));
            render_grid(&mut out, snapshot);
        }
        SessionState::GameOver => {
            render_scores(&mut out, snapshot);
            render_grid(&mut out, snapshot);
            if let Some(outcome) = snapshot.outcome {
                let _ = writeln!(out, "{}", outcome_label(snapshot.mode, outcome));
            }
            let _ = writeln!(out, "Press r to play again, q to quit");
        }
        SessionState::Exited => {
            let _ = writeln!(out, "Goodbye.");
        }
    }
    out
}

fn render_menu(out: &mut String) {
    let _ = writeln!(out, "{}", AppInfo::tagline());
    let _ = writeln!(out, "  1) Play vs AI");
    let _ = writeln!(out, "  2) Play vs Friend");
    let _ = writeln!(out, "  q) Quit");
}

fn render_scores(out: &mut String, snapshot: &FrameSnapshot) {
    let panel: Vec<String> = PlayerSlot::LOOP
        .iter()
        .map(|&slot| {
            format!(
                "{}: {}",
                snapshot.mode.label(slot),
                snapshot.scores[slot.index()]
            )
        })
        .collect();
    let _ = writeln!(out, "{}", panel.join("   "));
}

fn render_grid(out: &mut String, snapshot: &FrameSnapshot) {
    let width = snapshot
        .cards
        .iter()
        .map(|view| view.value.to_string().len())
        .max()
        .unwrap_or(0)
        .max(HIDDEN_CELL.len());

    let _ = write!(out, "    ");
    for col in 1..=snapshot.cols {
        let _ = write!(out, " {col:>width$}");
    }
    let _ = writeln!(out);

    for row in 0..snapshot.rows {
        let _ = write!(out, "{:>3} ", row + 1);
        for col in 0..snapshot.cols {
            let text = snapshot.card(row, col).map(cell_text).unwrap_or_default();
            let _ = write!(out, " {text:>width$}");
        }
        let _ = writeln!(out);
    }
}
