use trimatch_core::game::input::{InputEvent, Key};
use trimatch_core::{GameSession, SessionState};

/// One line of typed input, translated for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events(Vec<InputEvent>),
    Unknown(String),
}

/// Parses a typed line. Card picks are 1-based `row col` pairs, several per line allowed,
/// and become pointer presses at the card centre.
pub fn parse_line(line: &str, session: &GameSession) -> Command {
    let text = line.trim();
    let lowered = text.to_ascii_lowercase();

    match lowered.as_str() {
        "q" | "quit" | "exit" => return Command::Events(vec![InputEvent::QuitRequested]),
        "esc" | "escape" => return Command::Events(vec![InputEvent::KeyPressed(Key::Escape)]),
        "r" | "again" | "replay" => return Command::Events(vec![InputEvent::key('r')]),
        "" if session.state() == SessionState::GameOver => {
            return Command::Events(vec![InputEvent::KeyPressed(Key::Enter)]);
        }
        "" => return Command::Events(Vec::new()),
        _ => {}
    }

    if session.state() == SessionState::Menu {
        return match lowered.as_str() {
            "1" | "ai" => Command::Events(vec![InputEvent::key('1')]),
            "2" | "friend" => Command::Events(vec![InputEvent::key('2')]),
            _ => Command::Unknown(text.to_string()),
        };
    }

    match parse_cells(text) {
        Some(cells) if !cells.is_empty() => Command::Events(
            cells
                .into_iter()
                .map(|(row, col)| InputEvent::PointerDown(session.cell_center(row, col)))
                .collect(),
        ),
        _ => Command::Unknown(text.to_string()),
    }
}

/// `"1 2, 3 1"` becomes zero-based `[(0, 1), (2, 0)]`.
fn parse_cells(text: &str) -> Option<Vec<(u8, u8)>> {
    let numbers = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<u8>().ok()?.checked_sub(1))
        .collect::<Option<Vec<u8>>>()?;
    if numbers.len() % 2 != 0 {
        return None;
    }
    Some(
        numbers
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect(),
    )
}
