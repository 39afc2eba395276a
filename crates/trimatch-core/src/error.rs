use crate::game::session::SessionState;
use crate::model::card::CardValue;
use thiserror::Error;

/// Precondition failures that stop a game from being set up at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("board dimensions must be non-zero (got {rows}x{cols})")]
    EmptyGrid { rows: u8, cols: u8 },
    #[error("a {rows}x{cols} grid holds {cards} cards, which is not divisible by 3")]
    NotDivisibleByThree { rows: u8, cols: u8, cards: u16 },
    #[error("board yields {values} distinct values but at least {min} are required")]
    TooFewValues { values: u16, min: u16 },
    #[error("{field} must be greater than zero")]
    ZeroStep { field: &'static str },
    #[error("value layout has {found} cards but the grid needs {expected}")]
    LayoutSize { expected: usize, found: usize },
    #[error("value {value} occurs {count} times but every value must occur exactly 3 times")]
    BrokenTriplet { value: CardValue, count: usize },
    #[error("a game can only start from the menu (session is {state})")]
    NotInMenu { state: SessionState },
}

pub type SetupResult<T> = Result<T, SetupError>;
