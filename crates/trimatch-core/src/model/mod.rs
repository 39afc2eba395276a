pub mod board;
pub mod card;
pub mod clock;
pub mod layout;
pub mod player;
pub mod score;
