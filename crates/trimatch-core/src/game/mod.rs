pub mod input;
pub mod session;
pub mod snapshot;
pub mod turn;
