#![deny(warnings)]
pub mod config;
pub mod error;
pub mod game;
pub mod memory;
pub mod model;

pub use config::GameConfig;
pub use error::SetupError;
pub use game::input::{InputEvent, Key};
pub use game::session::{Flow, GameSession, SessionState};
pub use game::snapshot::FrameSnapshot;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "trimatch"
    }

    pub const fn tagline() -> &'static str {
        "Memory Match - 3 Card Matching"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
