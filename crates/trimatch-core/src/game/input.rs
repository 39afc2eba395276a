use crate::model::layout::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
}

/// Input collected by a front-end since the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(Point),
    KeyPressed(Key),
    QuitRequested,
}

impl InputEvent {
    pub const fn key(c: char) -> Self {
        InputEvent::KeyPressed(Key::Char(c))
    }

    pub const fn pointer(x: i32, y: i32) -> Self {
        InputEvent::PointerDown(Point::new(x, y))
    }
}
