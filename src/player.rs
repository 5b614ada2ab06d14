use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Marble;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The marble kind this color plays.
    pub fn marble(self) -> Marble {
        match self {
            Color::White => Marble::White,
            Color::Black => Marble::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Identity and score of one side. All rule checks live in the engine; a
/// player only knows who they are and how many reds they have taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: Color,
    captured: u32,
}

impl Player {
    pub fn new(name: &str, color: Color) -> Self {
        Player {
            name: name.to_string(),
            color,
            captured: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Red marbles this player has pushed off the board.
    pub fn captured(&self) -> u32 {
        self.captured
    }

    /// Score one captured red marble. The count only ever goes up.
    pub(crate) fn add_capture(&mut self) {
        self.captured += 1;
    }
}
