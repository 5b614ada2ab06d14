use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{BOARD_SIZE, Board, Cell, Direction, Marble, Position};
use crate::player::{Color, Player};

/// Captured red marbles needed to win.
pub const CAPTURES_TO_WIN: u32 = 7;

/// Why a move was rejected. Every variant is recoverable: the game is
/// unchanged and the caller simply picks a different move.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Game already over")]
    GameOver,
    #[error("No player by that name in this game")]
    UnknownPlayer,
    #[error("Not your turn")]
    WrongTurn,
    #[error("Origin is outside the board")]
    OutOfBounds,
    #[error("You may only push a marble of your own color")]
    NotYourPiece,
    #[error("No open space or edge behind the marble to push from")]
    NoOpenBackSpace,
    #[error("A push may not drop your own marble off the board")]
    SelfElimination,
    #[error("Move would recreate the board your opponent just faced")]
    RepeatsPriorState,
}

/// Why a game could not be constructed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    #[error("Players must take the two distinct colors")]
    DuplicateColor,
    #[error("Player names must be distinct")]
    DuplicateName,
}

/// The rules state machine: owns the board, both players, the turn, and the
/// latched winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEngine {
    board: Board,
    players: [Player; 2],
    /// None until the first committed move; whoever commits it opens.
    turn: Option<Color>,
    winner: Option<Color>,
}

impl GameEngine {
    /// New game from two (name, color) pairs. Names must differ because the
    /// name is the key later moves are made under.
    pub fn new(player_a: (&str, Color), player_b: (&str, Color)) -> Result<Self, SetupError> {
        if player_a.1 == player_b.1 {
            return Err(SetupError::DuplicateColor);
        }
        if player_a.0 == player_b.0 {
            return Err(SetupError::DuplicateName);
        }
        Ok(GameEngine {
            board: Board::new(),
            players: [
                Player::new(player_a.0, player_a.1),
                Player::new(player_b.0, player_b.1),
            ],
            turn: None,
            winner: None,
        })
    }

    /// Validate and, if legal, execute one push for the named player.
    ///
    /// Checks run in a fixed order and every rejection is clean: a failed
    /// attempt leaves board, history, turn, and scores exactly as they were.
    pub fn attempt_move(
        &mut self,
        player_name: &str,
        origin: Position,
        direction: Direction,
    ) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }

        let mover = self
            .player_index(player_name)
            .ok_or(MoveError::UnknownPlayer)?;
        let color = self.players[mover].color();

        if let Some(turn) = self.turn {
            if turn != color {
                return Err(MoveError::WrongTurn);
            }
        }

        match self.board.cell(origin) {
            Cell::OffBoard => return Err(MoveError::OutOfBounds),
            Cell::Marble(marble) if marble == color.marble() => {}
            _ => return Err(MoveError::NotYourPiece),
        }

        // A push needs room, or the rim, directly behind the origin marble.
        if !self.board.is_open_or_edge(origin, direction.opposite()) {
            return Err(MoveError::NoOpenBackSpace);
        }

        // Inspect the far end of the run before touching anything.
        if self.board.would_fall_off(origin, direction) == Some(color.marble()) {
            return Err(MoveError::SelfElimination);
        }

        let before = self.board.snapshot();
        let result = self.board.push(origin, direction);

        if self.board.undoes_opponent_move() {
            self.board.restore(before);
            return Err(MoveError::RepeatsPriorState);
        }

        // Commit. The capture was held pending until the no-undo check
        // passed, so a rolled-back push never scores.
        if result.fell_off == Some(Marble::Red) {
            self.players[mover].add_capture();
        }
        let committed = self.board.snapshot();
        self.board.record(committed);
        self.turn = Some(color.opponent());
        self.evaluate_victory();

        Ok(())
    }

    /// Whose turn it is. None until the first committed move: either player
    /// may open, and strict alternation starts from whoever does.
    pub fn current_turn(&self) -> Option<Color> {
        self.turn
    }

    /// Probe a coordinate on the live board.
    pub fn cell_at(&self, pos: Position) -> Cell {
        self.board.cell(pos)
    }

    /// Red marbles captured by the named player, or None for a stranger.
    pub fn captured_by(&self, name: &str) -> Option<u32> {
        self.player(name).map(Player::captured)
    }

    /// Name of the winner, once there is one.
    pub fn winner(&self) -> Option<&str> {
        self.winner.map(|color| self.player_by_color(color).name())
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// (white, black, red) marbles still on the board.
    pub fn marble_count(&self) -> (usize, usize, usize) {
        (
            self.board.count(Marble::White),
            self.board.count(Marble::Black),
            self.board.count(Marble::Red),
        )
    }

    /// The named player, if they are part of this game.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// Read-only view of the board and its committed history.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Committed moves so far.
    pub fn move_count(&self) -> usize {
        self.board.history().len() - 1
    }

    /// Text rendering of the board, one rank per line. Built on the public
    /// cell probe only; no rule logic lives here.
    pub fn display_board(&self) -> String {
        let mut out = String::new();
        out.push_str("   ");
        for col in 0..BOARD_SIZE {
            out.push_str(&format!("{:2} ", col));
        }
        out.push('\n');
        for row in 0..BOARD_SIZE {
            out.push_str(&format!("{:2} ", row));
            for col in 0..BOARD_SIZE {
                let ch = match self.cell_at(Position::new(row, col)) {
                    Cell::Marble(Marble::White) => 'W',
                    Cell::Marble(Marble::Black) => 'B',
                    Cell::Marble(Marble::Red) => 'R',
                    _ => '.',
                };
                out.push_str(&format!(" {} ", ch));
            }
            out.push('\n');
        }
        out
    }

    fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }

    fn player_by_color(&self, color: Color) -> &Player {
        if self.players[0].color() == color {
            &self.players[0]
        } else {
            &self.players[1]
        }
    }

    /// Run after every commit. The winner latches: once set it never
    /// changes, and the capture threshold outranks elimination when a
    /// single commit satisfies both.
    fn evaluate_victory(&mut self) {
        if self.winner.is_some() {
            return;
        }
        for player in &self.players {
            if player.captured() >= CAPTURES_TO_WIN {
                self.winner = Some(player.color());
                return;
            }
        }
        let (white, black, _) = self.marble_count();
        if white == 0 {
            self.winner = Some(Color::Black);
        } else if black == 0 {
            self.winner = Some(Color::White);
        }
    }
}
