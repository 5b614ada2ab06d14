use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Kuba is always played on a 7x7 board.
pub const BOARD_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marble {
    White,
    Black,
    Red,
}

/// What a probe of a coordinate sees. Reading past the rim is a value, not
/// an error: several rules deliberately treat Empty and OffBoard alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Marble(Marble),
    OffBoard,
}

impl Cell {
    /// True for Empty and OffBoard: both count as room for a push to move
    /// into, and as a valid backing space behind a pushed marble.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Empty | Cell::OffBoard)
    }

    /// The marble here, if the cell is on the board and occupied.
    pub fn marble(self) -> Option<Marble> {
        match self {
            Cell::Marble(marble) => Some(marble),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Row/column delta of one step. Forward is toward row 0.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Forward => (-1, 0),
            Direction::Backward => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// True when the position addresses one of the 49 cells.
    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// One step in `direction`, or None when the step leaves the board.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        next.in_bounds().then_some(next)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Full copy of the 49 cells: the unit recorded in history and compared by
/// the no-undo rule.
pub type Grid = [[Option<Marble>; BOARD_SIZE]; BOARD_SIZE];

/// Outcome of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResult {
    /// Marble that left the board off the far edge, if the run reached it.
    pub fell_off: Option<Marble>,
    /// Whether the origin cell ended up empty. Every push vacates its
    /// origin; reported so callers can assert on it.
    pub origin_cleared: bool,
}

const W: Option<Marble> = Some(Marble::White);
const B: Option<Marble> = Some(Marble::Black);
const R: Option<Marble> = Some(Marble::Red);
const E: Option<Marble> = None;

/// Canonical opening layout: 8 white, 8 black, 13 red.
const OPENING: Grid = [
    [W, W, E, E, E, B, B],
    [W, W, E, R, E, B, B],
    [E, E, R, R, R, E, E],
    [E, R, R, R, R, R, E],
    [E, E, R, R, R, E, E],
    [B, B, E, R, E, W, W],
    [B, B, E, E, E, W, W],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Grid,
    /// Committed states, oldest first. The opening layout is entry 0, so
    /// entry len-2 is always the board before the opponent's last move.
    history: Vec<Grid>,
}

impl Board {
    /// Board in the opening layout, with that layout already recorded as
    /// the first committed state.
    pub fn new() -> Self {
        Board {
            cells: OPENING,
            history: vec![OPENING],
        }
    }

    /// Probe a coordinate. Out-of-range positions read as OffBoard.
    pub fn cell(&self, pos: Position) -> Cell {
        if !pos.in_bounds() {
            return Cell::OffBoard;
        }
        match self.cells[pos.row][pos.col] {
            Some(marble) => Cell::Marble(marble),
            None => Cell::Empty,
        }
    }

    /// True if the adjacent cell in `direction` from `pos` is empty or off
    /// the board.
    pub fn is_open_or_edge(&self, pos: Position, direction: Direction) -> bool {
        match pos.step(direction) {
            Some(next) => self.cell(next).is_open(),
            None => true,
        }
    }

    /// The marble a push from `origin` would send off the edge, found by
    /// walking the run and looking at its far end. None when the run stops
    /// at an empty cell short of the rim, or origin itself is empty. The
    /// board is not touched.
    pub fn would_fall_off(&self, origin: Position, direction: Direction) -> Option<Marble> {
        let mut cursor = origin;
        loop {
            let here = self.cell(cursor).marble()?;
            match cursor.step(direction) {
                // The run reaches the rim; the marble here is the one to fall.
                None => return Some(here),
                Some(next) => {
                    if self.cell(next).marble().is_none() {
                        return None;
                    }
                    cursor = next;
                }
            }
        }
    }

    /// Execute a pre-validated push: a single directed pass that carries the
    /// origin marble forward, displacing each marble of the run by one cell,
    /// until the carry settles in an empty cell or falls off the edge. No
    /// cell is visited twice.
    pub fn push(&mut self, origin: Position, direction: Direction) -> PushResult {
        let mut carry = self.cells[origin.row][origin.col].take();
        let mut cursor = origin;
        while carry.is_some() {
            match cursor.step(direction) {
                Some(next) => {
                    carry = mem::replace(&mut self.cells[next.row][next.col], carry);
                    cursor = next;
                }
                // Still carrying at the rim: that marble falls off.
                None => break,
            }
        }
        PushResult {
            fell_off: carry,
            origin_cleared: self.cells[origin.row][origin.col].is_none(),
        }
    }

    /// Deep, independent copy of the current cells.
    pub fn snapshot(&self) -> Grid {
        self.cells
    }

    /// Roll the cells back to a snapshot. History is untouched.
    pub fn restore(&mut self, snapshot: Grid) {
        self.cells = snapshot;
    }

    /// Append a committed state to the history log.
    pub fn record(&mut self, snapshot: Grid) {
        self.history.push(snapshot);
    }

    /// Committed states, oldest first, starting with the opening layout.
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    /// True when the working cells match the state two commits back, i.e.
    /// the move in progress would hand the opponent the exact board they
    /// faced before their own last move.
    pub fn undoes_opponent_move(&self) -> bool {
        let n = self.history.len();
        n >= 2 && self.cells == self.history[n - 2]
    }

    /// Number of marbles of one kind on the board.
    pub fn count(&self, marble: Marble) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| **cell == Some(marble))
            .count()
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, pos: Position, marble: Option<Marble>) {
        self.cells[pos.row][pos.col] = marble;
    }

    #[cfg(test)]
    pub(crate) fn clear(&mut self) {
        self.cells = [[None; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Reseed history so the current cells are the only committed state.
    /// Constructed test positions need this before exercising the no-undo
    /// rule.
    #[cfg(test)]
    pub(crate) fn rebase_history(&mut self) {
        self.history = vec![self.cells];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// Empty board with history rebased to the empty grid.
    fn empty_board() -> Board {
        let mut board = Board::new();
        board.clear();
        board.rebase_history();
        board
    }

    #[test]
    fn test_opening_layout() {
        let board = Board::new();

        assert_eq!(board.count(Marble::White), 8);
        assert_eq!(board.count(Marble::Black), 8);
        assert_eq!(board.count(Marble::Red), 13);

        // Corners of the white and black blocks
        assert_eq!(board.cell(p(0, 0)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(1, 1)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(0, 6)), Cell::Marble(Marble::Black));
        assert_eq!(board.cell(p(6, 0)), Cell::Marble(Marble::Black));
        assert_eq!(board.cell(p(6, 6)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(5, 0)), Cell::Marble(Marble::Black));

        // Red wedge tips and center
        assert_eq!(board.cell(p(1, 3)), Cell::Marble(Marble::Red));
        assert_eq!(board.cell(p(3, 3)), Cell::Marble(Marble::Red));
        assert_eq!(board.cell(p(5, 3)), Cell::Marble(Marble::Red));
        assert_eq!(board.cell(p(0, 2)), Cell::Empty);

        // The opening layout is already the first committed state
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.history()[0], board.snapshot());
    }

    #[test]
    fn test_cell_probe_is_tristate() {
        let board = Board::new();

        assert_eq!(board.cell(p(0, 0)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(0, 2)), Cell::Empty);
        assert_eq!(board.cell(p(7, 0)), Cell::OffBoard);
        assert_eq!(board.cell(p(0, 7)), Cell::OffBoard);
        assert_eq!(board.cell(p(42, 42)), Cell::OffBoard);

        assert!(Cell::Empty.is_open());
        assert!(Cell::OffBoard.is_open());
        assert!(!Cell::Marble(Marble::Red).is_open());
    }

    #[test]
    fn test_step_stops_at_the_rim() {
        assert_eq!(p(0, 3).step(Direction::Forward), None);
        assert_eq!(p(6, 3).step(Direction::Backward), None);
        assert_eq!(p(3, 0).step(Direction::Left), None);
        assert_eq!(p(3, 6).step(Direction::Right), None);

        assert_eq!(p(3, 3).step(Direction::Forward), Some(p(2, 3)));
        assert_eq!(p(3, 3).step(Direction::Backward), Some(p(4, 3)));
        assert_eq!(p(3, 3).step(Direction::Left), Some(p(3, 2)));
        assert_eq!(p(3, 3).step(Direction::Right), Some(p(3, 4)));
    }

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::Forward.opposite(), Direction::Backward);
        assert_eq!(Direction::Backward.opposite(), Direction::Forward);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);

        for direction in [
            Direction::Forward,
            Direction::Backward,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn test_is_open_or_edge() {
        let board = Board::new();

        // Off the rim counts as open
        assert!(board.is_open_or_edge(p(0, 0), Direction::Forward));
        assert!(board.is_open_or_edge(p(0, 0), Direction::Left));

        // Occupied neighbor does not
        assert!(!board.is_open_or_edge(p(0, 0), Direction::Right));
        assert!(!board.is_open_or_edge(p(0, 0), Direction::Backward));

        // Empty neighbor does
        assert!(board.is_open_or_edge(p(0, 1), Direction::Right));
    }

    #[test]
    fn test_push_single_marble_moves_one_cell() {
        let mut board = empty_board();
        board.place(p(3, 3), Some(Marble::White));

        let result = board.push(p(3, 3), Direction::Right);

        assert_eq!(result.fell_off, None);
        assert!(result.origin_cleared);
        assert_eq!(board.cell(p(3, 3)), Cell::Empty);
        assert_eq!(board.cell(p(3, 4)), Cell::Marble(Marble::White));
    }

    #[test]
    fn test_push_shifts_the_whole_run() {
        let mut board = empty_board();
        board.place(p(3, 2), Some(Marble::White));
        board.place(p(3, 3), Some(Marble::Black));
        board.place(p(3, 4), Some(Marble::Red));

        let result = board.push(p(3, 2), Direction::Right);

        assert_eq!(result.fell_off, None);
        assert_eq!(board.cell(p(3, 2)), Cell::Empty);
        assert_eq!(board.cell(p(3, 3)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(3, 4)), Cell::Marble(Marble::Black));
        assert_eq!(board.cell(p(3, 5)), Cell::Marble(Marble::Red));
    }

    #[test]
    fn test_push_does_not_move_past_a_gap() {
        let mut board = empty_board();
        board.place(p(3, 2), Some(Marble::White));
        board.place(p(3, 3), Some(Marble::Red));
        board.place(p(3, 5), Some(Marble::Black));

        board.push(p(3, 2), Direction::Right);

        // The run stops at the gap; the marble beyond it never moves
        assert_eq!(board.cell(p(3, 3)), Cell::Marble(Marble::White));
        assert_eq!(board.cell(p(3, 4)), Cell::Marble(Marble::Red));
        assert_eq!(board.cell(p(3, 5)), Cell::Marble(Marble::Black));
    }

    #[test]
    fn test_push_off_the_edge_reports_the_fallen_marble() {
        let mut board = empty_board();
        board.place(p(3, 5), Some(Marble::White));
        board.place(p(3, 6), Some(Marble::Red));

        let result = board.push(p(3, 5), Direction::Right);

        assert_eq!(result.fell_off, Some(Marble::Red));
        assert!(result.origin_cleared);
        assert_eq!(board.cell(p(3, 5)), Cell::Empty);
        assert_eq!(board.cell(p(3, 6)), Cell::Marble(Marble::White));
        assert_eq!(board.count(Marble::Red), 0);
    }

    #[test]
    fn test_push_along_a_full_line() {
        let mut board = empty_board();
        board.place(p(3, 0), Some(Marble::White));
        for col in 1..BOARD_SIZE {
            board.place(p(3, col), Some(Marble::Red));
        }

        let result = board.push(p(3, 0), Direction::Right);

        assert_eq!(result.fell_off, Some(Marble::Red));
        assert_eq!(board.cell(p(3, 0)), Cell::Empty);
        assert_eq!(board.cell(p(3, 1)), Cell::Marble(Marble::White));
        assert_eq!(board.count(Marble::Red), 5);
    }

    #[test]
    fn test_would_fall_off_matches_push_without_mutating() {
        let mut board = empty_board();
        board.place(p(3, 5), Some(Marble::White));
        board.place(p(3, 6), Some(Marble::Red));

        let before = board.snapshot();
        assert_eq!(
            board.would_fall_off(p(3, 5), Direction::Right),
            Some(Marble::Red)
        );
        assert_eq!(board.snapshot(), before);

        // Away from the rim nothing falls
        assert_eq!(board.would_fall_off(p(3, 5), Direction::Left), None);

        let result = board.push(p(3, 5), Direction::Right);
        assert_eq!(result.fell_off, Some(Marble::Red));
    }

    #[test]
    fn test_would_fall_off_on_empty_origin() {
        let board = empty_board();
        assert_eq!(board.would_fall_off(p(3, 3), Direction::Right), None);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut board = Board::new();
        let before = board.snapshot();

        board.push(p(0, 0), Direction::Right);
        assert_ne!(board.snapshot(), before);

        board.restore(before);
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let mut board = Board::new();
        let opening = board.snapshot();

        board.push(p(0, 0), Direction::Right);
        let first = board.snapshot();
        board.record(first);

        board.push(p(6, 6), Direction::Left);
        let second = board.snapshot();
        board.record(second);

        assert_eq!(board.history().len(), 3);
        assert_eq!(board.history()[0], opening);
        assert_eq!(board.history()[1], first);
        assert_eq!(board.history()[2], second);
    }

    #[test]
    fn test_detects_a_push_that_undoes_the_previous_one() {
        let mut board = empty_board();
        board.place(p(3, 2), Some(Marble::White));
        board.place(p(3, 3), Some(Marble::Black));
        board.rebase_history();

        board.push(p(3, 2), Direction::Right);
        assert!(!board.undoes_opponent_move());
        let committed = board.snapshot();
        board.record(committed);

        // Pushing the pair straight back recreates the rebased state
        board.push(p(3, 4), Direction::Left);
        assert!(board.undoes_opponent_move());
    }

    #[test]
    fn test_fresh_board_never_counts_as_undo() {
        let board = Board::new();
        assert!(!board.undoes_opponent_move());
    }
}
