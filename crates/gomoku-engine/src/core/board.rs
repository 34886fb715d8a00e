use std::ops::Index;

use crate::CellOccupiedError;

use super::{
    cell::{Cell, Mark},
    position::Position,
};

/// Side length of the standard gomoku board.
pub const STANDARD_SIZE: usize = 15;

/// A fixed-size grid of [`Cell`]s stored in row-major order.
///
/// The dimensions are chosen at construction and never change. Every position with
/// `row < rows()` and `col < cols()` is addressable; indexing outside the grid is a
/// programming error and panics rather than clamping.
///
/// Cell `(row, col)` lives at flat index `row * cols() + col`, which is also the index
/// of its input and output unit in the network.
///
/// # Example
///
/// ```
/// use gomoku_engine::{Board, Cell, Mark, Position};
///
/// let mut board = Board::standard();
/// board.place(Position::new(7, 7), Mark::Black).unwrap();
///
/// assert_eq!(board[Position::new(7, 7)], Cell::Black);
/// assert_eq!(board.empty_count(), 15 * 15 - 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "board dimensions must be non-zero, got {rows}x{cols}"
        );
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Creates an empty 15x15 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_SIZE, STANDARD_SIZE)
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when no stone has been placed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns the row-major index of `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside the board.
    #[must_use]
    pub fn index_of(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position ({pos}) is outside the {}x{} board",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Inverse of [`Self::index_of`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.cell_count()`.
    #[must_use]
    pub fn position_at(&self, index: usize) -> Position {
        assert!(
            index < self.cells.len(),
            "cell index {index} is outside the {}x{} board",
            self.rows,
            self.cols
        );
        Position::new(index / self.cols, index % self.cols)
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `pos`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[pos.row * self.cols + pos.col])
    }

    /// Overwrites a cell unconditionally.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.index_of(pos);
        self.cells[index] = cell;
    }

    /// Puts a stone on an empty cell.
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), CellOccupiedError> {
        let index = self.index_of(pos);
        if !self.cells[index].is_empty() {
            return Err(CellOccupiedError { position: pos });
        }
        self.cells[index] = mark.into();
        Ok(())
    }

    /// Iterates over empty cells in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| self.position_at(i))
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns the board as seen by `mark`: its own stones become white and the
    /// opponent's black.
    ///
    /// The network always plays white, so this is the input it is queried with.
    /// Viewing as white is the identity.
    #[must_use]
    pub fn viewed_by(&self, mark: Mark) -> Self {
        match mark {
            Mark::White => self.clone(),
            Mark::Black => Self {
                rows: self.rows,
                cols: self.cols,
                cells: self.cells.iter().map(|c| c.swapped()).collect(),
            },
        }
    }

    /// Numeric input codes, one per cell in row-major order.
    pub fn input_values(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.cells.iter().map(|c| c.input_value())
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[self.index_of(pos)]
    }
}
