use std::fmt;

use super::{board::Board, position::Position};

/// Renders the board as text: a column header, then one line per row.
///
/// ```text
///     0  1  2
///  0  .  *  .
///  1  .  O  .
///  2  .  .  .
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.cols() {
            write!(f, " {col:>2}")?;
        }
        writeln!(f)?;
        for row in 0..self.rows() {
            write!(f, "{row:>2}")?;
            for col in 0..self.cols() {
                write!(f, "  {}", self[Position::new(row, col)].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
