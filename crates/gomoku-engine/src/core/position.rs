use std::str::FromStr;

use crate::ParsePositionError;

/// A 0-based `(row, col)` cell coordinate.
///
/// Positions are plain coordinates; whether one lies on a given board is checked by
/// [`Board::contains`](crate::Board::contains).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{row} {col}")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves by a signed step, returning `None` when either coordinate would go negative.
    #[must_use]
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Parses `"row col"` or `"row,col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty());
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParsePositionError::Shape {
                input: s.to_owned(),
            });
        };
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|source| ParsePositionError::Coordinate {
                    input: part.to_owned(),
                    source,
                })
        };
        Ok(Self::new(parse(row)?, parse(col)?))
    }
}
