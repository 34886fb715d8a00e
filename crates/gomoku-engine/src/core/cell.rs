/// One of the two sides. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::FromStr)]
pub enum Mark {
    Black,
    White,
}

impl Mark {
    pub const ALL: [Self; 2] = [Self::Black, Self::White];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Content of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Black => Cell::Black,
            Mark::White => Cell::White,
        }
    }
}

impl Cell {
    /// Exchanges black and white, leaving empty cells untouched.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Black => Cell::White,
            Cell::White => Cell::Black,
        }
    }

    /// Numeric code fed to the network input layer.
    #[must_use]
    pub const fn input_value(self) -> f32 {
        match self {
            Cell::Empty => 0.0,
            Cell::Black => -1.0,
            Cell::White => 1.0,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => '*',
            Cell::White => 'O',
        }
    }
}
