//! Cell and coordinate types for the block grid.

use std::fmt;

/// Index into the block palette. The host maps it to a sprite.
pub type ColorId = u8;

/// Contents of one grid slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(ColorId),
}

impl Cell {
    #[must_use]
    pub fn color(self) -> Option<ColorId> {
        match self {
            Self::Empty => None,
            Self::Occupied(color) => Some(color),
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    /// Byte encoding used by the WASM buffer: 0 is Empty, `color + 1` otherwise.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Occupied(color) => color.saturating_add(1),
        }
    }
}

/// `.` for Empty, `0`-`9` then `a`-`z` for colors 0 to 35, `#` beyond that.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Empty => '.',
            Self::Occupied(color) => char::from_digit(u32::from(*color), 36).unwrap_or('#'),
        };
        write!(f, "{symbol}")
    }
}

/// Grid coordinate. Row 0 is the bottom of the board.
///
/// Ordering is row-major so sets of positions iterate bottom-left first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    /// The four axis-aligned neighbours. May lie outside the grid.
    #[must_use]
    pub fn neighbors(self) -> [Pos; 4] {
        [
            Pos::new(self.x + 1, self.y),
            Pos::new(self.x - 1, self.y),
            Pos::new(self.x, self.y + 1),
            Pos::new(self.x, self.y - 1),
        ]
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
