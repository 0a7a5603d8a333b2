use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Movement direction as a set of axis bits.
    ///
    /// The six cardinal/vertical directions are single bits; the four
    /// diagonals are the OR of their two components, so `NORTH | EAST` and
    /// `NORTHEAST` are the same value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        const NORTH = 1 << 0;
        const EAST = 1 << 1;
        const SOUTH = 1 << 2;
        const WEST = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;

        const NORTHEAST = Self::NORTH.bits() | Self::EAST.bits();
        const NORTHWEST = Self::NORTH.bits() | Self::WEST.bits();
        const SOUTHEAST = Self::SOUTH.bits() | Self::EAST.bits();
        const SOUTHWEST = Self::SOUTH.bits() | Self::WEST.bits();
    }
}

/// (direction, reverse, canonical name, short form)
static TABLE: [(Direction, Direction, &str, &str); 10] = [
    (Direction::NORTH, Direction::SOUTH, "north", "n"),
    (Direction::EAST, Direction::WEST, "east", "e"),
    (Direction::SOUTH, Direction::NORTH, "south", "s"),
    (Direction::WEST, Direction::EAST, "west", "w"),
    (Direction::NORTHEAST, Direction::SOUTHWEST, "northeast", "ne"),
    (Direction::NORTHWEST, Direction::SOUTHEAST, "northwest", "nw"),
    (Direction::SOUTHEAST, Direction::NORTHWEST, "southeast", "se"),
    (Direction::SOUTHWEST, Direction::NORTHEAST, "southwest", "sw"),
    (Direction::UP, Direction::DOWN, "up", "u"),
    (Direction::DOWN, Direction::UP, "down", "d"),
];

impl Direction {
    /// The ten legal directions.
    pub const ALL: [Direction; 10] = [
        Direction::NORTH,
        Direction::EAST,
        Direction::SOUTH,
        Direction::WEST,
        Direction::NORTHEAST,
        Direction::NORTHWEST,
        Direction::SOUTHEAST,
        Direction::SOUTHWEST,
        Direction::UP,
        Direction::DOWN,
    ];

    fn entry(self) -> Option<&'static (Direction, Direction, &'static str, &'static str)> {
        TABLE.iter().find(|(d, ..)| *d == self)
    }

    pub fn is_legal(self) -> bool {
        self.entry().is_some()
    }

    /// Opposite direction, or `None` for a bit combination that is not one
    /// of the ten legal values.
    pub fn reverse(self) -> Option<Direction> {
        self.entry().map(|(_, rev, ..)| *rev)
    }

    /// Canonical lowercase name.
    pub fn to_text(self) -> Option<&'static str> {
        self.entry().map(|(_, _, name, _)| *name)
    }

    /// Parse a canonical name or its short form, ignoring case.
    pub fn from_text(text: &str) -> Option<Direction> {
        let text = text.trim();
        TABLE
            .iter()
            .find(|(_, _, name, short)| {
                name.eq_ignore_ascii_case(text) || short.eq_ignore_ascii_case(text)
            })
            .map(|(d, ..)| *d)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(name) => f.write_str(name),
            None => write!(f, "<invalid direction {:#04x}>", self.bits()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_text(s).ok_or_else(|| UnknownDirection(s.to_string()))
    }
}
