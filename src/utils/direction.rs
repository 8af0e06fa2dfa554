use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The four compass directions an intersection can have an exit in.
///
/// Iteration order (N, E, S, W) is the order used for signatures,
/// neighbor expansion in the BFS and deterministic tie breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Grid displacement of one step in this direction, north is +y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Slot index used by the per-node direction arrays.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Direction::North),
            'E' => Some(Direction::East),
            'S' => Some(Direction::South),
            'W' => Some(Direction::West),
            _ => None,
        }
    }

    /// Coordinates reached moving one step from `(x, y)`.
    pub fn step_from(self, (x, y): (i32, i32)) -> (i32, i32) {
        let (dx, dy) = self.offset();
        (x + dx, y + dy)
    }
}

/// Exit-existence flags of an intersection, as sensed on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Exits {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Exits {
    pub fn new(north: bool, east: bool, south: bool, west: bool) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// Builds the flags by asking `f` about every direction.
    pub fn from_fn(mut f: impl FnMut(Direction) -> bool) -> Self {
        Self::new(
            f(Direction::North),
            f(Direction::East),
            f(Direction::South),
            f(Direction::West),
        )
    }

    /// Parses a letter string such as `"NSW"`. Unknown letters are ignored.
    pub fn from_letters(letters: &str) -> Self {
        let present: Vec<Direction> = letters.chars().filter_map(Direction::from_letter).collect();
        Self::from_fn(|dir| present.contains(&dir))
    }

    pub fn from_signature(signature: &Signature) -> Self {
        Self::from_letters(signature.as_str())
    }

    pub fn has(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Directions with an exit, in N, E, S, W order.
    pub fn directions(&self) -> Vec<Direction> {
        Direction::iter().filter(|dir| self.has(*dir)).collect()
    }

    pub fn count(&self) -> usize {
        Direction::iter().filter(|dir| self.has(*dir)).count()
    }

    pub fn signature(&self) -> Signature {
        Signature(Direction::iter().filter(|dir| self.has(*dir)).map(Direction::letter).collect())
    }
}

/// Coarse identity of an intersection: the letters of its exits in N, E, S, W order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<Exits> for Signature {
    fn from(exits: Exits) -> Self {
        exits.signature()
    }
}
