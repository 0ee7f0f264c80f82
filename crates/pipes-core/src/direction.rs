use serde::{Deserialize, Serialize};

/// One of the four edges of a tile.
///
/// North points towards increasing `y`, East towards increasing `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn index(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// The direction pointing the other way across the same edge
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Rotate clockwise by the given rotation
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarter_turns())
    }

    /// Rotate counter-clockwise by the given rotation
    pub fn unrotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + 4 - rotation.quarter_turns())
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "North"),
            Direction::East => write!(f, "East"),
            Direction::South => write!(f, "South"),
            Direction::West => write!(f, "West"),
        }
    }
}

/// Which way a rotation command turns a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    /// Counter-clockwise, -90 degrees
    Left,
    /// Clockwise, +90 degrees
    Right,
}

/// A tile pose: 0, 90, 180 or 270 degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);
    pub const HALF: Rotation = Rotation(2);

    /// Build a rotation from a number of clockwise quarter turns (taken mod 4)
    pub fn from_quarter_turns(turns: u8) -> Self {
        Self(turns % 4)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    pub fn degrees(self) -> u16 {
        self.0 as u16 * 90
    }

    /// Rotation after one quarter turn in the given direction
    pub fn turned(self, turn: Turn) -> Self {
        match turn {
            Turn::Left => Self((self.0 + 3) % 4),
            Turn::Right => Self((self.0 + 1) % 4),
        }
    }

    /// This rotation plus another one
    pub fn plus(self, other: Rotation) -> Self {
        Self((self.0 + other.0) % 4)
    }

    /// The rotation that takes `from` to `self`
    pub fn minus(self, from: Rotation) -> Self {
        Self((self.0 + 4 - from.0) % 4)
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Set of connector directions present on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ConnectorSet(u8);

impl ConnectorSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn full() -> Self {
        Self(0b1111)
    }

    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut set = Self::empty();
        for &direction in directions {
            set.insert(direction);
        }
        set
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }

    /// The whole set turned clockwise by `rotation`
    pub fn rotated(self, rotation: Rotation) -> Self {
        let mut rotated = Self::empty();
        for direction in self.iter() {
            rotated.insert(direction.rotated(rotation));
        }
        rotated
    }

    /// Exactly two connectors facing away from each other (a straight pipe)
    pub fn is_straight(self) -> bool {
        self == Self::from_directions(&[Direction::North, Direction::South])
            || self == Self::from_directions(&[Direction::East, Direction::West])
    }

    pub fn as_raw(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let quarter = Rotation::from_quarter_turns(1);
        assert_eq!(Direction::North.rotated(quarter), Direction::East);
        assert_eq!(Direction::West.rotated(quarter), Direction::North);
        assert_eq!(Direction::East.unrotated(quarter), Direction::North);
    }

    #[test]
    fn test_turns_wrap() {
        let r = Rotation::ZERO.turned(Turn::Left);
        assert_eq!(r.degrees(), 270);
        assert_eq!(r.turned(Turn::Right), Rotation::ZERO);
        assert_eq!(Rotation::from_quarter_turns(3).minus(Rotation::from_quarter_turns(1)), Rotation::HALF);
    }

    #[test]
    fn test_connector_set() {
        let mut set = ConnectorSet::full();
        assert_eq!(set.len(), 4);
        set.remove(Direction::West);
        assert!(!set.contains(Direction::West));
        assert_eq!(set.len(), 3);

        let elbow = ConnectorSet::from_directions(&[Direction::North, Direction::East]);
        let turned = elbow.rotated(Rotation::from_quarter_turns(1));
        assert_eq!(turned, ConnectorSet::from_directions(&[Direction::East, Direction::South]));
    }

    #[test]
    fn test_raw_bits_follow_clockwise_order() {
        assert_eq!(ConnectorSet::empty().as_raw(), 0);
        assert_eq!(ConnectorSet::full().as_raw(), 0b1111);
        let elbow = ConnectorSet::from_directions(&[Direction::North, Direction::West]);
        assert_eq!(elbow.as_raw(), 0b1001);
        assert_eq!(elbow.rotated(Rotation::from_quarter_turns(1)).as_raw(), 0b0011);
    }

    #[test]
    fn test_straight_detection() {
        assert!(ConnectorSet::from_directions(&[Direction::East, Direction::West]).is_straight());
        assert!(!ConnectorSet::from_directions(&[Direction::North, Direction::West]).is_straight());
        assert!(!ConnectorSet::full().is_straight());
    }
}
