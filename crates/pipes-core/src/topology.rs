use crate::direction::Direction;
use serde::{Deserialize, Serialize};

/// A cell position, `x` in `0..width`, `y` in `0..height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed adjacency of the grid.
///
/// A column tunnel joins the South edge of its bottom cell with the North
/// edge of its top cell; a row tunnel joins the West edge of its first cell
/// with the East edge of its last cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    width: usize,
    height: usize,
    column_tunnels: Vec<usize>,
    row_tunnels: Vec<usize>,
}

impl Topology {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            column_tunnels: Vec::new(),
            row_tunnels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Columns wrapping North to South, in placement order
    pub fn column_tunnels(&self) -> &[usize] {
        &self.column_tunnels
    }

    /// Rows wrapping East to West, in placement order
    pub fn row_tunnels(&self) -> &[usize] {
        &self.row_tunnels
    }

    pub fn tunnel_count(&self) -> usize {
        self.column_tunnels.len() + self.row_tunnels.len()
    }

    pub fn is_column_tunnel(&self, x: usize) -> bool {
        self.column_tunnels.contains(&x)
    }

    pub fn is_row_tunnel(&self, y: usize) -> bool {
        self.row_tunnels.contains(&y)
    }

    pub(crate) fn add_column_tunnel(&mut self, x: usize) {
        debug_assert!(x < self.width && !self.is_column_tunnel(x));
        self.column_tunnels.push(x);
    }

    pub(crate) fn add_row_tunnel(&mut self, y: usize) {
        debug_assert!(y < self.height && !self.is_row_tunnel(y));
        self.row_tunnels.push(y);
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Storage index of a cell; cells are laid out column by column
    pub fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {} outside {}x{} grid",
            pos,
            self.width,
            self.height
        );
        pos.x * self.height + pos.y
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index / self.height, index % self.height)
    }

    /// Every position, column by column
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
    }

    /// Whether leaving `pos` through `direction` crosses a tunnel
    pub fn crosses_tunnel(&self, pos: Position, direction: Direction) -> bool {
        match direction {
            Direction::North => pos.y + 1 == self.height && self.is_column_tunnel(pos.x),
            Direction::South => pos.y == 0 && self.is_column_tunnel(pos.x),
            Direction::East => pos.x + 1 == self.width && self.is_row_tunnel(pos.y),
            Direction::West => pos.x == 0 && self.is_row_tunnel(pos.y),
        }
    }

    /// The cell across the `direction` edge of `pos`, wrapping through tunnels.
    /// `None` when the edge faces the outside of the grid.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        match direction {
            Direction::North if pos.y + 1 < self.height => Some(Position::new(pos.x, pos.y + 1)),
            Direction::South if pos.y > 0 => Some(Position::new(pos.x, pos.y - 1)),
            Direction::East if pos.x + 1 < self.width => Some(Position::new(pos.x + 1, pos.y)),
            Direction::West if pos.x > 0 => Some(Position::new(pos.x - 1, pos.y)),
            _ if self.crosses_tunnel(pos, direction) => Some(match direction {
                Direction::North => Position::new(pos.x, 0),
                Direction::South => Position::new(pos.x, self.height - 1),
                Direction::East => Position::new(0, pos.y),
                Direction::West => Position::new(self.width - 1, pos.y),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_neighbors() {
        let topology = Topology::new(3, 3);
        let center = Position::new(1, 1);
        assert_eq!(topology.neighbor(center, Direction::North), Some(Position::new(1, 2)));
        assert_eq!(topology.neighbor(center, Direction::South), Some(Position::new(1, 0)));
        assert_eq!(topology.neighbor(center, Direction::East), Some(Position::new(2, 1)));
        assert_eq!(topology.neighbor(center, Direction::West), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_boundary_without_tunnel() {
        let topology = Topology::new(3, 2);
        assert_eq!(topology.neighbor(Position::new(0, 0), Direction::West), None);
        assert_eq!(topology.neighbor(Position::new(0, 0), Direction::South), None);
        assert_eq!(topology.neighbor(Position::new(2, 1), Direction::East), None);
        assert_eq!(topology.neighbor(Position::new(2, 1), Direction::North), None);
    }

    #[test]
    fn test_tunnels_wrap() {
        let mut topology = Topology::new(4, 3);
        topology.add_column_tunnel(2);
        topology.add_row_tunnel(0);

        assert_eq!(topology.neighbor(Position::new(2, 2), Direction::North), Some(Position::new(2, 0)));
        assert_eq!(topology.neighbor(Position::new(2, 0), Direction::South), Some(Position::new(2, 2)));
        assert_eq!(topology.neighbor(Position::new(0, 0), Direction::West), Some(Position::new(3, 0)));
        assert_eq!(topology.neighbor(Position::new(3, 0), Direction::East), Some(Position::new(0, 0)));
        // Other lines stay closed
        assert_eq!(topology.neighbor(Position::new(1, 2), Direction::North), None);
        assert_eq!(topology.neighbor(Position::new(0, 1), Direction::West), None);
        assert!(topology.crosses_tunnel(Position::new(2, 0), Direction::South));
        assert!(!topology.crosses_tunnel(Position::new(2, 1), Direction::South));
        assert_eq!(topology.tunnel_count(), 2);
    }

    #[test]
    fn test_single_cell_tunnel_wraps_to_itself() {
        let mut topology = Topology::new(1, 1);
        topology.add_row_tunnel(0);
        let only = Position::new(0, 0);
        assert_eq!(topology.neighbor(only, Direction::East), Some(only));
        assert_eq!(topology.neighbor(only, Direction::North), None);
    }

    #[test]
    fn test_index_round_trip_is_column_major() {
        let topology = Topology::new(3, 2);
        let order: Vec<Position> = topology.positions().collect();
        assert_eq!(order[0], Position::new(0, 0));
        assert_eq!(order[1], Position::new(0, 1));
        assert_eq!(order[2], Position::new(1, 0));
        for (i, pos) in order.iter().enumerate() {
            assert_eq!(topology.index(*pos), i);
            assert_eq!(topology.position(i), *pos);
        }
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_is_fatal() {
        Topology::new(2, 2).index(Position::new(2, 0));
    }
}
