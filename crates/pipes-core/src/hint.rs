use crate::direction::Rotation;
use crate::puzzle::Puzzle;
use crate::tile::Tile;
use crate::topology::Position;

/// A hint can fix this tile to one unambiguous pose.
///
/// Locked tiles, tiles already at their solved rotation and crosses are
/// skipped. A straight pipe turned half way round looks solved, so it is
/// skipped too.
pub fn is_hintable(tile: &Tile) -> bool {
    if tile.is_locked() || tile.target_rotation() == tile.original_rotation() {
        return false;
    }
    if tile.connector_count() >= 4 {
        return false;
    }
    let flipped = tile.original_rotation().plus(Rotation::HALF);
    !(tile.solved_connectors().is_straight() && tile.target_rotation() == flipped)
}

/// Positions of every hintable tile, in storage order
pub(crate) fn solvable_tiles(puzzle: &Puzzle) -> Vec<Position> {
    puzzle
        .tiles()
        .iter()
        .filter(|tile| is_hintable(tile))
        .map(|tile| tile.pos())
        .collect()
}

/// Draw one hintable tile from the puzzle's random stream
pub(crate) fn find_solvable_tile(puzzle: &mut Puzzle) -> Option<Position> {
    let candidates = solvable_tiles(puzzle);
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[puzzle.rng.below(candidates.len())])
}
