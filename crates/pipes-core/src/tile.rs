use crate::direction::{ConnectorSet, Direction, Rotation, Turn};
use crate::topology::Position;
use serde::{Deserialize, Serialize};

/// Color carried from a source tile through the pipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SourceColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color shared by every source when distinct colors are off
    pub const DEFAULT: SourceColor = SourceColor::new(0, 128, 255);

    /// Palette for distinct source colors, cycled when sources outnumber it
    pub const PALETTE: [SourceColor; 8] = [
        SourceColor::new(230, 60, 60),
        SourceColor::new(60, 200, 80),
        SourceColor::new(50, 110, 255),
        SourceColor::new(240, 200, 40),
        SourceColor::new(200, 70, 220),
        SourceColor::new(40, 210, 220),
        SourceColor::new(255, 140, 30),
        SourceColor::new(240, 240, 240),
    ];

    /// Additive mix of several colors, saturating per channel
    pub fn mix(colors: &[SourceColor]) -> Option<SourceColor> {
        if colors.is_empty() {
            return None;
        }
        let mut mixed = SourceColor::new(0, 0, 0);
        for color in colors {
            mixed.r = mixed.r.saturating_add(color.r);
            mixed.g = mixed.g.saturating_add(color.g);
            mixed.b = mixed.b.saturating_add(color.b);
        }
        Some(mixed)
    }
}

/// A single grid cell with up to four pipe connectors.
///
/// The connector set is stored in the tile's solved pose (`original_rotation`).
/// Connectors at any other pose are derived by turning the set by the
/// difference between the current rotation and the original one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pos: Position,
    connectors: ConnectorSet,
    original_rotation: Rotation,
    /// Physical pose, lags behind `target_rotation` while turning
    rotation: Rotation,
    target_rotation: Rotation,
    turning: bool,
    locked: bool,
    source: Option<SourceColor>,
    connected_colors: Vec<SourceColor>,
}

impl Tile {
    /// A tile with all four connectors in its solved pose
    pub fn new(pos: Position, original_rotation: Rotation) -> Self {
        Self {
            pos,
            connectors: ConnectorSet::full(),
            original_rotation,
            rotation: original_rotation,
            target_rotation: original_rotation,
            turning: false,
            locked: false,
            source: None,
            connected_colors: Vec::new(),
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn original_rotation(&self) -> Rotation {
        self.original_rotation
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn target_rotation(&self) -> Rotation {
        self.target_rotation
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_color(&self) -> Option<SourceColor> {
        self.source
    }

    /// Number of connectors, independent of rotation
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Connectors in the solved pose
    pub fn solved_connectors(&self) -> ConnectorSet {
        self.connectors
    }

    /// Connectors at the current physical rotation
    pub fn connectors(&self) -> ConnectorSet {
        self.connectors.rotated(self.rotation.minus(self.original_rotation))
    }

    /// Connectors as they will be once the tile reaches its target rotation
    pub fn target_connectors(&self) -> ConnectorSet {
        self.connectors
            .rotated(self.target_rotation.minus(self.original_rotation))
    }

    /// Whether a connector points in `direction` at the current rotation
    pub fn connector_present(&self, direction: Direction) -> bool {
        self.connectors
            .contains(direction.unrotated(self.rotation.minus(self.original_rotation)))
    }

    /// The tile has reached its target pose and is not mid-transition
    pub fn is_idle(&self) -> bool {
        !self.turning && self.rotation == self.target_rotation
    }

    /// Colors of the sources currently reaching this tile
    pub fn connected_colors(&self) -> &[SourceColor] {
        &self.connected_colors
    }

    /// Target rotation is the solved pose or an indistinguishable one
    pub fn is_solved(&self) -> bool {
        self.target_connectors() == self.connectors
    }

    /// Queue a quarter turn. Returns false for a locked tile.
    pub(crate) fn rotate(&mut self, turn: Turn) -> bool {
        if self.locked {
            return false;
        }
        self.target_rotation = self.target_rotation.turned(turn);
        true
    }

    /// Turn to the solved pose and lock the tile
    pub(crate) fn solve(&mut self) {
        self.target_rotation = self.original_rotation;
        self.locked = true;
    }

    /// Start a transition towards the target rotation
    pub(crate) fn begin_turn(&mut self) {
        self.turning = true;
    }

    /// Finish any transition: the physical pose becomes the target pose
    pub(crate) fn settle(&mut self) -> bool {
        let changed = self.turning || self.rotation != self.target_rotation;
        self.rotation = self.target_rotation;
        self.turning = false;
        changed
    }

    /// Set both physical and target pose, used only while scrambling
    pub(crate) fn set_pose(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.target_rotation = rotation;
        self.turning = false;
    }

    pub(crate) fn make_source(&mut self, color: SourceColor) {
        self.source = Some(color);
    }

    pub(crate) fn make_lock(&mut self) {
        self.locked = true;
    }

    /// Drop the connector currently pointing in `direction`
    pub(crate) fn remove_connector(&mut self, direction: Direction) {
        let base = direction.unrotated(self.rotation.minus(self.original_rotation));
        self.connectors.remove(base);
    }

    /// Put back the connector currently pointing in `direction`
    pub(crate) fn restore_connector(&mut self, direction: Direction) {
        let base = direction.unrotated(self.rotation.minus(self.original_rotation));
        self.connectors.insert(base);
    }

    pub(crate) fn clear_colors(&mut self) {
        self.connected_colors.clear();
    }

    pub(crate) fn add_color(&mut self, color: SourceColor) {
        if !self.connected_colors.contains(&color) {
            self.connected_colors.push(color);
        }
    }
}
