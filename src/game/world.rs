//! # World Geometry
//!
//! Rooms, doors and corridors that make up a level, plus the geometry queries shared by
//! generation, movement and the field-of-view engine.

use super::Position;
use crate::game::Size;
use crate::utils::math::clamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Key and lock colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Red,
    Blue,
    Yellow,
}

impl KeyColor {
    /// Palette order used when assigning colours to locked edges.
    pub const PALETTE: [KeyColor; 3] = [KeyColor::Red, KeyColor::Blue, KeyColor::Yellow];

    /// Colour for the `index`-th lock, cycling through the palette.
    pub fn cycled(index: usize) -> KeyColor {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyColor::Red => "red",
            KeyColor::Blue => "blue",
            KeyColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for KeyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a door can be passed freely or needs a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorKind {
    Open,
    Locked(KeyColor),
}

/// A door on a room's perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub position: Position,
    pub kind: DoorKind,
}

impl Door {
    pub fn open(position: Position) -> Self {
        Self {
            position,
            kind: DoorKind::Open,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.kind, DoorKind::Locked(_))
    }

    /// Colour of the lock, if any.
    pub fn lock_color(&self) -> Option<KeyColor> {
        match self.kind {
            DoorKind::Locked(color) => Some(color),
            DoorKind::Open => None,
        }
    }
}

/// Orientation of the wall a door sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallAxis {
    /// Left or right wall; sight lines through the door keep `y` fixed.
    Vertical,
    /// Top or bottom wall; sight lines through the door keep `x` fixed.
    Horizontal,
}

/// A rectangular room. The perimeter is wall, the strict interior is floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Top-left corner (a wall cell)
    pub origin: Position,
    pub width: i32,
    pub height: i32,
    pub doors: Vec<Door>,
}

impl Room {
    /// Creates a room with no doors.
    pub fn new(origin: Position, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
            doors: Vec::new(),
        }
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.height - 1
    }

    /// True if the room has at least one floor cell (width and height ≥ 3).
    pub fn has_interior(&self) -> bool {
        self.left() + 1 <= self.right() - 1 && self.top() + 1 <= self.bottom() - 1
    }

    /// Columns of the strict interior.
    pub fn inner_x_range(&self) -> RangeInclusive<i32> {
        (self.left() + 1)..=(self.right() - 1)
    }

    /// Rows of the strict interior.
    pub fn inner_y_range(&self) -> RangeInclusive<i32> {
        (self.top() + 1)..=(self.bottom() - 1)
    }

    /// Geometric center, clamped into the interior ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use cavern::{Position, Room};
    ///
    /// let room = Room::new(Position::new(0, 0), 7, 5);
    /// assert_eq!(room.center(), Position::new(3, 2));
    /// ```
    pub fn center(&self) -> Position {
        let x = (self.left() + self.right()) / 2;
        let y = (self.top() + self.bottom()) / 2;
        let xs = self.inner_x_range();
        let ys = self.inner_y_range();
        Position::new(
            clamp(x, *xs.start(), *xs.end()),
            clamp(y, *ys.start(), *ys.end()),
        )
    }

    /// Checks if a position lies anywhere in the room, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left() && pos.x <= self.right() && pos.y >= self.top() && pos.y <= self.bottom()
    }

    /// Checks if a position lies in the strict interior.
    pub fn contains_interior(&self, pos: Position) -> bool {
        pos.x > self.left() && pos.x < self.right() && pos.y > self.top() && pos.y < self.bottom()
    }

    /// Checks if a position lies on the wall ring of this room.
    pub fn is_on_perimeter(&self, pos: Position) -> bool {
        let on_vertical = (pos.x == self.left() || pos.x == self.right())
            && pos.y >= self.top()
            && pos.y <= self.bottom();
        let on_horizontal = (pos.y == self.top() || pos.y == self.bottom())
            && pos.x >= self.left()
            && pos.x <= self.right();
        on_vertical || on_horizontal
    }

    /// All floor cells in row-major order. Empty for rooms without an interior.
    pub fn floor_positions(&self) -> Vec<Position> {
        if !self.has_interior() {
            return Vec::new();
        }
        let mut positions = Vec::new();
        for y in self.inner_y_range() {
            for x in self.inner_x_range() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// All perimeter cells, doors included.
    pub fn wall_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for x in self.left()..=self.right() {
            positions.push(Position::new(x, self.top()));
            if self.bottom() != self.top() {
                positions.push(Position::new(x, self.bottom()));
            }
        }
        for y in (self.top() + 1)..self.bottom() {
            positions.push(Position::new(self.left(), y));
            if self.right() != self.left() {
                positions.push(Position::new(self.right(), y));
            }
        }
        positions
    }

    pub fn door_at(&self, pos: Position) -> Option<&Door> {
        self.doors.iter().find(|door| door.position == pos)
    }

    /// Adds an open door unless one already exists at `pos`.
    pub fn add_door(&mut self, pos: Position) {
        if self.door_at(pos).is_none() {
            self.doors.push(Door::open(pos));
        }
    }

    /// Replaces the kind of the door at `pos`. Returns false if there is no door there.
    pub fn set_door_kind(&mut self, pos: Position, kind: DoorKind) -> bool {
        match self.doors.iter_mut().find(|door| door.position == pos) {
            Some(door) => {
                door.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Axis of the wall containing `pos`. Corners count as vertical.
    pub fn wall_axis(&self, pos: Position) -> Option<WallAxis> {
        if !self.is_on_perimeter(pos) {
            None
        } else if pos.x == self.left() || pos.x == self.right() {
            Some(WallAxis::Vertical)
        } else {
            Some(WallAxis::Horizontal)
        }
    }
}

/// Ordered corridor cells from a source door to a destination door.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorPath {
    pub tiles: Vec<Position>,
}

impl CorridorPath {
    pub fn new(tiles: Vec<Position>) -> Self {
        Self { tiles }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn last(&self) -> Option<Position> {
        self.tiles.last().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.contains(&pos)
    }
}

/// Static geometry of a level: canvas, rooms and corridors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGeometry {
    pub canvas: Size,
    pub rooms: Vec<Room>,
    pub corridors: Vec<CorridorPath>,
}

impl WorldGeometry {
    pub fn new(canvas: Size, rooms: Vec<Room>, corridors: Vec<CorridorPath>) -> Self {
        Self {
            canvas,
            rooms,
            corridors,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.canvas.contains(pos)
    }

    /// Door at `pos` together with the room that owns it.
    pub fn door_at(&self, pos: Position) -> Option<(&Room, &Door)> {
        self.rooms
            .iter()
            .find_map(|room| room.door_at(pos).map(|door| (room, door)))
    }

    pub fn is_door(&self, pos: Position) -> bool {
        self.door_at(pos).is_some()
    }

    pub fn is_locked_door(&self, pos: Position) -> bool {
        self.door_at(pos).is_some_and(|(_, door)| door.is_locked())
    }

    /// Axis of the wall holding the door at `pos`.
    pub fn door_axis(&self, pos: Position) -> Option<WallAxis> {
        self.door_at(pos).and_then(|(room, door)| room.wall_axis(door.position))
    }

    /// True for perimeter cells that are not doors.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.rooms.iter().any(|room| room.is_on_perimeter(pos)) && !self.is_door(pos)
    }

    /// Blocks line of sight: out of bounds, plain walls and locked doors.
    pub fn is_opaque(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.is_wall(pos) || self.is_locked_door(pos)
    }

    /// Room whose strict interior contains `pos`.
    pub fn room_with_interior(&self, pos: Position) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains_interior(pos))
    }

    /// True if a built corridor passes through `pos`.
    pub fn is_corridor(&self, pos: Position) -> bool {
        self.corridors.iter().any(|corridor| corridor.contains(pos))
    }

    pub fn door_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rooms
            .iter()
            .flat_map(|room| room.doors.iter().map(|door| door.position))
    }
}
