//! # Grid Mathematics
//!
//! Small integer helpers for grid geometry: clamping, range intersection and
//! Bresenham line stepping.

use crate::game::Position;
use std::ops::RangeInclusive;

/// Clamps `value` into `low..=high`.
///
/// # Examples
///
/// ```
/// use cavern::clamp;
///
/// assert_eq!(clamp(12, 0, 10), 10);
/// assert_eq!(clamp(-3, 0, 10), 0);
/// assert_eq!(clamp(4, 0, 10), 4);
/// ```
pub fn clamp(value: i32, low: i32, high: i32) -> i32 {
    value.max(low).min(high)
}

/// Intersection of two inclusive ranges, or `None` if they do not overlap.
pub fn intersection(a: &RangeInclusive<i32>, b: &RangeInclusive<i32>) -> Option<RangeInclusive<i32>> {
    let low = (*a.start()).max(*b.start());
    let high = (*a.end()).min(*b.end());
    if low <= high {
        Some(low..=high)
    } else {
        None
    }
}

/// Smallest inclusive range covering both inputs.
pub fn union_span(a: &RangeInclusive<i32>, b: &RangeInclusive<i32>) -> RangeInclusive<i32> {
    (*a.start()).min(*b.start())..=(*a.end()).max(*b.end())
}

/// Integer Bresenham line from `from` to `to`, both endpoints included.
///
/// # Examples
///
/// ```
/// use cavern::{BresenhamLine, Position};
///
/// let cells: Vec<Position> = BresenhamLine::new(Position::new(0, 0), Position::new(3, 1)).collect();
/// assert_eq!(cells.first(), Some(&Position::new(0, 0)));
/// assert_eq!(cells.last(), Some(&Position::new(3, 1)));
/// assert_eq!(cells.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: Position,
    target: Position,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(from: Position, to: Position) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            current: from,
            target: to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let point = self.current;
        if point == self.target {
            self.done = true;
            return Some(point);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.current.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        assert_eq!(intersection(&(1..=5), &(3..=8)), Some(3..=5));
        assert_eq!(intersection(&(1..=2), &(3..=8)), None);
        assert_eq!(intersection(&(4..=4), &(4..=9)), Some(4..=4));
        assert_eq!(union_span(&(1..=2), &(5..=8)), 1..=8);
    }

    #[test]
    fn test_bresenham_single_cell() {
        let cells: Vec<Position> =
            BresenhamLine::new(Position::new(2, 2), Position::new(2, 2)).collect();
        assert_eq!(cells, vec![Position::new(2, 2)]);
    }

    #[test]
    fn test_bresenham_diagonal() {
        let cells: Vec<Position> =
            BresenhamLine::new(Position::new(0, 0), Position::new(3, 3)).collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(2, 2),
                Position::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_bresenham_steps_are_adjacent() {
        let from = Position::new(4, 1);
        let to = Position::new(-3, 6);
        let cells: Vec<Position> = BresenhamLine::new(from, to).collect();
        assert_eq!(cells.first(), Some(&from));
        assert_eq!(cells.last(), Some(&to));
        for pair in cells.windows(2) {
            let step = pair[1] - pair[0];
            assert!(step.x.abs() <= 1 && step.y.abs() <= 1);
            assert_ne!(step, Position::origin());
        }
    }
}
