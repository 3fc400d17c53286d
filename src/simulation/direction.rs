//! The four axis-aligned headings the drone can move and sense along.

use serde::Deserialize;

/// Axis-aligned heading. Image coordinates: `y` grows downward.
///
/// Config files name headings in lowercase (`"up"`, `"left"`, ...); anything
/// else fails deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed order of a `SensorReading`: right, left, up, down.
    pub const SENSOR_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit step for this heading.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Step of `stride` cells along this heading.
    #[must_use]
    pub const fn scaled(self, stride: i32) -> (i32, i32) {
        let (dx, dy) = self.vector();
        (dx * stride, dy * stride)
    }

    /// The heading that undoes a move along this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Arrow glyph used by the terminal renderer.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}
