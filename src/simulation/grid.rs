use crate::error::{Result, SimError};

/// Integer cell coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`, or `None` if either
    /// coordinate overflows. An overflowing target is off every grid.
    #[must_use]
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Squared Euclidean distance, exact in integers.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> i64 {
        let d_x = i64::from(self.x) - i64::from(other.x);
        let d_y = i64::from(self.y) - i64::from(other.y);
        d_x * d_x + d_y * d_y
    }
}

/// Represents the maze the drone flies over.
///
/// A row-major boolean map where `true` marks a traversable cell. It is built
/// once from the source image and never mutated afterwards, so every query is
/// pure and safe to run from several threads at once.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Builds a grid from rows of cells (`rows[y][x]`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::EmptyGrid` when there are no rows or the first row is
    /// empty, and `SimError::NonRectangular` when row lengths differ.
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(SimError::EmptyGrid);
        }
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != width {
                return Err(SimError::NonRectangular {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
            cells.extend(line);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parses an ASCII map: `#` is a wall, any other character is traversable.
    /// Lines are trimmed and blank lines skipped.
    ///
    /// # Errors
    ///
    /// Same as [`OccupancyGrid::new`].
    pub fn from_ascii(map: &str) -> Result<Self> {
        let rows = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|c| c != '#').collect())
            .collect();
        Self::new(rows)
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Larger of the two dimensions; no ray can be longer than this.
    #[must_use]
    pub fn max_extent(&self) -> u32 {
        u32::try_from(self.width.max(self.height)).unwrap_or(u32::MAX)
    }

    /// Row-major index of an in-bounds cell.
    #[must_use]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Returns `true` if `(x, y)` is inside the grid and traversable.
    /// Anything outside the bounds is treated as a wall.
    #[must_use]
    pub fn is_traversable(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some_and(|idx| self.cells[idx])
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.is_traversable(pos.x, pos.y)
    }

    /// Traversable cells in row-major order (the drawable track).
    pub fn traversable_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &open)| open)
            .map(|(idx, _)| Position::new((idx % self.width) as i32, (idx / self.width) as i32))
    }

    #[must_use]
    pub fn traversable_count(&self) -> usize {
        self.cells.iter().filter(|&&open| open).count()
    }

    /// Returns `(x, y)` itself when it is traversable, otherwise the
    /// traversable cell closest to it in Euclidean distance. Ties go to the
    /// first cell in row-major order. `None` only if no cell is traversable.
    #[must_use]
    pub fn find_nearest_traversable(&self, x: i32, y: i32) -> Option<Position> {
        let query = Position::new(x, y);
        if self.contains(query) {
            return Some(query);
        }

        let mut best: Option<(i64, Position)> = None;
        for cell in self.traversable_cells() {
            let dist = cell.distance_sq(query);
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }
}
