//! Explored-history trail.
//!
//! Append-only record of every cell the drone stood on or observed, plus a
//! per-cell mask so renderers can ask "was this cell explored?" in O(1).

use crate::simulation::grid::{OccupancyGrid, Position};

/// How a trail point was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailSource {
    /// Position the drone left on a successful move.
    Visited,
    /// Cell painted by the sensor footprint during exploration.
    Observed,
}

/// A single entry in the trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailPoint {
    pub position: Position,
    pub source: TrailSource,
}

/// Per-cell exploration state, strongest mark wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellMark {
    #[default]
    Unexplored,
    Observed,
    Visited,
}

#[derive(Clone, Debug)]
pub struct Trail {
    points: Vec<TrailPoint>,
    marks: Vec<CellMark>,
    width: usize,
    explored: usize,
}

impl Trail {
    /// Creates an empty trail sized for `grid`.
    #[must_use]
    pub fn new(grid: &OccupancyGrid) -> Self {
        Self {
            points: Vec::new(),
            marks: vec![CellMark::Unexplored; grid.width() * grid.height()],
            width: grid.width(),
            explored: 0,
        }
    }

    pub fn push(&mut self, position: Position, source: TrailSource) {
        self.points.push(TrailPoint { position, source });

        let Some(idx) = self.index_of(position) else {
            return;
        };
        let mark = match source {
            TrailSource::Visited => CellMark::Visited,
            TrailSource::Observed => CellMark::Observed,
        };
        let slot = &mut self.marks[idx];
        if *slot == CellMark::Unexplored {
            self.explored += 1;
        }
        if mark == CellMark::Visited || *slot == CellMark::Unexplored {
            *slot = mark;
        }
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        let idx = y * self.width + x;
        (x < self.width && idx < self.marks.len()).then_some(idx)
    }

    /// Mark of the cell at `(x, y)`; out of bounds reads as unexplored.
    #[must_use]
    pub fn mark(&self, x: i32, y: i32) -> CellMark {
        self.index_of(Position::new(x, y))
            .map_or(CellMark::Unexplored, |idx| self.marks[idx])
    }

    #[must_use]
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions the drone actually stood on, in order.
    pub fn visited(&self) -> impl Iterator<Item = Position> + '_ {
        self.points
            .iter()
            .filter(|p| p.source == TrailSource::Visited)
            .map(|p| p.position)
    }

    /// Number of distinct cells explored so far.
    #[must_use]
    pub const fn explored_cells(&self) -> usize {
        self.explored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visited_overrides_observed() {
        let grid = OccupancyGrid::from_ascii("...\n...").unwrap();
        let mut trail = Trail::new(&grid);

        trail.push(Position::new(1, 1), TrailSource::Observed);
        assert_eq!(trail.mark(1, 1), CellMark::Observed);
        trail.push(Position::new(1, 1), TrailSource::Visited);
        assert_eq!(trail.mark(1, 1), CellMark::Visited);
        trail.push(Position::new(1, 1), TrailSource::Observed);
        assert_eq!(trail.mark(1, 1), CellMark::Visited);

        assert_eq!(trail.len(), 3);
        assert_eq!(trail.explored_cells(), 1);
    }

    #[test]
    fn test_out_of_bounds_mark() {
        let grid = OccupancyGrid::from_ascii("..").unwrap();
        let trail = Trail::new(&grid);
        assert_eq!(trail.mark(-1, 0), CellMark::Unexplored);
        assert_eq!(trail.mark(5, 0), CellMark::Unexplored);
    }
}
