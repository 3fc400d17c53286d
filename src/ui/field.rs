use crate::simulation::trail::CellMark;
use crate::simulation::SimulationState;
use rayon::prelude::*;

/// Wall, unexplored track, observed, visited.
pub const CHARS: [char; 4] = [' ', '.', ':', 'o'];

/// Downsamples the maze into `rows` lines of `cols` characters.
///
/// Each terminal cell covers a block of grid cells and shows the strongest
/// state found in it, so thin trails survive the downscale.
#[must_use]
pub fn compute_field_grid(state: &SimulationState, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let grid = state.grid();
    let trail = &state.drone().trail;
    let (width, height) = (grid.width(), grid.height());

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let (y0, y1) = block(r, rows, height);
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let (x0, x1) = block(c, cols, width);
                let mut idx = 0;
                'scan: for y in y0..y1 {
                    for x in x0..x1 {
                        let (x, y) = (x as i32, y as i32);
                        let level = match trail.mark(x, y) {
                            CellMark::Visited => 3,
                            CellMark::Observed => 2,
                            CellMark::Unexplored => usize::from(grid.is_traversable(x, y)),
                        };
                        idx = idx.max(level);
                        if idx == CHARS.len() - 1 {
                            break 'scan;
                        }
                    }
                }
                line.push(CHARS[idx]);
            }
            line
        })
        .collect()
}

/// Half-open range of grid cells covered by terminal cell `i` of `n`.
fn block(i: usize, n: usize, extent: usize) -> (usize, usize) {
    let start = (i * extent / n).min(extent.saturating_sub(1));
    let end = ((i + 1) * extent / n).max(start + 1).min(extent);
    (start, end)
}
