use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::SimulationState;

/// Maps a grid cell to the terminal cell that displays it.
#[must_use]
pub fn world_to_grid_coords(
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    rows: usize,
    cols: usize,
) -> (usize, usize) {
    let x = usize::try_from(x).unwrap_or(0).min(width.saturating_sub(1));
    let y = usize::try_from(y).unwrap_or(0).min(height.saturating_sub(1));
    let r = y * rows / height.max(1);
    let c = x * cols / width.max(1);
    (r, c)
}

/// Overlays the drone's heading glyph on a computed field.
pub fn overlay_drone(grid_lines: &mut [String], state: &SimulationState) {
    let rows = grid_lines.len();
    let cols = grid_lines.first().map_or(0, |l| l.chars().count());
    if rows == 0 || cols == 0 {
        return;
    }

    let drone = state.drone();
    let grid = state.grid();
    let (r, c) = world_to_grid_coords(
        drone.position.x,
        drone.position.y,
        grid.width(),
        grid.height(),
        rows,
        cols,
    );

    if let Some(line) = grid_lines.get_mut(r) {
        // Field lines are ASCII, so byte and char offsets agree.
        if c < line.len() {
            let mut glyph = [0u8; 4];
            line.replace_range(c..=c, drone.facing.glyph().encode_utf8(&mut glyph));
        }
    }
}

/// One-line status: phase, readings, stack depth, trail and coverage.
#[must_use]
pub fn hud_line(state: &SimulationState, elapsed: Duration) -> String {
    let drone = state.drone();
    format!(
        "{} | {} | Stack: {} | Trail: {} | Cov: {:.1}% | Pos: ({}, {}) | T: {:.1}s",
        state.phase().label(),
        drone.last_reading,
        state.policy().steps().len(),
        drone.trail.len(),
        state.coverage() * 100.0,
        drone.position.x,
        drone.position.y,
        elapsed.as_secs_f64(),
    )
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| {
            let spans: Vec<Span> = s.chars().map(styled_cell).collect();
            Line::from(spans)
        })
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, chunks[1]);
}

fn styled_cell(c: char) -> Span<'static> {
    let color = match c {
        '.' => Color::DarkGray,
        ':' | 'o' => Color::Yellow,
        '^' | 'v' | '<' | '>' => Color::Red,
        _ => Color::Black,
    };
    Span::styled(c.to_string(), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_grid_corners() {
        assert_eq!(world_to_grid_coords(0, 0, 100, 50, 10, 20), (0, 0));
        assert_eq!(world_to_grid_coords(99, 49, 100, 50, 10, 20), (9, 19));
        // Off-grid coordinates clamp to the edge.
        assert_eq!(world_to_grid_coords(-5, 500, 100, 50, 10, 20), (9, 0));
    }
}
