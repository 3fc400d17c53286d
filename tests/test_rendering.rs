use std::time::Duration;

use maze_drone::config::DroneConfig;
use maze_drone::simulation::{ManualInput, OccupancyGrid, SimulationState};
use maze_drone::ui::field::{compute_field_grid, CHARS};
use maze_drone::ui::render::{hud_line, overlay_drone};

fn state() -> SimulationState {
    let map = "
        ##########
        #........#
        #.######.#
        #........#
        ##########
    ";
    let grid = OccupancyGrid::from_ascii(map).unwrap();
    let mut config = DroneConfig::default();
    config.drone.start_x = 1;
    config.drone.start_y = 1;
    config.drone.velocity = 1;
    SimulationState::new(grid, &config).unwrap()
}

#[test]
fn test_field_grid_computation() {
    let state = state();
    let rows = 10;
    let cols = 20;

    let grid = compute_field_grid(&state, rows, cols);

    assert_eq!(grid.len(), rows);
    assert_eq!(grid[0].len(), cols);

    for row in grid {
        for c in row.chars() {
            assert!(CHARS.contains(&c));
        }
    }
}

#[test]
fn test_field_shows_trail_after_moving() {
    let mut state = state();
    for _ in 0..3 {
        state.tick(Duration::ZERO, ManualInput::default());
    }
    // One terminal cell per grid cell.
    let grid = compute_field_grid(&state, 5, 10);
    assert_eq!(grid[0], "          ");
    assert!(grid[1].contains('o'));
    assert_eq!(&grid[2][2..8], "      ");
}

#[test]
fn test_overlay_places_heading_glyph() {
    let state = state();
    let mut grid = compute_field_grid(&state, 5, 10);
    overlay_drone(&mut grid, &state);
    assert_eq!(grid[1].chars().nth(1), Some('^'));
}

#[test]
fn test_empty_area_renders_nothing() {
    assert!(compute_field_grid(&state(), 0, 10).is_empty());
}

#[test]
fn test_hud_mentions_phase_and_readings() {
    let mut state = state();
    state.tick(Duration::ZERO, ManualInput::default());
    let hud = hud_line(&state, Duration::from_secs(2));
    assert!(hud.starts_with("exploring"));
    assert!(hud.contains("right: "));
    assert!(hud.contains("Stack: 1"));
}
