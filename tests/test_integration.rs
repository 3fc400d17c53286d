//! End-to-end runs of the navigation core through `SimulationState`.
//!
//! Elapsed time is injected, so phase changes are driven without sleeping.

use std::collections::HashSet;
use std::time::Duration;

use maze_drone::config::DroneConfig;
use maze_drone::error::SimError;
use maze_drone::simulation::{
    Direction, ManualInput, NavPhase, OccupancyGrid, Position, Rule, SimulationState, TickOutcome,
};

const OUTWARD: Duration = Duration::ZERO;
const RETURNING: Duration = Duration::from_secs(241);

fn config_at(x: i32, y: i32, velocity: i32) -> DroneConfig {
    let mut config = DroneConfig::default();
    config.drone.start_x = x;
    config.drone.start_y = y;
    config.drone.velocity = velocity;
    config
}

fn ring(size: usize) -> OccupancyGrid {
    let rows = (0..size)
        .map(|y| {
            (0..size)
                .map(|x| x == 0 || y == 0 || x == size - 1 || y == size - 1)
                .collect()
        })
        .collect();
    OccupancyGrid::new(rows).unwrap()
}

#[test]
fn test_ring_circuit_visits_every_cell_once() {
    let grid = ring(10);
    let ring_cells: HashSet<Position> = grid.traversable_cells().collect();
    let mut state = SimulationState::new(grid, &config_at(0, 0, 1)).unwrap();

    for _ in 0..ring_cells.len() {
        let outcome = state.tick(OUTWARD, ManualInput::default());
        assert!(matches!(outcome, TickOutcome::Explored { moved: true, .. }));
    }

    assert_eq!(state.drone().position, Position::new(0, 0));

    let visited: Vec<Position> = state.drone().trail.visited().collect();
    let distinct: HashSet<Position> = visited.iter().copied().collect();
    assert_eq!(visited.len(), ring_cells.len());
    assert_eq!(distinct, ring_cells);

    // Back in the corner with only left armed: the forced up move is rejected.
    assert_eq!(
        state.tick(OUTWARD, ManualInput::default()),
        TickOutcome::Explored {
            rule: Rule::DeadEnd,
            direction: Direction::Up,
            moved: false
        }
    );
    assert_eq!(state.policy().steps().len(), ring_cells.len());
}

#[test]
fn test_return_journey_reverses_outward_moves() {
    let map = "
        .#####
        .#####
        ......
    ";
    let grid = OccupancyGrid::from_ascii(map).unwrap();
    let mut state = SimulationState::new(grid, &config_at(0, 0, 1)).unwrap();

    let mut outward = vec![state.drone().position];
    for _ in 0..5 {
        state.tick(OUTWARD, ManualInput::default());
        outward.push(state.drone().position);
    }
    assert_eq!(state.drone().position, Position::new(3, 2));
    assert_eq!(
        state.policy().steps().as_slice(),
        &[
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Left
        ]
    );

    let mut homeward = Vec::new();
    for _ in 0..5 {
        let trail_before = state.drone().trail.len();
        let outcome = state.tick(RETURNING, ManualInput::default());
        assert!(matches!(outcome, TickOutcome::Retraced { moved: true, .. }));
        assert_eq!(state.drone().trail.len(), trail_before + 1);
        homeward.push(state.drone().position);
    }

    outward.pop();
    outward.reverse();
    assert_eq!(homeward, outward);
    assert_eq!(state.phase(), NavPhase::Finished);
    assert!(state.policy().steps().is_empty());

    let resting = state.drone().position;
    assert_eq!(
        state.tick(RETURNING, ManualInput::default()),
        TickOutcome::Finished
    );
    assert_eq!(state.drone().position, resting);
    assert_eq!(state.ticks(), 10);
}

#[test]
fn test_single_cell_grid_never_moves() {
    let grid = OccupancyGrid::from_ascii(".").unwrap();
    let mut state = SimulationState::new(grid, &DroneConfig::default()).unwrap();
    assert_eq!(state.drone().position, Position::new(0, 0));

    for _ in 0..50 {
        let outcome = state.tick(OUTWARD, ManualInput::default());
        assert_eq!(
            outcome,
            TickOutcome::Explored {
                rule: Rule::DeadEnd,
                direction: Direction::Up,
                moved: false
            }
        );
    }
    assert_eq!(state.drone().position, Position::new(0, 0));
    assert!(state.drone().trail.is_empty());
}

#[test]
fn test_exploration_is_deterministic() {
    let map = "
        ##########
        #....#...#
        #.##.#.#.#
        #.#..#.#.#
        #.#.##.#.#
        #...#....#
        ##########
    ";

    let run = || {
        let grid = OccupancyGrid::from_ascii(map).unwrap();
        let mut state = SimulationState::new(grid, &config_at(1, 1, 1)).unwrap();
        let mut log = Vec::new();
        for _ in 0..200 {
            let outcome = state.tick(OUTWARD, ManualInput::default());
            log.push((outcome, state.drone().position, state.drone().trail.len()));
        }
        log
    };

    assert_eq!(run(), run());
}

#[test]
fn test_start_snaps_to_nearest_track() {
    let grid = ring(10);
    let state = SimulationState::new(grid, &config_at(4, 5, 1)).unwrap();
    // (4,5) sits in the hollow middle; (0,5) and (4,9) are both 4 away and
    // row-major order picks (0,5).
    assert_eq!(state.drone().position, Position::new(0, 5));
    assert_eq!(state.policy().start(), Position::new(0, 5));
}

#[test]
fn test_solid_grid_cannot_host_drone() {
    let grid = OccupancyGrid::from_ascii("###\n###").unwrap();
    let err = SimulationState::new(grid, &DroneConfig::default()).unwrap_err();
    assert!(matches!(err, SimError::NoTraversableCell));
}

#[test]
fn test_exploring_covers_corridor() {
    let grid = OccupancyGrid::from_ascii(&".".repeat(20)).unwrap();
    let mut state = SimulationState::new(grid, &config_at(0, 0, 2)).unwrap();
    state.tick(OUTWARD, ManualInput::default());
    // One step paints the whole corridor through the sensor footprint.
    assert!((state.coverage() - 1.0).abs() < 1e-9);
}

#[test]
fn test_huge_stride_is_rejected_not_overflowed() {
    let grid = OccupancyGrid::from_ascii("...").unwrap();
    let mut config = config_at(1, 0, i32::MAX);
    config.drone.return_velocity = i32::MAX;
    let mut state = SimulationState::new(grid, &config).unwrap();

    let outcome = state.tick(OUTWARD, ManualInput::default());
    assert!(matches!(outcome, TickOutcome::Explored { moved: false, .. }));
    assert_eq!(state.drone().position, Position::new(1, 0));
    assert_eq!(state.drone().last_reading.as_array(), [1, 1, 1, 1]);

    // Already on the start cell, so the return phase finishes at once.
    assert_eq!(
        state.tick(RETURNING, ManualInput::default()),
        TickOutcome::Finished
    );
    assert_eq!(state.drone().position, Position::new(1, 0));
}

#[test]
fn test_run_cap_tick_is_not_counted() {
    let grid = OccupancyGrid::from_ascii(&".".repeat(10)).unwrap();
    let mut state = SimulationState::new(grid, &config_at(0, 0, 1)).unwrap();

    state.tick(OUTWARD, ManualInput::default());
    state.tick(OUTWARD, ManualInput::default());
    assert_eq!(state.ticks(), 2);

    assert_eq!(
        state.tick(Duration::from_secs(481), ManualInput::default()),
        TickOutcome::Finished
    );
    assert!(state.is_finished());
    assert_eq!(state.ticks(), 2);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("maze_drone_test_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[drone]\nstart_x = 3\nstart_y = 4\nfacing = \"right\"\n\n[mission]\noutward_minutes = 1.5\n",
    )
    .unwrap();

    let config = DroneConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!((config.drone.start_x, config.drone.start_y), (3, 4));
    assert_eq!(config.drone.facing, Direction::Right);
    assert_eq!(config.nav_settings().unwrap().outward, Duration::from_secs(90));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let err = DroneConfig::load(std::path::Path::new("no/such/drone.toml")).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}
