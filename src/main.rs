#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use maze_drone::config::DroneConfig;
use maze_drone::simulation::loader::load_grid;
use maze_drone::simulation::{Direction, ManualInput, SimulationState};
use maze_drone::ui::{
    field::compute_field_grid,
    render::{draw_ui, hud_line, overlay_drone},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    let log_file = File::create(&config.logging.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("maze_drone=info".parse()?),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    // Fail before touching the terminal if the maze is unusable
    let grid = load_grid(&config.map.image_path, config.map.threshold)?;
    let mut state = SimulationState::new(grid, &config)?;

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut state, &config);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match res {
        Ok(elapsed) => {
            info!(
                ticks = state.ticks(),
                trail = state.drone().trail.len(),
                coverage = state.coverage(),
                ?elapsed,
                "run ended"
            );
            println!(
                "{} after {:.1}s: {} ticks, {:.1}% explored",
                state.phase().label(),
                elapsed.as_secs_f64(),
                state.ticks(),
                state.coverage() * 100.0
            );
        }
        Err(err) => println!("{err:?}"),
    }

    Ok(())
}

/// `argv[1]` if given, else `drone.toml` if present, else defaults.
/// `--map <path>` overrides the maze image.
fn load_config() -> maze_drone::error::Result<DroneConfig> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        DroneConfig::load(Path::new(&args[1]))?
    } else if Path::new("drone.toml").exists() {
        DroneConfig::load(Path::new("drone.toml"))?
    } else {
        DroneConfig::default()
    };

    if let Some(map) = args
        .iter()
        .position(|a| a == "--map")
        .and_then(|i| args.get(i + 1))
    {
        config.map.image_path = PathBuf::from(map);
    }

    Ok(config)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut SimulationState,
    config: &DroneConfig,
) -> io::Result<Duration> {
    let tick_rate = config.tick_interval();
    let frame_rate = config.frame_interval();
    let run_start = Instant::now();
    let mut last_tick = Instant::now();
    let mut last_frame: Option<Instant> = None;
    let mut manual = ManualInput::default();

    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            state.tick(run_start.elapsed(), std::mem::take(&mut manual));
            last_tick = Instant::now();
            if state.is_finished() {
                return Ok(run_start.elapsed());
            }
        }

        // 2. Render
        if last_frame.map_or(true, |t| t.elapsed() >= frame_rate) {
            let elapsed = run_start.elapsed();
            let view: &SimulationState = state;
            terminal.draw(|f| {
                let area = f.area();
                let rows = (area.height as usize).saturating_sub(1); // -1 for HUD
                let cols = area.width as usize;

                let mut grid = compute_field_grid(view, rows, cols);
                overlay_drone(&mut grid, view);

                draw_ui(f, grid, &hud_line(view, elapsed));
            })?;
            last_frame = Some(Instant::now());
        }

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(run_start.elapsed()),
                    KeyCode::Left => manual.press(Direction::Left),
                    KeyCode::Right => manual.press(Direction::Right),
                    KeyCode::Up => manual.press(Direction::Up),
                    KeyCode::Down => manual.press(Direction::Down),
                    _ => {}
                }
            }
        }
    }
}
