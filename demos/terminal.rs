//! Terminal A* visualization demo.
//!
//! Prompts for a grid size and obstacle probability, generates a random
//! occupancy grid, then animates the search: visited cells, the current
//! best partial path, and finally the shortest path (or a failure notice).
//!
//! Run: cargo run --bin terminal

use std::collections::HashSet;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::execute;
use rand::RngExt;

use gridway_core::{Cell, Grid};
use gridway_search::{PathResult, ProgressEvent, SearchOptions, find_path_with};

const FRAME_DELAY: Duration = Duration::from_millis(30);
/// Redraw every N expansions so large grids stay responsive.
const FRAMES_EVERY: usize = 5;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let size: i32 = prompt("Enter grid size (default 25): ", 25)?.max(2);
    let density: f64 = prompt("Enter obstacle probability (0 to 1, default 0.25): ", 0.25)?;
    let density = density.clamp(0.0, 1.0);

    let start = Cell::new(0, 0);
    let goal = Cell::new(size - 1, size - 1);
    let grid = random_grid(size, density, start, goal);

    let mut stdout = io::stdout();
    let result = find_path_with(
        &grid,
        start,
        goal,
        SearchOptions::new().progress_every(FRAMES_EVERY),
        |event| {
            let (visited, path) = match event {
                ProgressEvent::Expanded {
                    visited,
                    partial_path,
                    ..
                } => (*visited, *partial_path),
                ProgressEvent::Finished { visited, path } => (*visited, path.unwrap_or(&[])),
            };
            if draw(&mut stdout, &grid, start, goal, visited, path).is_ok() {
                std::thread::sleep(FRAME_DELAY);
            }
        },
    )?;

    match result {
        PathResult::Found(path) => {
            println!("Shortest path: {} steps", path.len() - 1);
            log::info!("path: {path:?}");
        }
        PathResult::NotFound => println!("No path found!"),
    }
    Ok(())
}

/// Read a line from stdin, falling back to `default` on empty or
/// unparsable input.
fn prompt<T: std::str::FromStr>(label: &str, default: T) -> io::Result<T> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().parse().unwrap_or(default))
}

/// Generate a `size x size` grid where each cell is blocked with
/// probability `density`. The endpoints are always forced free.
fn random_grid(size: i32, density: f64, start: Cell, goal: Cell) -> Grid {
    let mut rng = rand::rng();
    let mut grid = Grid::new(size, size);
    for idx in 0..grid.len() {
        let cell = grid.cell_at(idx);
        grid.set_blocked(cell, rng.random::<f64>() < density);
    }
    grid.set_blocked(start, false);
    grid.set_blocked(goal, false);
    grid
}

fn draw(
    stdout: &mut io::Stdout,
    grid: &Grid,
    start: Cell,
    goal: Cell,
    visited: &[Cell],
    path: &[Cell],
) -> io::Result<()> {
    let visited: HashSet<Cell> = visited.iter().copied().collect();
    let path: HashSet<Cell> = path.iter().copied().collect();

    execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = Cell::new(row, col);
            let (ch, color) = if cell == start {
                ('S', Color::Magenta)
            } else if cell == goal {
                ('G', Color::Yellow)
            } else if path.contains(&cell) {
                ('*', Color::Blue)
            } else if visited.contains(&cell) {
                ('o', Color::DarkYellow)
            } else if grid.is_blocked(cell) == Some(true) {
                ('#', Color::White)
            } else {
                ('.', Color::DarkGrey)
            };
            execute!(stdout, SetForegroundColor(color), Print(ch), Print(' '))?;
        }
        execute!(stdout, Print('\n'))?;
    }
    execute!(stdout, ResetColor)?;
    stdout.flush()
}
