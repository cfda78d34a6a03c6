use docopt::Docopt;
use log::{info, trace};
use serde_derive::Deserialize;
use maze_backtracker::{
    generators,
    grid::Grid,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    grid_traits::GridDisplay,
    pathing,
    solving::{self, SolveStep, StepCounter, StepObserver},
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc
};

const USAGE: &str = "Maze Backtracker

Usage:
    maze_driver -h | --help
    maze_driver [(--size=<n>|[--rows=<r> --columns=<c>])] [--seed=<s>] [--show-path|--show-distances|--mark-start-end] [--text-out=<path>] [--trace-steps]

Options:
    -h --help            Show this screen.
    --size=<n>           The grid size is n * n.
    --rows=<r>           The number of rows in a rows * columns grid [default: 12].
    --columns=<c>        The number of columns in a rows * columns grid [default: 12].
    --seed=<s>           Seed for the maze generator, the same seed giving the same maze. Random if not given.
    --show-path          Mark the solved route from the entrance (top left) to the exit (bottom right).
    --show-distances     Show the distance from the entrance to every cell, in hexadecimal.
    --mark-start-end     Draw an 'S' (entrance) and 'E' (exit).
    --text-out=<path>    Output file path for the textual rendering of the maze instead of stdout.
    --trace-steps        Log every forward and backward solver step. Needs MAZE_LOG=trace.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_size: Option<usize>,
    flag_rows: usize,
    flag_columns: usize,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_show_distances: bool,
    flag_mark_start_end: bool,
    flag_text_out: String,
    flag_trace_steps: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_backtracker::errors::Error, ::maze_backtracker::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

/// Counts steps for the summary and optionally logs each one.
struct DriverObserver {
    counter: StepCounter,
    trace_steps: bool,
}

impl StepObserver for DriverObserver {
    fn on_step(&mut self, step: &SolveStep) {
        self.counter.on_step(step);
        if self.trace_steps {
            trace!("{:?} {:?} to cell {}, path length {}",
                   step.kind,
                   step.direction,
                   step.cell,
                   step.path.len());
        }
    }
}

fn main() -> Result<()> {

    let log_env = env_logger::Env::new()
        .filter("MAZE_LOG")
        .write_style("MAZE_LOG_STYLE");
    env_logger::init_from_env(log_env);

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (rows, columns) = if let Some(square_grid_size) = args.flag_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_rows, args.flag_columns)
    };

    let mut maze_grid = Grid::new(rows, columns)?;

    if let Some(seed) = args.flag_seed {
        info!("generating a {}x{} maze from seed {}", rows, columns, seed);
        generators::generate(&mut maze_grid, seed);
    } else {
        info!("generating a {}x{} maze", rows, columns);
        generators::recursive_backtracker(&mut maze_grid);
    }

    let mut observer = DriverObserver {
        counter: StepCounter::default(),
        trace_steps: args.flag_trace_steps,
    };
    let path = solving::solve_with_observer(&mut maze_grid, &mut observer)
        .chain_err(|| "The generated maze has no route from entrance to exit")?;

    set_maze_griddisplay(&mut maze_grid, &args, &path)?;

    if args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    println!("path length {}, {} forward steps, {} backward steps",
             path.len(),
             observer.counter.forward,
             observer.counter.backward);

    Ok(())
}

/// Decide how the cells of the maze are displayed as text
/// - Distances from the entrance to all other cells
/// - The solved route
/// - Entrance and exit markers
/// - Nothing in the cells
fn set_maze_griddisplay(maze_grid: &mut Grid,
                        maze_args: &MazeArgs,
                        path: &[usize])
                        -> Result<()> {

    let display: Option<Rc<dyn GridDisplay>> = if maze_args.flag_show_distances {
        let distances = pathing::Distances::new(maze_grid, maze_grid.entrance())
            .ok_or("The maze entrance is not on the grid.")?;
        Some(Rc::new(distances) as Rc<dyn GridDisplay>)

    } else if maze_args.flag_show_path {
        let route = solving::path_coordinates(maze_grid, path);
        Some(Rc::new(PathDisplay::new(&route)) as Rc<dyn GridDisplay>)

    } else if maze_args.flag_mark_start_end {
        let markers = StartEndPointsDisplay::new(maze_grid.entrance(), maze_grid.exit());
        Some(Rc::new(markers) as Rc<dyn GridDisplay>)

    } else {
        None
    };

    maze_grid.set_grid_display(display);
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
