use docopt::Docopt;
use glam::Vec3;
use log::{info, warn};
use maze_halls::{
    cells::CellCoordinate,
    config::{GeneratorKind, MazeSpec},
    generators::{FixedLayout, GridGenerator},
    grid::OccupancyGrid,
    grid_displays::{DebugOverlay, PathDisplay, StartGoalDisplay},
    host::{BodyHandle, HeadlessHost, TriggerCallback, ZoneHandle},
    layout_images, obj_export, pathing,
    session::{BuildReport, MazeSession},
    units::{ColumnsCount, RowsCount},
};
use serde_derive::Deserialize;
use std::{cell::Cell, rc::Rc};

const USAGE: &str = "Maze halls

Usage:
    maze_driver -h | --help
    maze_driver [--spec=<path>] [--rows=<r>] [--cols=<c>] [--seed=<n>] [--generator=<name>] [--layout-image=<path>] [--show-grid] [--show-path] [--obj-out=<path>] [--image-out=<path>] [--cell-pixels=<n>] [--walkthrough=<n>]

Options:
    -h --help              Show this screen.
    --spec=<path>          RON file with the maze settings. Flags below override it.
    --rows=<r>             Number of grid rows, odd numbers work best. 13 unless set by the --spec file.
    --cols=<c>             Number of grid columns, odd numbers work best. 15 unless set by the --spec file.
    --seed=<n>             Seed for the maze generator. Runs with the same seed build the same mazes.
    --generator=<name>     backtracker or prim.
    --layout-image=<path>  Image of an authored maze, one pixel per cell, dark pixels are blocked. Replaces the generator.
    --show-grid            Print the maze grid as text with the start (S) and goal (G) marked.
    --show-path            With --show-grid, mark the shortest walk from the start to the goal instead.
    --obj-out=<path>       Write the maze mesh as a Wavefront OBJ file.
    --image-out=<path>     Write the maze grid as a PNG image.
    --cell-pixels=<n>      Pixel size of one grid cell in the PNG image [default: 10].
    --walkthrough=<n>      Play n rounds: walk to the goal, pick up the treasure, walk back to the start, build the next maze.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_spec: String,
    flag_rows: Option<usize>,
    flag_cols: Option<usize>,
    flag_seed: Option<u64>,
    flag_generator: String,
    flag_layout_image: String,
    flag_show_grid: bool,
    flag_show_path: bool,
    flag_obj_out: String,
    flag_image_out: String,
    flag_cell_pixels: u32,
    flag_walkthrough: Option<usize>,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_halls::errors::Error, ::maze_halls::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

type Session = MazeSession<Box<dyn GridGenerator>, HeadlessHost>;

/// The body the walkthrough moves around the halls.
const PLAYER: BodyHandle = BodyHandle(1);

/// Height of the player's centre above the floor.
const PLAYER_LIFT: f32 = 0.5;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let spec = maze_spec_from_args(&args)?;

    let (generator, rows, columns) = if !args.flag_layout_image.is_empty() {
        let layout = layout_images::load_layout(&args.flag_layout_image)?;
        let (rows, columns) = (layout.rows(), layout.columns());
        let generator: Box<dyn GridGenerator> = Box::new(FixedLayout::new(layout)?);
        (generator, rows, columns)
    } else {
        (spec.generator(), spec.rows_count(), spec.columns_count())
    };

    let mut session: Session = MazeSession::new(generator, spec.synthesizer(), HeadlessHost::new());

    match args.flag_walkthrough {
        Some(rounds) => walkthrough(&mut session, rows, columns, rounds)?,
        None => {
            session.new_maze(rows, columns, None, None)?;
        }
    }

    let grid = session.grid().ok_or("no maze was built")?;
    if args.flag_show_grid {
        print_grid(grid, &args)?;
    }

    if !args.flag_image_out.is_empty() {
        layout_images::save_layout_image(grid, args.flag_cell_pixels, &args.flag_image_out)?;
        info!("saved grid image {}", args.flag_image_out);
    }

    if !args.flag_obj_out.is_empty() {
        let mesh = session.mesh().ok_or("no maze was built")?;
        obj_export::write_obj_file(mesh, &args.flag_obj_out)?;
        info!("saved maze mesh {}", args.flag_obj_out);
    }

    Ok(())
}

/// Settings come from the --spec file if given, else the defaults, with command line flags on top.
fn maze_spec_from_args(args: &MazeArgs) -> Result<MazeSpec> {
    let mut spec = if args.flag_spec.is_empty() {
        MazeSpec::default()
    } else {
        MazeSpec::load(&args.flag_spec)?
    };

    if let Some(rows) = args.flag_rows {
        spec.rows = rows;
    }
    if let Some(columns) = args.flag_cols {
        spec.columns = columns;
    }
    if args.flag_seed.is_some() {
        spec.seed = args.flag_seed;
    }
    if !args.flag_generator.is_empty() {
        spec.generator = GeneratorKind::from_name(&args.flag_generator)
            .ok_or_else(|| format!("unknown generator '{}'", args.flag_generator))?;
    }

    Ok(spec)
}

fn print_grid(grid: &OccupancyGrid, args: &MazeArgs) -> Result<()> {
    let start_goal = maze_halls::locator::locate(grid)?;

    if args.flag_show_path {
        let path = walk_between(grid, start_goal.start, start_goal.goal)?;
        let display = PathDisplay::new(&path);
        println!("{}", DebugOverlay::with_display(grid, &display));
    } else {
        let display = StartGoalDisplay::new(start_goal.start, start_goal.goal);
        println!("{}", DebugOverlay::with_display(grid, &display));
    }

    Ok(())
}

fn walk_between(grid: &OccupancyGrid,
                from: CellCoordinate,
                to: CellCoordinate)
                -> Result<Vec<CellCoordinate>> {
    let distances = pathing::Distances::new(grid, from).ok_or("walk starts on a blocked cell")?;
    Ok(pathing::shortest_path(grid, &distances, to).ok_or("no walk between start and goal")?)
}

/// State shared between the trigger callbacks and the walkthrough loop.
#[derive(Debug, Default)]
struct RoundState {
    goal_reached: Cell<bool>,
    finished: Cell<bool>,
    treasure_collected: Cell<Option<ZoneHandle>>,
    score: Cell<u32>,
}

fn walkthrough(session: &mut Session,
               rows: RowsCount,
               columns: ColumnsCount,
               rounds: usize)
               -> Result<()> {
    let state = Rc::new(RoundState::default());

    for round in 1..=rounds {
        let report = play_round(session, &state, rows, columns)?;
        info!("round {}: {}", round, report);

        if state.finished.get() {
            info!("round {} finished, score {}", round, state.score.get());
        } else {
            warn!("round {} ended without returning to the start", round);
        }
    }

    Ok(())
}

/// Builds a maze, then walks the player to the goal and back to the start.
fn play_round(session: &mut Session,
              state: &Rc<RoundState>,
              rows: RowsCount,
              columns: ColumnsCount)
              -> Result<BuildReport> {
    state.goal_reached.set(false);
    state.finished.set(false);

    let report = session.new_maze(rows, columns, Some(on_start(state)), Some(on_goal(state)))?;

    let start = report.start_goal.start;
    let goal = report.start_goal.goal;
    let grid = session.grid().ok_or("no maze was built")?.clone();
    let mut route = walk_between(&grid, start, goal)?;
    let back: Vec<_> = route.iter().rev().skip(1).cloned().collect();
    route.extend(back);

    let mut inside: Vec<ZoneHandle> = Vec::new();
    for cell in route {
        let position = session.cell_to_world(cell) + Vec3::Y * PLAYER_LIFT;
        let now_inside = session.host().zones_at(position);

        // on a single cell maze the player stands in both zones and reaches the goal first
        let goal_zone = session.goal_zone();
        let mut entered: Vec<ZoneHandle> =
            now_inside.iter().filter(|zone| !inside.contains(zone)).cloned().collect();
        entered.sort_by_key(|zone| Some(*zone) != goal_zone);
        for zone in entered {
            session.notify_enter(zone, PLAYER);
        }
        inside = now_inside;

        // picking up the treasure removes the goal zone
        if let Some(zone) = state.treasure_collected.take() {
            session.destroy_zone(zone);
            inside.retain(|live| *live != zone);
        }

        if state.finished.get() {
            break;
        }
    }

    Ok(report)
}

fn on_goal(state: &Rc<RoundState>) -> TriggerCallback {
    let state = Rc::clone(state);
    Box::new(move |zone, _| {
        info!("goal!");
        state.goal_reached.set(true);
        state.score.set(state.score.get() + 1);
        state.treasure_collected.set(Some(zone));
    })
}

fn on_start(state: &Rc<RoundState>) -> TriggerCallback {
    let state = Rc::clone(state);
    Box::new(move |_, _| {
        if state.goal_reached.get() {
            info!("finish!");
            state.finished.set(true);
        }
    })
}
