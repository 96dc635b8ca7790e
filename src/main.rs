use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use log::info;
use maze_game::config::Config;
use maze_game::{ControlScheme, Dimensions, Direction, MazeError, Pos, Result, Rgb, Session};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const HUD_ROWS: usize = 1;
const WALL_COLOR: Color = Color::Blue;
const GOAL_COLOR: Color = Color::Rgb {
    r: 0x00,
    g: 0xff,
    b: 0xaa,
};
const FORK_COLOR: Color = Color::Rgb {
    r: 0xff,
    g: 0xaa,
    b: 0xaa,
};

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Corridor,
    Fork,
    Goal,
    Player,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    show_forks: bool,
    /// Fork cells of the current maze, refreshed on every full redraw.
    forks: HashSet<Pos>,
}

impl Renderer {
    fn new(show_forks: bool) -> Self {
        Self {
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            show_forks,
            forks: HashSet::new(),
        }
    }
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// The screen belongs to the maze, so logs only go to a file unless
/// RUST_LOG asks for them.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder
        .try_init()
        .map_err(|e| MazeError::Logger(e.to_string()))
}

fn run(stdout: &mut Stdout, config: &Config) -> Result<()> {
    let seed = config.seed_or_random();
    info!("seed {seed}, target {} cells", config.cells);

    let (term_w, term_h) = terminal::size()?;
    let mut session = Session::new(seed, maze_dimensions(config.cells, term_w, term_h)?);
    let mut renderer = Renderer::new(config.show_forks);
    let tick_interval = config.tick_interval();
    let frame_time = config.frame_time();
    let mut last_tick = Instant::now();
    let mut dirty: Vec<Pos> = Vec::new();
    let mut latest_arrival: Option<ControlScheme> = None;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if is_quit(&key) {
                        return Ok(());
                    }
                    if let Some((scheme, dir)) = key_binding(key.code) {
                        if session.player(scheme).is_none() {
                            dirty.push(session.maze().start());
                        }
                        session.press(scheme, dir);
                    }
                }
                Event::Resize(w, h) => {
                    session.regenerate(maze_dimensions(config.cells, w, h)?);
                    latest_arrival = None;
                    renderer.needs_full = true;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_interval {
            last_tick = Instant::now();
            let report = session.tick();
            dirty.extend(report.dirty);
            if let Some(scheme) = report.arrivals.last() {
                latest_arrival = Some(*scheme);
            }
        }
        render(stdout, &session, &mut renderer, &dirty, latest_arrival)?;
        dirty.clear();

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn key_binding(code: KeyCode) -> Option<(ControlScheme, Direction)> {
    let binding = match code {
        KeyCode::Up => (ControlScheme::Arrows, Direction::North),
        KeyCode::Right => (ControlScheme::Arrows, Direction::East),
        KeyCode::Down => (ControlScheme::Arrows, Direction::South),
        KeyCode::Left => (ControlScheme::Arrows, Direction::West),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => (ControlScheme::Wasd, Direction::North),
            'd' => (ControlScheme::Wasd, Direction::East),
            's' => (ControlScheme::Wasd, Direction::South),
            'a' => (ControlScheme::Wasd, Direction::West),
            'i' => (ControlScheme::Ijkl, Direction::North),
            'l' => (ControlScheme::Ijkl, Direction::East),
            'k' => (ControlScheme::Ijkl, Direction::South),
            'j' => (ControlScheme::Ijkl, Direction::West),
            _ => return None,
        },
        _ => return None,
    };
    Some(binding)
}

/// Largest maze, in cells, whose wall lattice fits below the HUD.
fn max_cells(term_w: u16, term_h: u16) -> (usize, usize) {
    let lattice_w = term_w as usize / CELL_W;
    let lattice_h = (term_h as usize).saturating_sub(HUD_ROWS);
    (lattice_w.saturating_sub(1) / 2, lattice_h.saturating_sub(1) / 2)
}

fn maze_dimensions(target_cells: usize, term_w: u16, term_h: u16) -> Result<Dimensions> {
    let (max_w, max_h) = max_cells(term_w, term_h);
    let aspect = max_w.max(1) as f64 / max_h.max(1) as f64;
    let budget = target_cells.min(max_w * max_h);
    Ok(Dimensions::fit(aspect, budget)?.clamp_to(max_w, max_h))
}

fn render(
    stdout: &mut Stdout,
    session: &Session,
    renderer: &mut Renderer,
    dirty: &[Pos],
    latest_arrival: Option<ControlScheme>,
) -> Result<()> {
    let maze = session.maze();
    let (lattice_w, lattice_h) = maze.grid().lattice_size();
    let needed_w = (lattice_w * CELL_W) as u16;
    let needed_h = (lattice_h + HUD_ROWS) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + HUD_ROWS as u16;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
        renderer.forks.clear();
        if renderer.show_forks {
            renderer.forks.extend(maze.topology().forks());
        }
    }

    let hud = hud_line(session, latest_arrival);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    if renderer.needs_full {
        for gy in 0..lattice_h {
            for gx in 0..lattice_w {
                let cell = cell_for(session, &renderer.forks, gx, gy);
                draw_cell(stdout, renderer, gx, gy, cell)?;
            }
        }
    } else {
        for pos in dirty {
            let (gx, gy) = (pos.x * 2 + 1, pos.y * 2 + 1);
            let cell = cell_for(session, &renderer.forks, gx, gy);
            draw_cell(stdout, renderer, gx, gy, cell)?;
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn hud_line(session: &Session, latest_arrival: Option<ControlScheme>) -> String {
    let maze = session.maze();
    let winners: Vec<&str> = session.winners().into_iter().map(|s| s.name()).collect();
    let status = if winners.is_empty() {
        format!("Tokens: {}", session.players().count())
    } else if let Some(scheme) = latest_arrival {
        format!("Goal reached by: {} (last: {})", winners.join(", "), scheme.name())
    } else {
        format!("Goal reached by: {}", winners.join(", "))
    };
    format!(
        "Maze {}x{}  Seed: {}  {}  (q to quit)",
        maze.width(),
        maze.height(),
        session.seed(),
        status
    )
}

/// What lattice block `(gx, gy)` shows. Tokens cover the goal, the goal
/// covers the fork marker, and later tokens cover earlier ones.
fn cell_for(session: &Session, forks: &HashSet<Pos>, gx: usize, gy: usize) -> Cell {
    let maze = session.maze();
    if maze.grid().is_wall(gx, gy) {
        return Cell {
            glyph: Glyph::Wall,
            color: WALL_COLOR,
        };
    }
    if gx % 2 == 1 && gy % 2 == 1 {
        let pos = Pos::new(gx / 2, gy / 2);
        let top = session
            .players()
            .filter(|(_, player)| player.position() == pos)
            .last();
        if let Some((_, player)) = top {
            return Cell {
                glyph: Glyph::Player,
                color: to_color(player.color()),
            };
        }
        if pos == maze.goal() {
            return Cell {
                glyph: Glyph::Goal,
                color: GOAL_COLOR,
            };
        }
        if forks.contains(&pos) {
            return Cell {
                glyph: Glyph::Fork,
                color: FORK_COLOR,
            };
        }
    }
    Cell {
        glyph: Glyph::Corridor,
        color: Color::Reset,
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    gx: usize,
    gy: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Wall => "██",
        Glyph::Corridor => "  ",
        Glyph::Fork => "· ",
        Glyph::Goal => "██",
        Glyph::Player => "● ",
    };
    let x_pos = renderer.origin_x + (gx * CELL_W) as u16;
    let y_pos = renderer.origin_y + gy as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
