//! # Neon Slide CLI
//!
//! Command-line interface for playing the sliding-tile puzzle interactively
//! or generating scrambles headlessly and reporting their statistics.

mod store;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neon_slide_core::{
    format_elapsed, shuffle, walk_length, Difficulty, Direction, GridSize, Preferences,
    PuzzleConfig, ScoreBook, Session, TileMode,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::store::FileStore;

#[derive(Parser, Debug)]
#[command(name = "neon-slide")]
#[command(author, version, about = "Play the sliding-tile puzzle in the terminal or run scramble statistics")]
struct Args {
    /// Grid side length (2-16)
    #[arg(short = 'n', long, default_value = "4", value_parser = parse_grid_size)]
    size: GridSize,

    /// Tile labels
    #[arg(short, long, value_enum, default_value = "numbers")]
    mode: ModeArg,

    /// Scramble length
    #[arg(short, long, value_enum, default_value = "medium")]
    difficulty: DifficultyArg,

    /// Random seed for deterministic runs (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for best scores and preferences
    #[arg(long, default_value = ".neon-slide")]
    data_dir: PathBuf,

    /// Start with sound cues off
    #[arg(long)]
    no_sound: bool,

    /// Number of scrambles to generate in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Debug logging on stderr, and per-scramble output in headless mode
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// 1, 2, 3, ...
    Numbers,
    /// A, B, C, ...
    Letters,
    /// Small arithmetic expressions
    Math,
}

impl From<ModeArg> for TileMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Numbers => TileMode::Numbers,
            ModeArg::Letters => TileMode::Letters,
            ModeArg::Math => TileMode::Math,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn parse_grid_size(value: &str) -> Result<GridSize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    GridSize::new(size).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = PuzzleConfig::new(args.size, args.mode.into(), args.difficulty.into());
    debug!(?config, seed, "starting");

    if let Some(episodes) = args.episodes {
        run_headless(&args, config, seed, episodes)
    } else {
        run_interactive(&args, config, seed)
    }
}

// =============================================================================
// Interactive mode
// =============================================================================

/// Terminal bell cues. Constructed once and handed to the game loop.
struct Chime {
    enabled: bool,
}

impl Chime {
    fn new(enabled: bool) -> Self {
        Chime { enabled }
    }

    fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    fn slide(&self) {
        self.ring(1);
    }

    fn win(&self) {
        self.ring(3);
    }

    fn ring(&self, times: usize) {
        if self.enabled {
            print!("{}", "\x07".repeat(times));
        }
    }
}

/// Feeds whole elapsed seconds into the session while it is active.
struct Clock {
    last: Instant,
}

impl Clock {
    fn new() -> Self {
        Clock {
            last: Instant::now(),
        }
    }

    fn sync(&mut self, session: &mut Session) {
        let whole = self.last.elapsed().as_secs();
        if session.is_active() {
            session.advance(whole);
        }
        self.last += Duration::from_secs(whole);
    }
}

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args, config: PuzzleConfig, seed: u64) -> Result<()> {
    let mut store = FileStore::open(&args.data_dir)?;
    let mut scores = ScoreBook::load(&store);
    let mut prefs = Preferences::load(&store);
    if args.no_sound {
        prefs.sound = false;
    }

    let mut session = Session::new(config, seed).context("failed to shuffle a new puzzle")?;
    let mut chime = Chime::new(prefs.sound);

    let raw_mode = RawMode::enable();
    play(
        &mut io::stdin(),
        &mut session,
        &mut scores,
        &mut prefs,
        &mut store,
        &mut chime,
    )?;

    drop(raw_mode);
    println!("\nGoodbye!");
    Ok(())
}

/// Read keys from `input` and drive the session until quit or end of input.
fn play<R: Read>(
    input: &mut R,
    session: &mut Session,
    scores: &mut ScoreBook,
    prefs: &mut Preferences,
    store: &mut FileStore,
    chime: &mut Chime,
) -> Result<()> {
    let mut clock = Clock::new();
    let mut cursor = 0usize;
    let mut status = String::new();
    let mut buffer = [0u8; 3];

    redraw(session, scores, cursor, &status)?;

    loop {
        let bytes_read = match input.read(&mut buffer) {
            Ok(0) => {
                debug!("input closed");
                break;
            }
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("failed to read input"),
        };
        clock.sync(session);
        status.clear();

        let result = match parse_input(&buffer[..bytes_read]) {
            InputAction::Slide(direction) => Some(session.slide_direction(direction)),
            InputAction::Cursor(direction) => {
                if let Some(next) =
                    neon_slide_core::grid::neighbor_toward(cursor, direction, session.config().size)
                {
                    cursor = next;
                }
                None
            }
            InputAction::SlideAtCursor => Some(session.slide(cursor)),
            InputAction::Undo => {
                if session.undo() {
                    chime.slide();
                }
                None
            }
            InputAction::Restart => {
                match session.restart() {
                    Ok(()) => clock = Clock::new(),
                    Err(err) => status = format!("Could not restart: {err}"),
                }
                None
            }
            InputAction::CycleMode => {
                let mut next = *session.config();
                next.mode = match next.mode {
                    TileMode::Numbers => TileMode::Letters,
                    TileMode::Letters => TileMode::Math,
                    TileMode::Math => TileMode::Numbers,
                };
                match session.reconfigure(next) {
                    Ok(()) => clock = Clock::new(),
                    Err(err) => status = format!("Could not switch mode: {err}"),
                }
                None
            }
            InputAction::ToggleSound => {
                prefs.sound = chime.toggle();
                if let Err(err) = prefs.save(store) {
                    warn!(error = %err, "failed to save preferences");
                }
                status = format!("Sound {}", if prefs.sound { "ON" } else { "OFF" });
                None
            }
            InputAction::Quit => break,
            InputAction::None => None,
        };

        if let Some(result) = result {
            if result.changed {
                chime.slide();
            }
            if result.changed && result.solved {
                chime.win();
                status = record_win(session, scores, prefs, store);
            }
        }

        redraw(session, scores, cursor, &status)?;
    }

    Ok(())
}

/// Save the result of a solved puzzle and describe it for the status line.
fn record_win(
    session: &Session,
    scores: &mut ScoreBook,
    prefs: &mut Preferences,
    store: &mut FileStore,
) -> String {
    let key = session.score_key();
    let mut lines = vec![format!(
        "*** SOLVED in {} moves, {} ***",
        session.moves(),
        format_elapsed(session.elapsed())
    )];

    if scores.record(&key, session.moves()) {
        lines.push("NEW RECORD!".to_string());
        if let Err(err) = scores.save(store) {
            warn!(error = %err, "failed to save best scores");
        }
    }

    let next_size = session.config().size.get() as u32 + 1;
    if prefs.unlock(next_size) {
        lines.push(format!("Unlocked {next_size}x{next_size}"));
        if let Err(err) = prefs.save(store) {
            warn!(error = %err, "failed to save preferences");
        }
    }

    info!(key = %key, moves = session.moves(), elapsed = session.elapsed(), "puzzle solved");
    lines.push("Press R to play again or Q to quit".to_string());
    lines.join("\n  ")
}

fn redraw(session: &Session, scores: &ScoreBook, cursor: usize, status: &str) -> Result<()> {
    let mut out = io::stdout();
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(
        out,
        "=== NEON SLIDE {} {} ===",
        session.config().size,
        session.config().mode
    )?;
    writeln!(
        out,
        "WASD/Arrows slide | IJKL cursor, Space slides row | U undo | R restart | M mode | T sound | Q quit\n"
    )?;
    write!(out, "{}", session)?;

    let (row, col) =
        neon_slide_core::to_row_col(cursor, session.config().size).unwrap_or((0, 0));
    writeln!(out, "Cursor: row {}, col {}", row + 1, col + 1)?;
    match scores.best(&session.score_key()) {
        Some(best) => writeln!(out, "Best: {} moves", best)?,
        None => writeln!(out, "Best: --")?,
    }
    if !status.is_empty() {
        writeln!(out, "\n  {}", status)?;
    }
    out.flush().context("failed to flush stdout")
}

enum InputAction {
    Slide(Direction),
    Cursor(Direction),
    SlideAtCursor,
    Undo,
    Restart,
    CycleMode,
    ToggleSound,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Slide(Direction::Up),
        [27, 91, 66] => InputAction::Slide(Direction::Down),
        [27, 91, 67] => InputAction::Slide(Direction::Right),
        [27, 91, 68] => InputAction::Slide(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Slide(Direction::Up),
        [b's'] | [b'S'] => InputAction::Slide(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Slide(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Slide(Direction::Right),

        // Cursor keys
        [b'i'] | [b'I'] => InputAction::Cursor(Direction::Up),
        [b'k'] | [b'K'] => InputAction::Cursor(Direction::Down),
        [b'j'] | [b'J'] => InputAction::Cursor(Direction::Left),
        [b'l'] | [b'L'] => InputAction::Cursor(Direction::Right),
        [b' '] | [b'\n'] | [b'\r'] => InputAction::SlideAtCursor,

        // Control keys
        [b'u'] | [b'U'] => InputAction::Undo,
        [b'r'] | [b'R'] => InputAction::Restart,
        [b'm'] | [b'M'] => InputAction::CycleMode,
        [b't'] | [b'T'] => InputAction::ToggleSound,
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc

        _ => InputAction::None,
    }
}

// =============================================================================
// Headless mode
// =============================================================================

/// Generate scrambles and report how far from solved they land.
fn run_headless(args: &Args, config: PuzzleConfig, seed: u64, episodes: u32) -> Result<()> {
    let mut distances: Vec<usize> = Vec::with_capacity(episodes as usize);
    let mut misplaced_total = 0usize;
    let mut replayed = 0u32;

    for episode in 0..episodes {
        let episode_seed = seed.wrapping_add(episode as u64);
        let mut rng = SmallRng::seed_from_u64(episode_seed);
        let scramble = shuffle(config.size, config.difficulty, &mut rng).with_context(|| {
            format!("episode {} (seed {}) failed to shuffle", episode + 1, episode_seed)
        })?;

        let board = scramble.board();
        let distance = board.manhattan_distance();
        distances.push(distance);
        misplaced_total += board.misplaced();

        let mut replay = board.clone();
        for cell in scramble.solution() {
            replay.slide(cell);
        }
        if replay.is_solved() {
            replayed += 1;
        } else {
            warn!(episode = episode + 1, "solution replay did not reach the target");
        }

        if args.verbose {
            println!(
                "Episode {}: Manhattan={}, Misplaced={}",
                episode + 1,
                distance,
                board.misplaced()
            );
            print!("{}", board);
        }
    }

    let count = episodes.max(1) as f64;
    let avg_distance = distances.iter().sum::<usize>() as f64 / count;
    distances.sort_unstable();
    let median_distance = match distances.len() {
        0 => 0.0,
        len if len % 2 == 0 => (distances[len / 2 - 1] + distances[len / 2]) as f64 / 2.0,
        len => distances[len / 2] as f64,
    };

    // Output results in parseable format
    println!("=== Scramble Statistics ===");
    println!("episodes={}", episodes);
    println!("size={}", config.size.get());
    println!("difficulty={}", config.difficulty);
    println!("seed={}", seed);
    println!("walk_length={}", walk_length(config.size, config.difficulty));
    println!("avg_manhattan={:.2}", avg_distance);
    println!("median_manhattan={:.2}", median_distance);
    println!("min_manhattan={}", distances.first().unwrap_or(&0));
    println!("max_manhattan={}", distances.last().unwrap_or(&0));
    println!("avg_misplaced={:.2}", misplaced_total as f64 / count);
    println!("replayed={}/{}", replayed, episodes);
    Ok(())
}

/// Keeps the terminal in raw mode until dropped, including on early return.
struct RawMode;

impl RawMode {
    fn enable() -> Self {
        enable_raw_mode();
        RawMode
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        disable_raw_mode();
    }
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // Without raw mode each key needs Enter
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
