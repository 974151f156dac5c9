//! BLOCKFALL - terminal front end
//!
//! Drives a [`Game`] from a fixed-rate frame loop, maps key presses to
//! actions and mouse clicks on the control strip to held buttons.

mod ui;

use blockfall::{Action, Game, KeyBindings, Settings};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::Control;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

#[derive(Debug, Parser)]
#[command(name = "blockfall", about = "A falling-block puzzle for the terminal")]
struct Cli {
    #[arg(long, help = "Settings file to use instead of the default location")]
    config: Option<PathBuf>,

    #[arg(long, help = "Seed for the piece sequence")]
    seed: Option<u64>,

    #[arg(long, help = "Print the effective settings as TOML and exit")]
    print_config: bool,
}

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Generate session ID for this instance
    let session_id: u32 = rand::random();
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file; the terminal belongs to the game
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // An explicit config file must load; the default one is best effort
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }
    let keys = KeyBindings::from_settings(&settings);
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut game = Game::with_timing(seed, settings.timing.to_timing());

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &keys);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result?;

    let score = game.score();
    tracing::info!(score = score.points, lines = score.lines, "exiting");
    println!("\nThanks for playing BLOCKFALL!");
    println!("Final Score: {} | Lines: {}", score.points, score.lines);
    println!("Seed: {}", seed);

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    keys: &KeyBindings,
) -> anyhow::Result<()> {
    let mut last_frame = Instant::now();
    // Control currently held down with the mouse
    let mut held: Option<Control> = None;

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game.snapshot(), held))?;

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match keys.action_for(key) {
                    Some(Action::Quit) => return Ok(()),
                    Some(action) => game.apply(action),
                    None => {}
                },
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            match ui::control_at(area, mouse.column, mouse.row) {
                                Some(Control::Restart) => game.restart(),
                                Some(Control::Pause) => game.toggle_pause(),
                                Some(control @ Control::Pad(action)) => {
                                    game.press_action(action.name());
                                    held = Some(control);
                                }
                                None => {}
                            }
                        }
                        MouseEventKind::Up(MouseButton::Left) => {
                            // Release whatever was pressed, even if the pointer moved off it
                            if let Some(Control::Pad(action)) = held.take() {
                                game.release_action(action.name());
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        game.tick(now.duration_since(last_frame));
        last_frame = now;
    }
}
