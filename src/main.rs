use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade_shooter::assets::Sprites;
use arcade_shooter::config::GameConfig;
use arcade_shooter::display::{self, Surface, TerminalSurface};
use arcade_shooter::entities::GameState;
use arcade_shooter::error::Result;
use arcade_shooter::game::{EndOfRound, Game, Resolution};
use arcade_shooter::input::{Action, Controls};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

const PROMPT_TEXT: &str = "Game Over! Do you want to play again? [Y/N]";

#[derive(Parser, Debug)]
#[command(name = "arcade_shooter", about = "Dodge and shoot the descending enemies")]
struct Args {
    /// Directory containing Player.png and Enemy.png
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// TOML file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for enemy placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is busy drawing the game
    #[arg(long, default_value = "arcade_shooter.log")]
    log_file: PathBuf,
}

// ── End-of-round prompt ───────────────────────────────────────────────────────

/// Remembers that the round ended; the question is drawn every frame until
/// the player answers with Y or N.
#[derive(Default)]
struct RoundPrompt {
    pending: bool,
}

impl EndOfRound for RoundPrompt {
    fn present_choice(&mut self, state: &GameState) {
        log::debug!(
            "Asking to play again (player at x={:.0}, {} bullets in flight)",
            state.player.x,
            state.bullets.len()
        );
        self.pending = true;
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits, either with Q/Esc or by declining a restart.
///
/// Input events are drained non-blocking at the start of every frame, the
/// simulation is advanced by the wall time since the previous frame, and the
/// frame is drawn from the updated state.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    game: &mut Game<StdRng>,
    sprites: &Sprites,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let mut controls = Controls::new(keyboard_enhanced);
    let mut prompt = RoundPrompt::default();
    let mut frame: u64 = 0;
    let mut last_advance = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                surface.resize(cols, rows);
                continue;
            }
            let bar = surface.button_bar();
            match controls.handle(&ev, frame, &bar) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Fire) => game.fire(),
                Some(Action::Choose(choice)) if prompt.pending => match game.resolve(choice) {
                    Resolution::Exit => return Ok(()),
                    Resolution::Continue => {
                        prompt.pending = false;
                        last_advance = Instant::now();
                    }
                },
                _ => {}
            }
        }

        // ── Simulate, then draw the updated state ─────────────────────────────
        let latch = controls.latch(frame);
        game.set_input(latch);

        let now = Instant::now();
        game.advance(now.duration_since(last_advance), &mut prompt);
        last_advance = now;

        display::render(surface, game.state(), sprites)?;
        surface.draw_controls(&latch)?;
        if prompt.pending {
            surface.draw_prompt(PROMPT_TEXT)?;
        }
        surface.present()?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;
    log::info!("Starting arcade_shooter");

    let config = match &args.config {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    let sprites = Sprites::load(&args.assets);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("Keyboard release events: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &config, &sprites, rng, &rx, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("Exiting");
    result.map_err(Into::into)
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    sprites: &Sprites,
    rng: StdRng,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, cols, rows, config.canvas.width, config.canvas.height);
    let mut game = Game::new(config.clone(), rng);
    game_loop(&mut surface, &mut game, sprites, rx, keyboard_enhanced)
}
