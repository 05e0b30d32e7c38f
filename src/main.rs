mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use aquarium::assets::{ClipCache, SheetManifest, SpriteBank};
use aquarium::audio::TracingAudio;
use aquarium::config::{TankConfig, REF_TICK_MS};
use aquarium::entity::EntityKind;
use aquarium::sim::Simulation;
use aquarium::surface::NullSurface;

use display::TerminalSurface;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

#[derive(Parser, Debug)]
#[command(name = "aquarium")]
#[command(about = "A fish tank in your terminal")]
struct Args {
    /// Tank configuration (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for every random choice in the tank
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a terminal UI and log a summary at the end
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Write logs here while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Headless runs log to stderr. The terminal UI owns stdout and stderr, so it
/// logs only when given a file.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.headless {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    } else if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
    Ok(())
}

// ── Headless ──────────────────────────────────────────────────────────────────

fn run_headless(sim: &mut Simulation<TracingAudio>, ticks: u64) {
    let mut surface = NullSurface;
    for _ in 0..ticks {
        sim.tick(REF_TICK_MS, &mut surface);
    }
    let stats = sim.stats();
    info!(
        frames = stats.frames,
        fish = stats.fish,
        enemies = stats.enemies,
        food = stats.food,
        money = stats.money,
        friends = stats.friends,
        balance = stats.balance,
        "headless run finished"
    );
}

// ── Tank loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits. Keys and clicks are drained each frame, then
/// the tank ticks once at wall-clock time and is redrawn.
fn tank_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation<TracingAudio>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut surface = TerminalSurface::new(width, height, sim.config().playfield);
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('f') | KeyCode::Char('F') => {
                        let pf = sim.config().playfield;
                        let outcome = sim.click(pf.width / 2.0, pf.height / 2.0);
                        debug!(?outcome, "feed key");
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') => {
                        let pf = sim.config().playfield;
                        let lane = pf.floor_line() - sim.sprites().friend.swim().frame_height;
                        sim.spawn(EntityKind::Friend, pf.width / 2.0, lane);
                    }
                    _ => {}
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    let (x, y) = surface.to_playfield(column, row);
                    let outcome = sim.click(x, y);
                    debug!(?outcome, x, y, "click");
                }
                Event::Resize(width, height) => surface.resize(width, height),
                _ => {}
            }
        }

        sim.frame(clock.elapsed().as_secs_f64() * 1000.0, &mut surface);
        display::render(out, &mut surface, &sim.stats())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

fn run_terminal(sim: &mut Simulation<TracingAudio>) -> std::io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Blocking event reads get their own thread so the tank never stalls.
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

    let result = tank_loop(&mut out, sim, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let mut config = match &args.config {
        Some(path) => TankConfig::from_path(path)
            .with_context(|| format!("loading tank config from {}", path.display()))?,
        None => TankConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    let mut cache = ClipCache::new(SheetManifest::default());
    let sprites = SpriteBank::load(&mut cache).context("loading sprite sheets")?;
    let mut sim = Simulation::new(config, sprites, TracingAudio).context("invalid tank config")?;
    sim.populate();

    if args.headless {
        run_headless(&mut sim, args.ticks);
    } else {
        run_terminal(&mut sim).context("terminal session failed")?;
        info!(balance = sim.balance(), "tank closed");
    }
    Ok(())
}
