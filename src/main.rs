mod audio;
mod display;
mod input;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
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

use survival_shooter::compute::{init_state, step};
use survival_shooter::config::GameConfig;

use crate::audio::TerminalBell;
use crate::display::{TerminalAssets, TerminalSurface, VIEWPORT};
use crate::input::{Control, TerminalInput};

const MIN_FPS: u32 = 10;
const MAX_FPS: u32 = 120;
const FPS_STEP: u32 = 10;

#[derive(Parser)]
#[command(about = "Survive the horde for one minute.")]
struct Cli {
    /// RON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,
    /// Initial frame-rate limit
    #[arg(long)]
    fps: Option<u32>,
    /// Write logs here (the terminal itself is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Seed for spawn positions and enemy looks
    #[arg(long)]
    seed: Option<u64>,
    /// Ring the terminal bell on hits and at the end
    #[arg(long)]
    bell: bool,
}

// ── Frame pacing ──────────────────────────────────────────────────────────────

/// Sleeps out the remainder of each frame and reports the real frame time.
struct FrameLimiter {
    fps: u32,
    last: Instant,
}

impl FrameLimiter {
    fn new(fps: u32) -> Self {
        Self {
            fps: fps.clamp(MIN_FPS, MAX_FPS),
            last: Instant::now(),
        }
    }

    fn adjust(&mut self, faster: bool) {
        self.fps = if faster {
            (self.fps + FPS_STEP).min(MAX_FPS)
        } else {
            self.fps.saturating_sub(FPS_STEP).max(MIN_FPS)
        };
        log::info!("frame-rate limit now {}", self.fps);
    }

    /// Seconds since the previous call, after waiting out the frame budget.
    fn tick(&mut self) -> f32 {
        let budget = Duration::from_secs(1) / self.fps;
        let elapsed = self.last.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f32()
    }
}

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Restores the terminal however the program exits.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    /// The guard exists before raw mode is switched on, so a failure at any
    /// later step still restores the terminal on the way out.
    fn engage<W: Write>(out: &mut W) -> anyhow::Result<Self> {
        let mut guard = Self {
            keyboard_enhanced: false,
        };
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        out.execute(terminal::EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        // Ghostty / kitty-protocol terminals report key releases; others
        // fall back to the hold window in `input`.
        guard.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "error" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fps = cli.fps.unwrap_or(config.session.frame_rate);

    let mut out = BufWriter::new(stdout());
    let _guard = TerminalGuard::engage(&mut out)?;

    // Blocking reads happen here; the frame loop only ever polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // frame loop has exited
            }
        }
    });

    run(&mut out, &rx, config, fps, &mut rng, cli.bell)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    fps: u32,
    rng: &mut StdRng,
    bell: bool,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let mut surface = TerminalSurface::new(cols, rows);
    let mut input = TerminalInput::new(surface.cell_size(), VIEWPORT / 2.0);
    let mut audio = TerminalBell::new(bell);
    let mut limiter = FrameLimiter::new(fps);
    let end_hold = Duration::from_secs_f32(config.session.end_hold_secs.max(0.0));

    let mut state = init_state(config, &TerminalAssets, VIEWPORT);
    log::info!("session started at {} fps", limiter.fps);

    let mut dt = 0.0;
    loop {
        for control in input.drain(rx) {
            match control {
                Control::Quit => {
                    log::info!("quit after {:.1}s", state.survival_time);
                    return Ok(());
                }
                Control::SlowerFrames => limiter.adjust(false),
                Control::FasterFrames => limiter.adjust(true),
                Control::Resize(cols, rows) => {
                    surface.resize(cols, rows);
                    input.set_cell_size(surface.cell_size());
                }
            }
        }

        surface.clear();
        let phase = step(&mut state, &input, dt, rng, &mut surface, &mut audio);
        surface.present(out).context("drawing frame")?;
        audio.flush(out)?;

        if phase.is_terminal() {
            thread::sleep(end_hold);
            return Ok(());
        }
        dt = limiter.tick();
    }
}
