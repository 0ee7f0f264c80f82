mod actuator;
mod app;
mod celebration;
mod render;
mod settings;
mod theme;


use app::App;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pipes_core::{PuzzleConfig, SettleMode};
use settings::{GenerationTuning, Settings};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use theme::Theme;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Preset {
    fn config(self) -> PuzzleConfig {
        match self {
            Preset::Easy => PuzzleConfig::easy(),
            Preset::Medium => PuzzleConfig::medium(),
            Preset::Hard => PuzzleConfig::hard(),
            Preset::Expert => PuzzleConfig::expert(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

/// Rotate the tiles until every pipe carries water from a source
#[derive(Debug, Parser)]
#[command(name = "pipes", version, about)]
struct Cli {
    /// Start from a preset shape (overridden by the flags below)
    #[arg(long, value_enum)]
    preset: Option<Preset>,
    /// Grid width in tiles
    #[arg(long, short = 'x')]
    width: Option<usize>,
    /// Grid height in tiles
    #[arg(long, short = 'y')]
    height: Option<usize>,
    #[arg(long)]
    sources: Option<usize>,
    #[arg(long)]
    locks: Option<usize>,
    #[arg(long)]
    tunnels: Option<usize>,
    /// Give each source its own color
    #[arg(long)]
    colors: Option<bool>,
    /// Play the puzzle with this seed
    #[arg(long)]
    seed: Option<u64>,
    /// Connections to remove from the full grid (default: twice the tile count)
    #[arg(long)]
    remove: Option<usize>,
    /// Failed removals tolerated before generation stops
    #[arg(long, default_value_t = 100)]
    attempts: usize,
    /// Rotations land at once instead of animating
    #[arg(long)]
    instant: bool,
    #[arg(long, value_enum, default_value_t = ThemeChoice::Dark)]
    theme: ThemeChoice,
}

impl Cli {
    /// Write the given flags into the settings store
    fn apply(&self, settings: &mut Settings) {
        if let Some(preset) = self.preset {
            settings.apply_preset(&preset.config());
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(sources) = self.sources {
            settings.sources = sources;
        }
        if let Some(locks) = self.locks {
            settings.locks = locks;
        }
        if let Some(tunnels) = self.tunnels {
            settings.tunnels = tunnels;
        }
        if let Some(colors) = self.colors {
            settings.source_colors = colors;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings.clamp();
    }

    fn tuning(&self) -> GenerationTuning {
        GenerationTuning {
            connections_to_remove: self.remove,
            remove_attempts: self.attempts,
            settle: if self.instant {
                SettleMode::Instant
            } else {
                SettleMode::Deferred
            },
        }
    }

    fn theme(&self) -> Theme {
        match self.theme {
            ThemeChoice::Dark => Theme::dark(),
            ThemeChoice::Light => Theme::light(),
        }
    }
}

fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pipes.log")
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match File::create(log_path()) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut settings = Settings::load();
    cli.apply(&mut settings);
    if let Err(e) = settings.save() {
        log::warn!("{}", e);
    }

    let mut app = App::new(settings, cli.tuning(), cli.theme())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        log::error!("terminal failure: {}", e);
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        // Transitions, message timer and particles
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
