pub mod ui;

use crate::ui::{grid, ui, Board};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flashgrid::{
    app_dirs::AppDirs,
    audio::TerminalBell,
    clock::{Clock, MonotonicClock},
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    sinks::{AudioSink, Position},
    PanelSet, Phase, RoundController,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// reaction-speed panel game: hit the lit panel before it goes dark
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Panels light up one at a time for a 60 second round. Click the lit panel (or press its number) before it goes dark; the window shrinks as the round goes on. Fastest, slowest and average reaction times are shown at the end."
)]
pub struct Cli {
    /// silence the terminal bell
    #[clap(long)]
    mute: bool,

    /// ring the bell on misses only, not on every activation
    #[clap(long)]
    no_activation_cue: bool,

    /// disable the particle burst on hits
    #[clap(long)]
    no_effects: bool,

    /// seed panel selection for a reproducible sequence
    #[clap(long)]
    seed: Option<u64>,

    /// redraw interval in milliseconds
    #[clap(long)]
    frame_ms: Option<u64>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the config file.
    fn apply(&self, mut cfg: Config) -> Config {
        if self.mute {
            cfg.sound = false;
        }
        if self.no_activation_cue {
            cfg.activation_cue = false;
        }
        if self.no_effects {
            cfg.effects = false;
        }
        if let Some(ms) = self.frame_ms {
            cfg.frame_ms = ms.max(1);
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<A: AudioSink, C: Clock> {
    pub controller: RoundController<Board, A, C>,
    /// Panel cells from the last draw, for mouse hit-testing.
    pub grid: Vec<Rect>,
}

impl<A: AudioSink, C: Clock> App<A, C> {
    pub fn new(cfg: &Config, seed: Option<u64>, audio: A, clock: C) -> Self {
        let controller =
            RoundController::new(PanelSet::default(), Board::new(cfg.effects), audio, clock);
        let controller = match seed {
            Some(seed) => controller.with_seed(seed),
            None => controller,
        };

        Self {
            controller,
            grid: Vec::new(),
        }
    }

    /// How long the event loop may block: one frame, or less when a timer
    /// falls due sooner.
    pub fn wait_budget(&self, frame: Duration) -> Duration {
        self.controller
            .time_to_next_timer()
            .map(|ms| frame.min(Duration::from_millis(ms)))
            .unwrap_or(frame)
    }

    pub fn on_frame(&mut self, dt: Duration) {
        self.controller.advance();
        self.controller
            .display_mut()
            .effects
            .update(dt.as_secs_f64());
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.controller.phase() {
                Phase::Idle => {
                    self.controller.start_round();
                }
                Phase::Finished => {
                    self.controller.acknowledge_results();
                }
                Phase::Running => {}
            },
            KeyCode::Char(c) => {
                if let Some(panel) = grid::key_to_panel(c, self.controller.panels().len()) {
                    let at = self
                        .grid
                        .get(panel)
                        .map(|r| grid::center(*r))
                        .unwrap_or_default();
                    self.controller.handle_panel_click(panel, at);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(panel) = grid::hit_test(&self.grid, mouse.column, mouse.row) {
                let at = Position::new(mouse.column as f64, mouse.row as f64);
                self.controller.handle_panel_click(panel, at);
            }
        }
    }
}

fn init_logging() {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = cli.config_store();
    let cfg = cli.apply(store.load());
    if cli.save_config {
        store.save(&cfg)?;
        println!("saved settings to {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    info!(?cfg, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let audio = TerminalBell::stdout(cfg.sound).with_activation_cue(cfg.activation_cue);
    let mut app = App::new(&cfg, cli.seed, audio, MonotonicClock::new());
    let result = start_tui(&mut terminal, &mut app, Duration::from_millis(cfg.frame_ms));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, A: AudioSink, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<A, C>,
    frame: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(frame));

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step_within(app.wait_budget(frame)) {
            GameEvent::Tick => app.on_frame(frame),
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
            GameEvent::Mouse(mouse) => app.on_mouse(mouse),
        }
    }

    Ok(())
}
