use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pointr::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::GameSession,
    logging,
    runtime::{CrosstermEventSource, Runner, ThreadTicker, TickScheduler, TICK_RATE_MS},
    session::SessionConfig,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;

const POLL_MS: u64 = 250;

/// click the numbers in order before you slip
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Numbered markers land at random spots in the play area. Click them in ascending order; one wrong click and the round is over."
)]
pub struct Cli {
    /// points to pre-fill in the field
    #[clap(short = 'p', long)]
    points: Option<String>,

    /// do not capture the mouse (Enter still starts a round)
    #[clap(long)]
    no_mouse: bool,

    /// read settings from this file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line flags win over the config file.
    fn apply(&self, cfg: Config) -> Config {
        Config {
            default_points: self.points.clone().or(cfg.default_points),
            mouse: cfg.mouse && !self.no_mouse,
            ..cfg
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(AppDirs::log_path().as_deref()) {
        eprintln!("pointr: logging disabled: {}", e);
    }

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &config);

    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let ticker = ThreadTicker::new(events.sender(), Duration::from_millis(TICK_RATE_MS));
    let mut app = App::new(GameSession::new(ticker, &SessionConfig::from(config)));
    let runner = Runner::new(events, Duration::from_millis(POLL_MS));

    info!(mouse = config.mouse, max_points = config.max_points, "session started");
    draw(terminal, &mut app)?;

    loop {
        let Some(event) = runner.step() else {
            continue;
        };

        match app.handle_event(event) {
            Control::Quit => break,
            Control::Redraw => draw(terminal, &mut app)?,
            Control::Continue => {}
        }
    }

    info!("session ended");
    Ok(())
}

fn draw<B: Backend, T: TickScheduler>(terminal: &mut Terminal<B>, app: &mut App<T>) -> io::Result<()> {
    terminal.draw(|f| {
        let area = f.area();
        app.set_area(area);
        f.render_widget(&app.session, area);
    })?;
    Ok(())
}
