use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{error, info};

use typewriter::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, SettingsOverrides},
    history_log::HistoryLog,
    logging,
    runtime::{EventSource, Runner, TerminalEvents},
    texts::{self, TextSource},
    ui,
};

/// How often live WPM is redrawn while nothing is typed
const REFRESH_MS: u64 = 100;

/// typing practice over shuffled rounds of texts, with live stats and history
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// text file to practice on; paragraphs are separated by blank lines
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// wait for Tab after each text instead of moving on automatically
    #[clap(long)]
    no_auto_advance: bool,

    /// pause before the next text, in milliseconds (1000-5000)
    #[clap(short = 'd', long)]
    delay: Option<u64>,

    /// do not ring the terminal bell on mistakes
    #[clap(long)]
    no_sound: bool,

    /// hide the live stats bar
    #[clap(long)]
    hide_stats: bool,

    /// settings file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// do not append completed texts to the history log
    #[clap(long)]
    no_log: bool,
}

impl Cli {
    /// Flags only override when given; absent flags keep the stored value
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            auto_advance: self.no_auto_advance.then_some(false),
            advance_delay_ms: self.delay,
            show_stats: self.hide_stats.then_some(false),
            sound_enabled: self.no_sound.then_some(false),
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn history_log(&self) -> Option<HistoryLog> {
        if self.no_log {
            return None;
        }
        AppDirs::history_log_path().map(HistoryLog::new)
    }

    fn text_source(&self) -> Result<TextSource> {
        let mut source = TextSource::default();
        if let Some(path) = &self.file {
            let custom = texts::load_custom_texts(path)?;
            info!(path = %path.display(), paragraphs = custom.len(), "loaded custom texts");
            source.load_custom(custom);
        }
        Ok(source)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_file_path() {
        // the app works fine without a log file
        if let Err(err) = logging::init_file_logging(&path) {
            eprintln!("warning: {err:#}");
        }
    }

    let texts = cli.text_source()?;
    let store: Box<dyn ConfigStore> = Box::new(cli.config_store());
    let mut app = App::new(store, &cli.overrides(), texts, cli.history_log());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(TerminalEvents, Duration::from_millis(REFRESH_MS));
    let result = start_tui(&mut terminal, &mut app, &mut runner);
    if let Err(err) = &result {
        error!(%err, "terminal loop failed");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(completed = app.engine.history().len(), "session ended");
    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(app, f))?;
        let event = runner
            .step(app.until_transition())
            .context("failed to read terminal input")?;
        app.handle_event(event);
    }
    Ok(())
}
