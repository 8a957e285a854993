use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use phrasedash::{
    app::{App, AppControl},
    app_dirs::AppDirs,
    clock::Moment,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, GameOptions},
    history::HistoryLog,
    phrases::{Language, LocalPhrases, PhraseDelivery, PhraseSource, Pick, RemotePhrases},
    preferences::Theme,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    share::ShareCascade,
    storage::{FileStore, KeyValueStore, MemoryStore},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::mpsc::{self, Receiver},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// typing game with timed challenges and a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the phrase on screen as fast and as accurately as you can. Scores, the leaderboard and your preferences are kept between runs."
)]
pub struct Cli {
    /// phrase language, remembered for next time
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// start straight into a challenge
    #[clap(short = 'c', long)]
    challenge: bool,

    /// length of a challenge in seconds
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    challenge_secs: Option<u32>,

    /// fetch phrases from public quote services, falling back to the bundled lists
    #[clap(long)]
    online: bool,

    /// hide the on-screen keyboard
    #[clap(long)]
    no_keyboard: bool,

    /// color theme, remembered for next time
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// clear the leaderboard and saved scores before starting
    #[clap(long)]
    reset_scores: bool,
}

impl Cli {
    /// Flags given on the command line win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.challenge_secs {
            config.challenge_secs = secs;
        }
        if self.online {
            config.online = true;
        }
        if self.no_keyboard {
            config.show_keyboard = false;
        }
        config
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    // stderr would draw over the alternate screen
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}

fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    match AppDirs::state_dir() {
        Some(dir) => Box::new(FileStore::with_quota(dir, config.storage_quota_bytes)),
        None => {
            log::warn!("no state directory, scores will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

fn phrase_source(config: &Config) -> (Box<dyn PhraseSource>, Receiver<PhraseDelivery>) {
    let (tx, rx) = mpsc::channel();
    let local = LocalPhrases::new(Pick::Random);
    let source: Box<dyn PhraseSource> = if config.online {
        Box::new(RemotePhrases::new(
            config.english_endpoint.as_str(),
            config.french_endpoint.as_str(),
            Duration::from_millis(config.fetch_timeout_ms),
            local,
            tx,
        ))
    } else {
        Box::new(local)
    };
    (source, rx)
}

fn build_app(cli: &Cli, config: &Config, now: Moment) -> (App, Receiver<PhraseDelivery>) {
    let (source, deliveries) = phrase_source(config);
    let options = GameOptions {
        challenge_secs: config.challenge_secs,
        history: AppDirs::history_path().map(HistoryLog::new),
    };
    let mut game = Game::new(open_store(config), source, options, now);

    if cli.reset_scores {
        game.reset_scores();
    }
    if let Some(language) = cli.language.filter(|l| *l != game.language()) {
        game.set_language(language, now);
    }
    if let Some(theme) = cli.theme {
        game.set_theme(theme);
    }
    if cli.challenge {
        game.start_challenge(now);
    }

    let app = App::new(game, ShareCascade::default(), config.show_keyboard, now);
    (app, deliveries)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    let config = cli.apply(FileConfigStore::new().load());
    log::debug!("starting with {config:?}");
    let (mut app, deliveries) = build_app(&cli, &config, Moment::now());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &deliveries);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    deliveries: &Receiver<PhraseDelivery>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        let now = Moment::now();
        while let Ok(delivery) = deliveries.try_recv() {
            app.deliver(delivery, now);
        }
        match event {
            AppEvent::Input(input) => {
                if app.handle_input(&input, now) == AppControl::Quit {
                    break;
                }
            }
            AppEvent::Closed => {
                log::error!("terminal input closed, exiting");
                return Err("terminal input closed".into());
            }
            AppEvent::Resize | AppEvent::Tick => {}
        }
        // the countdown advances on every step, input or not
        app.on_tick(now);
    }

    Ok(())
}
