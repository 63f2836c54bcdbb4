use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use mentorgrid::app::{App, TICK_RATE_MS};
use mentorgrid::runtime::{AppEvent, CrosstermEventSource, Runner};
use mentorgrid::storage::FileSessionStorage;

/// weekly mentoring session planner
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A weekly mentoring session planner: a grid of time slots by days of week. Log a session per slot (language, mentor, mentee, notes) and track per-week totals. Sessions persist to a local JSON file."
)]
pub struct Cli {
    /// path of the sessions file (defaults to the per-user state directory)
    #[clap(short = 'd', long)]
    data_file: Option<PathBuf>,

    /// week offset to open on (0 = this week, negative = past)
    #[clap(short = 'w', long, default_value_t = 0, allow_hyphen_values = true)]
    week: i32,
}

impl Cli {
    fn storage(&self) -> FileSessionStorage {
        match &self.data_file {
            Some(path) => FileSessionStorage::with_path(path),
            None => FileSessionStorage::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Box::new(cli.storage()), cli.week);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let event = runner.step();
        let redraw = !matches!(event, AppEvent::Tick) || app.status.is_some();
        app.handle_event(event);
        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
