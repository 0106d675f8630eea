//! shocksim - antifragile response curves under random shocks.
//!
//! Terminal I/O lives here; all state management and rendering logic lives
//! in `shocksim::tui`.

#![forbid(unsafe_code)]

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use shocksim::cli::{Args, Command, HELP};
use validator::Validate;
use shocksim::config::SimParams;
use shocksim::tui::{ui, App};
use shocksim::SimResult;

fn main() -> SimResult<()> {
    let args = Args::parse();
    match args.command {
        Command::Help => {
            print!("{HELP}");
            Ok(())
        }
        Command::Version => {
            println!("shocksim {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Run {
            config_path,
            seed,
            shock_count,
            volatility,
            distribution,
        } => {
            let mut params = match config_path {
                Some(path) => SimParams::load(path)?,
                None => SimParams::default(),
            };
            if let Some(seed) = seed {
                params.seed = Some(seed);
            }
            if let Some(count) = shock_count {
                params.shock_count = count;
            }
            if let Some(sigma) = volatility {
                params.volatility = sigma;
            }
            if let Some(dist) = distribution {
                params.distribution = dist;
            }
            params.validate()?;

            run(App::new(params))?;
            Ok(())
        }
    }
}

/// Run the dashboard event loop.
fn run(mut app: App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
