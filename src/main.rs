mod api;
mod app;
mod config;
mod controller;
mod dispatch;
mod logging;
#[cfg(test)]
mod testing;
mod ui;

use app::App;
use clap::Parser;
use controller::Screen;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use logging::Verbosity;
use std::path::PathBuf;
use std::time::Duration;

/// TUI client for student result records served over REST
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the server exposing the `/students` collection
    #[arg(short, long)]
    url: Option<String>,

    /// Configuration file, layered over the platform and local ones
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// How long to wait for a key before checking for finished requests.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref(), cli.url.as_deref())?;

    let log_dir = config
        .log_directory
        .clone()
        .or_else(|| config::project_dirs().map(|d| d.cache_dir().to_path_buf()))
        .ok_or("Could not determine a log directory")?;
    let (log_guard, log_path) = logging::init_logging(
        Verbosity::from_occurrences(cli.verbose),
        config.log_level.as_deref(),
        &log_dir,
    )?;
    tracing::info!(server = %config.base_url, log = %log_path.display(), "starting");

    let client = api::RestClient::new(config.base_url.clone())?;
    let mut app = App::new(client);

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal loop failed");
        drop(log_guard);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    tracing::info!(pending = app.dispatcher.in_flight(), "exiting");
    Ok(())
}

fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.poll_outcomes();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // A notice blocks everything until dismissed
    if app.controller.notice().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }

    if app.controller.confirmation().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.answer_confirmation(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.answer_confirmation(false);
            }
            _ => {}
        }
        return;
    }

    let typing = matches!(app.controller.screen(), Screen::Form(_));

    // Help toggle (not while typing)
    if key.code == KeyCode::Char('?') && !typing {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.controller.screen() {
        Screen::List => handle_list_key(app, key),
        Screen::Form(_) => app.handle_form_key(key),
        Screen::Details(_) => handle_details_key(app, key),
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.list_first();
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.list_last();
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.load();
        }
        KeyCode::Char('a') => {
            app.open_add();
        }
        KeyCode::Char('e') => {
            app.edit_selected();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.delete_selected();
        }
        KeyCode::Enter | KeyCode::Char('v') => {
            app.view_selected();
        }
        _ => {}
    }
}

fn handle_details_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') | KeyCode::Backspace => {
            app.back();
        }
        _ => {}
    }
}
