use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use swipedex_tui::{load_config, App, EventHandler};

/// Swipe through creatures from the PokeAPI and keep the ones you like
#[derive(Parser, Debug)]
#[command(name = "swipedex", version, about)]
struct Args {
    /// Directory holding the liked collection, config and logs
    #[arg(long, default_value = "swipedex-data")]
    data_dir: PathBuf,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write debug logs to <data-dir>/swipedex.log
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create {}", args.data_dir.display()))?;
    setup_logging(&args.data_dir, args.debug)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.data_dir.join("config.toml"));
    let config = load_config(&config_path)?;

    // Create app
    let mut app = App::new(&args.data_dir, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // ~30 frames per second keeps the swipe animation smooth
    let event_handler = EventHandler::new(33);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print result
    if let Err(err) = result {
        log::error!("event loop failed: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn setup_logging(data_dir: &Path, debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let path = data_dir.join("swipedex.log");
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .add_filter_allow_str("swipedex")
            .build(),
        file,
    )
    .context("Failed to install logger")?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| swipedex_tui::ui::render(f, app))?;

        // Handle events
        let event = event_handler.next()?;
        match event {
            swipedex_tui::Event::Key(key) => {
                swipedex_tui::event::handle_key_event(key, app);
            }
            swipedex_tui::Event::Mouse(mouse) => {
                swipedex_tui::event::handle_mouse_event(mouse, app);
            }
            swipedex_tui::Event::Tick => {}
        }
        // Animations and fetch results advance on every pass, not only on
        // idle ticks, so dragging stays responsive
        app.tick();

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["swipedex"]);
        assert_eq!(args.data_dir, PathBuf::from("swipedex-data"));
        assert!(args.config.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from(["swipedex", "--data-dir", "/tmp/dex", "--config", "dex.toml", "--debug"]);
        assert_eq!(args.data_dir, PathBuf::from("/tmp/dex"));
        assert_eq!(args.config, Some(PathBuf::from("dex.toml")));
        assert!(args.debug);
    }
}
