use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use std::time::Duration;

use crate::app::{App, Screen};
use crate::config::Keymap;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Mouse event
    Mouse(MouseEvent),
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Frame interval; animations advance once per tick
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Mouse(m) => return Ok(Event::Mouse(m)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }
    let keys = app.config.keymap.clone();

    // Help screen takes precedence
    if app.help_open {
        if Keymap::matches(&keys.help, &key) || Keymap::matches("esc", &key) {
            app.close_help();
        }
        return;
    }

    if Keymap::matches(&keys.quit, &key) {
        app.quit();
        return;
    }
    if Keymap::matches(&keys.help, &key) {
        app.open_help();
        return;
    }
    if Keymap::matches(&keys.toggle_theme, &key) {
        app.toggle_theme();
        return;
    }
    if Keymap::matches(&keys.back, &key) {
        app.back();
        return;
    }

    match app.screen {
        Screen::Intro => {
            if Keymap::matches(&keys.start, &key) {
                app.start_browsing();
            } else if Keymap::matches(&keys.gallery, &key) {
                app.show_gallery();
            }
        }
        Screen::Swipe => {
            if Keymap::matches(&keys.like, &key) {
                app.like();
            } else if Keymap::matches(&keys.dislike, &key) {
                app.dislike();
            } else if Keymap::matches(&keys.retry, &key) {
                app.retry();
            } else if Keymap::matches(&keys.gallery, &key) {
                app.show_gallery();
            }
        }
        Screen::Gallery => {
            if Keymap::matches(&keys.scroll_up, &key) {
                app.gallery_scroll_up();
            } else if Keymap::matches(&keys.scroll_down, &key) {
                app.gallery_scroll_down();
            } else if Keymap::matches(&keys.start, &key) {
                app.start_browsing();
            }
        }
    }
}

/// Handle mouse events: dragging the card on the swipe screen, scrolling the
/// gallery
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let on_card = app
                .card_area
                .map(|card| card.contains(Position::new(mouse.column, mouse.row)))
                .unwrap_or(false);
            if on_card {
                app.begin_drag_at(mouse.column, mouse.row);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.drag_to(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release_drag(),
        MouseEventKind::ScrollUp if app.screen == Screen::Gallery => app.gallery_scroll_up(),
        MouseEventKind::ScrollDown if app.screen == Screen::Gallery => app.gallery_scroll_down(),
        _ => {}
    }
}
