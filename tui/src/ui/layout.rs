use crate::app::{App, Screen};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use super::{render_gallery, render_header, render_help_screen, render_intro, render_status_bar, render_swipe_screen, Palette};

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 22;

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.size();
    let palette = Palette::for_mode(app.display_mode());
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), size);

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(size);

    render_header(frame, app, &palette, chunks[0]);
    match app.screen {
        Screen::Intro => {
            app.card_area = None;
            render_intro(frame, app, &palette, chunks[1]);
        }
        Screen::Swipe => render_swipe_screen(frame, app, &palette, chunks[1]),
        Screen::Gallery => {
            app.card_area = None;
            render_gallery(frame, app, &palette, chunks[1]);
        }
    }
    render_status_bar(frame, app, &palette, chunks[2]);

    // Overlays (drawn last)
    if app.help_open {
        render_help_screen(frame, app, size);
    }
}

/// Resting position of the card: centred in `area`, shrunk to fit
pub fn card_rect(area: Rect) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `rect` moved by `(dx, dy)` cells and clipped to `bounds`
pub(crate) fn shifted_rect(rect: Rect, dx: i32, dy: i32, bounds: Rect) -> Option<Rect> {
    let left = (rect.x as i32 + dx).max(bounds.x as i32);
    let top = (rect.y as i32 + dy).max(bounds.y as i32);
    let right = (rect.x as i32 + rect.width as i32 + dx).min(bounds.right() as i32);
    let bottom = (rect.y as i32 + rect.height as i32 + dy).min(bounds.bottom() as i32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(left as u16, top as u16, (right - left) as u16, (bottom - top) as u16))
}
