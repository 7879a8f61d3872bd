use crate::app::{App, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use swipedex_core::session::SessionStatus;
use unicode_width::UnicodeWidthStr;

use super::layout::shifted_rect;
use super::{card_rect, render_sprite, type_color, Palette};

const TILE_WIDTH: u16 = 26;
const TILE_HEIGHT: u16 = 5;

/// Overlays fainter than this are not drawn
const OVERLAY_MIN_OPACITY: f32 = 0.05;

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let keys = &app.config.keymap;
    let (title, key_hints) = match app.screen {
        Screen::Intro => (
            " swipedex ".to_string(),
            format!(
                " [{}:Start] [{}:Gallery] [{}:Theme] [{}:Help] [{}:Quit] ",
                keys.start, keys.gallery, keys.toggle_theme, keys.help, keys.quit
            ),
        ),
        Screen::Swipe => (
            " swipedex | Swipe ".to_string(),
            format!(
                " [Drag card] [{}:Like] [{}:Nope] [{}:Gallery] [{}:Back] ",
                keys.like, keys.dislike, keys.gallery, keys.back
            ),
        ),
        Screen::Gallery => (
            format!(" swipedex | Liked ({}) ", app.store.liked().len()),
            format!(" [{}/{}:Scroll] [{}:Back] ", keys.scroll_up, keys.scroll_down, keys.back),
        ),
    };

    let header_spans = vec![
        Span::styled(
            title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(palette.muted)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut status_text = format!(
        " Liked: {} | Seen this session: {} ",
        app.store.liked().len(),
        app.store.seen().len()
    );
    if let Some(message) = &app.status_message {
        status_text.push_str(&format!("| {} ", message));
    }

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(palette.muted).fg(palette.fg))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the welcome screen
pub fn render_intro(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let keys = &app.config.keymap;
    let title_style = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let liked = app.store.liked().len();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("S W I P E D E X", title_style)),
        Line::from(""),
        Line::from("Meet creatures one card at a time."),
        Line::from("Drag a card right to keep it, left to pass."),
        Line::from(""),
        Line::from(Span::styled(
            match liked {
                0 => "Your collection is empty.".to_string(),
                1 => "1 creature in your collection.".to_string(),
                n => format!("{} creatures in your collection.", n),
            },
            Style::default().fg(palette.muted),
        )),
        Line::from(""),
        Line::from(format!("Press {} to start, {} for your collection.", keys.start, keys.gallery)),
    ];

    let height = (lines.len() as u16).min(area.height);
    let intro_area = Rect {
        x: area.x,
        y: area.y + (area.height - height) / 2,
        width: area.width,
        height,
    };

    let intro = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(intro, intro_area);
}

/// Render the swipe screen: the card at its current offset, or the loading
/// and retry states
pub fn render_swipe_screen(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    app.set_swipe_width(area.width);
    let base = card_rect(area);
    app.card_area = Some(base);

    match app.session.status() {
        SessionStatus::Loading => {
            let message = Paragraph::new("Fetching a creature...")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center);
            frame.render_widget(message, centered_line(area));
        }
        SessionStatus::Failed(error) => {
            let text = vec![
                Line::from(Span::styled(
                    "Failed to load a creature",
                    Style::default().fg(palette.nope_color(1.0)).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(error, Style::default().fg(palette.muted))),
                Line::from(""),
                Line::from(format!("Press {} to retry", app.config.keymap.retry)),
            ];
            let paragraph = Paragraph::new(text)
                .block(
                    Block::default()
                        .title(" Error ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(palette.nope_color(1.0))),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, base);
        }
        SessionStatus::Ready => {
            let offset = app.session.swipe().offset();
            let dx = offset.x.round() as i32;
            let dy = (offset.y / 2.0).round() as i32;
            if let Some(card) = shifted_rect(base, dx, dy, area) {
                render_card(frame, app, palette, card);
            }
        }
    }
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1.min(area.height),
    }
}

/// Render the current creature's card into `area`
pub fn render_card(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(creature) = app.session.current() else {
        return;
    };
    let visuals = app.session.swipe().visuals();

    let border_color = if visuals.like_opacity > 0.0 {
        palette.like_color(visuals.like_opacity)
    } else if visuals.nope_opacity > 0.0 {
        palette.nope_color(visuals.nope_opacity)
    } else {
        palette.accent
    };

    let mut block = Block::default()
        .title(format!(" #{:03} {} ", creature.id, creature.name))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.card_bg_color()).fg(palette.fg));
    if visuals.rotation_deg.abs() >= 1.0 {
        block = block.title(
            Title::from(format!(" tilt {:+.0}° ", visuals.rotation_deg))
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        );
    }

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Artwork
            Constraint::Length(1), // Types
        ])
        .split(inner);

    match app.sprite_for(creature) {
        Some(sprite) => render_sprite(frame.buffer_mut(), sprite, chunks[0]),
        None => {
            let placeholder = Paragraph::new("(artwork loading)")
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, centered_line(chunks[0]));
        }
    }

    frame.render_widget(
        Paragraph::new(type_badges(&creature.types)).alignment(Alignment::Center),
        chunks[1],
    );

    if visuals.like_opacity > OVERLAY_MIN_OPACITY {
        render_stamp(frame, "LIKE", palette.like_color(visuals.like_opacity), inner, Alignment::Left);
    }
    if visuals.nope_opacity > OVERLAY_MIN_OPACITY {
        render_stamp(frame, "NOPE", palette.nope_color(visuals.nope_opacity), inner, Alignment::Right);
    }
}

fn type_badges(types: &[String]) -> Line<'_> {
    let mut spans = Vec::new();
    for (i, name) in types.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", name),
            Style::default().bg(type_color(name)).fg(Color::Black),
        ));
    }
    Line::from(spans)
}

/// A boxed label in the top corner of the card
fn render_stamp(frame: &mut Frame, label: &str, color: Color, inner: Rect, side: Alignment) {
    let width = (label.width() as u16 + 4).min(inner.width);
    let height = 3.min(inner.height);
    let x = match side {
        Alignment::Right => inner.right().saturating_sub(width),
        _ => inner.x,
    };
    let area = Rect::new(x, inner.y, width, height);

    let stamp = Paragraph::new(Span::styled(
        label.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(stamp, area);
}

/// Render the liked collection as a grid of tiles
pub fn render_gallery(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let total = app.store.liked().len();
    if total == 0 {
        let empty_message = Paragraph::new("No liked creatures yet. Swipe a card to the right to keep it.")
            .block(Block::default().borders(Borders::ALL).title(" Liked "))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted));
        frame.render_widget(empty_message, area);
        return;
    }

    let columns = (area.width / TILE_WIDTH).max(1) as usize;
    let visible_rows = (area.height / TILE_HEIGHT).max(1) as usize;
    app.gallery_columns = columns;
    let rows = app.gallery_rows();
    if app.gallery_scroll >= rows {
        app.gallery_scroll = rows.saturating_sub(1);
    }
    let first = app.gallery_scroll * columns;

    for (i, liked) in app
        .store
        .liked()
        .iter()
        .skip(first)
        .take(visible_rows * columns)
        .enumerate()
    {
        let row = (i / columns) as u16;
        let col = (i % columns) as u16;
        let tile = Rect {
            x: area.x + col * TILE_WIDTH,
            y: area.y + row * TILE_HEIGHT,
            width: TILE_WIDTH.min(area.width),
            height: TILE_HEIGHT.min(area.height),
        };
        let tile = tile.intersection(area);
        if tile.width == 0 || tile.height == 0 {
            continue;
        }

        let liked_on = liked
            .liked_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("#{:03}", liked.id), Style::default().fg(palette.muted)),
                Span::raw(" "),
                Span::styled(liked_on, Style::default().fg(palette.muted)),
            ]),
            type_badges(&liked.types),
        ];

        let tile_widget = Paragraph::new(lines).block(
            Block::default()
                .title(format!(" {} ", liked.name))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.accent)),
        );
        frame.render_widget(tile_widget, tile);
    }
}

/// Render the help overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let keys = &app.config.keymap;
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &str, what: &str| Line::from(format!("{:<13}{}", key, what));

    let help_text = vec![
        Line::from(""),
        heading("Swiping"),
        entry("Mouse drag", "Drag the card; let go past a quarter width to decide"),
        entry(keys.like.as_str(), "Like the card"),
        entry(keys.dislike.as_str(), "Pass on the card"),
        entry(keys.retry.as_str(), "Retry after a failed load"),
        Line::from(""),
        heading("Screens"),
        entry(keys.start.as_str(), "Start swiping"),
        entry(keys.gallery.as_str(), "Liked collection"),
        entry(format!("{}/{}", keys.scroll_up, keys.scroll_down).as_str(), "Scroll the collection"),
        entry(keys.back.as_str(), "Back"),
        Line::from(""),
        heading("Interface"),
        entry(keys.toggle_theme.as_str(), "Toggle light/dark"),
        entry(keys.help.as_str(), "Show this help"),
        entry(keys.quit.as_str(), "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Press '{}' or 'Esc' to close", keys.help),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup_width = 70.min(size.width);
    let popup_height = (help_text.len() as u16 + 2).min(size.height);
    let x = (size.width.saturating_sub(popup_width)) / 2;
    let y = (size.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(2),
        height: popup_area.height.saturating_sub(2),
    };

    let paragraph = Paragraph::new(help_text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, inner);
}
