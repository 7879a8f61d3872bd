mod layout;
mod sprite;
mod theme;
mod widgets;

pub use layout::{card_rect, render};
pub use sprite::{render_sprite, Sprite};
pub use theme::{type_color, Palette};
pub use widgets::{
    render_card,
    render_gallery,
    render_header,
    render_help_screen,
    render_intro,
    render_status_bar,
    render_swipe_screen,
};
