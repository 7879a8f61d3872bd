use ratatui::style::Color;
use swipedex_core::storage::DisplayMode;

/// Colours for one display mode
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub card_bg: (u8, u8, u8),
    pub like: (u8, u8, u8),
    pub nope: (u8, u8, u8),
}

impl Palette {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                card_bg: (28, 28, 36),
                like: (46, 204, 113),
                nope: (231, 76, 60),
            },
            DisplayMode::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
                muted: Color::Gray,
                card_bg: (240, 240, 245),
                like: (30, 150, 80),
                nope: (200, 50, 40),
            },
        }
    }

    pub fn card_bg_color(&self) -> Color {
        rgb(self.card_bg)
    }

    /// Overlay colour fading in from the card background
    pub fn like_color(&self, opacity: f32) -> Color {
        blend(self.card_bg, self.like, opacity)
    }

    pub fn nope_color(&self, opacity: f32) -> Color {
        blend(self.card_bg, self.nope, opacity)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn blend(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Badge colour for a creature type
pub fn type_color(name: &str) -> Color {
    match name {
        "fire" => Color::Rgb(238, 129, 48),
        "water" => Color::Rgb(99, 144, 240),
        "grass" => Color::Rgb(122, 199, 76),
        "electric" => Color::Rgb(247, 208, 44),
        "ice" => Color::Rgb(150, 217, 214),
        "fighting" => Color::Rgb(194, 46, 40),
        "poison" => Color::Rgb(163, 62, 161),
        "ground" => Color::Rgb(226, 191, 101),
        "flying" => Color::Rgb(169, 143, 243),
        "psychic" => Color::Rgb(249, 85, 135),
        "bug" => Color::Rgb(166, 185, 26),
        "rock" => Color::Rgb(182, 161, 54),
        "ghost" => Color::Rgb(115, 87, 151),
        "dragon" => Color::Rgb(111, 53, 252),
        "dark" => Color::Rgb(112, 87, 70),
        "steel" => Color::Rgb(183, 183, 206),
        "fairy" => Color::Rgb(214, 133, 173),
        _ => Color::Rgb(168, 167, 122),
    }
}
