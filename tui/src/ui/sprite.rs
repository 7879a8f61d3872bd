use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Longest side kept after decoding
const THUMBNAIL_SIZE: u32 = 96;

/// Alpha below which a pixel is treated as transparent
const ALPHA_CUTOFF: u8 = 128;

/// Downscaled RGBA artwork ready to draw with half-block characters
#[derive(Debug, Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Sprite {
    /// Decode PNG (or any format `image` was built with) bytes
    pub fn decode(bytes: &[u8]) -> image::ImageResult<Self> {
        let rgba = image::load_from_memory(bytes)?
            .thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        let [r, g, b, a] = *self.pixels.get((y * self.width + x) as usize)?;
        (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
    }
}

/// Draw `sprite` centred in `area`, two pixels per cell (upper and lower half)
pub fn render_sprite(buf: &mut Buffer, sprite: &Sprite, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let target_w = area.width as f32;
    let target_h = area.height as f32 * 2.0;
    let scale = (target_w / sprite.width as f32).min(target_h / sprite.height as f32);
    if scale <= 0.0 {
        return;
    }
    let draw_w = sprite.width as f32 * scale;
    let draw_h = sprite.height as f32 * scale;
    let left = (target_w - draw_w) / 2.0;
    let top = (target_h - draw_h) / 2.0;

    let sample = |px: f32, py: f32| -> Option<Color> {
        let sx = (px - left) / scale;
        let sy = (py - top) / scale;
        if sx < 0.0 || sy < 0.0 {
            return None;
        }
        let (sx, sy) = (sx as u32, sy as u32);
        if sx >= sprite.width || sy >= sprite.height {
            return None;
        }
        sprite.color_at(sx, sy)
    };

    for row in 0..area.height {
        for col in 0..area.width {
            let px = col as f32 + 0.5;
            let upper = sample(px, row as f32 * 2.0 + 0.5);
            let lower = sample(px, row as f32 * 2.0 + 1.5);

            let cell = buf.get_mut(area.x + col, area.y + row);
            match (upper, lower) {
                (Some(up), Some(down)) => {
                    cell.set_char('▀').set_fg(up).set_bg(down);
                }
                (Some(up), None) => {
                    cell.set_char('▀').set_fg(up);
                }
                (None, Some(down)) => {
                    cell.set_char('▄').set_fg(down);
                }
                (None, None) => {}
            }
        }
    }
}
