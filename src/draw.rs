// Window + software drawing utilities.
// 1) A window showing the sketch surface on white paper.
// 2) A status strip above the surface (tiny 5x7 bitmap font).
// 3) The HUD notifier that feeds that strip.

use crate::encoder::{NO_CONTENT_MESSAGE, Notifier};
use crate::error::Error;
use crate::types::{CHANNELS, FrameBuffer, Surface};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Height of the status strip above the surface.
pub const HUD_HEIGHT: usize = 12;

const PAPER: u32 = 0x00_FF_FF_FF;
const HUD_BG: u32 = 0x00_20_20_20;
pub const HUD_TEXT: u32 = 0x00_FF_FF_FF;
pub const HUD_WARN: u32 = 0x00_FF_60_40;

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window big enough for the status strip plus the surface.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately shows the latest ink and status text.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    /// Visual: this is where the pen tip lands while the button is held.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Clamp)
    }

    /// Visual: while true, moving the mouse lays down ink.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Visual: when pressed, the pad is encoded and the status strip says
    /// whether anything was drawn.
    pub fn enter_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
    }

    /// Visual: when pressed, the pad goes blank and the status strip resets to "-".
    pub fn c_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::C, KeyRepeat::No) }
}

/// Status line shown above the surface. Also logs, so headless runs see it.
pub struct Hud {
    pub text: String,
    pub warning: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self { text: String::from("ENTER: SUBMIT  C: CLEAR"), warning: false }
    }
}

impl Notifier for Hud {
    fn report_no_content(&mut self) {
        log::warn!("{NO_CONTENT_MESSAGE}");
        self.text = NO_CONTENT_MESSAGE.to_owned();
        self.warning = true;
    }

    fn report_status(&mut self, text: &str) {
        log::info!("{text}");
        self.text = text.to_owned();
        self.warning = false;
    }

    fn clear_result(&mut self) {
        self.text = String::from("-");
        self.warning = false;
    }
}

/// Paint the surface onto white paper, its top row at frame row `top`.
/// Visual: ink alpha becomes darkness; anything outside the surface is left alone.
pub fn compose(surface: &Surface, fb: &mut FrameBuffer, top: usize) {
    let w = surface.width().min(fb.width);
    for (row_idx, row) in surface.as_bytes().chunks_exact(surface.width() * CHANNELS).enumerate() {
        let y = top + row_idx;
        if y >= fb.height {
            break;
        }
        for (x, px) in row.chunks_exact(CHANNELS).take(w).enumerate() {
            let a = px[3] as u32;
            let inv = 255 - a;
            // src-over onto white
            let r = (px[0] as u32 * a + 255 * inv) / 255;
            let g = (px[1] as u32 * a + 255 * inv) / 255;
            let b = (px[2] as u32 * a + 255 * inv) / 255;
            fb.pixels[y * fb.width + x] = (r << 16) | (g << 8) | b;
        }
    }
}

/// Fill the `HUD_HEIGHT` rows starting at `top` with the strip background and text.
/// Visual: a dark bar with one line of small text.
pub fn draw_hud(fb: &mut FrameBuffer, top: usize, text: &str, color: u32) {
    for y in top..(top + HUD_HEIGHT).min(fb.height) {
        let row = y * fb.width;
        fb.pixels[row..row + fb.width].fill(HUD_BG);
    }
    draw_text_5x7(fb, 4, top as i32 + 3, text, color);
}

/// Visual: the whole window turns white (blank paper).
pub fn fill(fb: &mut FrameBuffer) {
    fb.pixels.fill(PAPER);
}

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/* ---------- 5x7 bitmap font ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters render with the uppercase glyph.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00100,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y).
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx as i32, y + ry as i32, color);
                }
            }
        }
    }
}

/// Each glyph is 5x7 with 1-pixel spacing; unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ink_shows_dark_on_white_below_the_strip() {
        let mut s = Surface::new(3, 1);
        s.ink_pixel(1, 0, [0, 0, 0], 255);
        s.ink_pixel(2, 0, [0, 0, 0], 128);
        let mut fb = FrameBuffer::new(3, 3);
        fill(&mut fb);
        compose(&s, &mut fb, 1);
        // row 0 is left for the strip
        assert_eq!(&fb.pixels[..3], &[PAPER; 3]);
        assert_eq!(fb.pixels[3], 0x00_FF_FF_FF);
        assert_eq!(fb.pixels[4], 0);
        assert_eq!(fb.pixels[5], 0x007F7F7F);
        assert_eq!(fb.pixels[6], PAPER);
    }

    #[test]
    fn hud_strip_fills_only_its_rows() {
        let mut fb = FrameBuffer::new(40, HUD_HEIGHT + 8);
        fill(&mut fb);
        draw_hud(&mut fb, 0, "I", HUD_TEXT);
        assert_eq!(fb.pixels[0], HUD_BG);
        assert_eq!(fb.pixels[(HUD_HEIGHT - 1) * 40 + 39], HUD_BG);
        assert_eq!(fb.pixels[HUD_HEIGHT * 40], PAPER);
        // top bar of 'I' starts at column 5 of the first glyph row
        assert_eq!(fb.pixels[3 * 40 + 5], HUD_TEXT);
    }

    #[test]
    fn every_message_glyph_exists() {
        for ch in NO_CONTENT_MESSAGE.chars().chain("ENTER: SUBMIT  C: CLEAR -, 0123456789".chars()) {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
    }

    #[test]
    fn hud_tracks_latest_message() {
        let mut hud = Hud::new();
        hud.report_no_content();
        assert!(hud.warning);
        assert_eq!(hud.text, NO_CONTENT_MESSAGE);
        hud.report_status("Drawn on");
        assert!(!hud.warning);
        hud.clear_result();
        assert_eq!(hud.text, "-");
    }
}
