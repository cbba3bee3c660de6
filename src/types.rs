// Core types shared by the stroke engine, the encoder and the window.

/// Bytes per pixel in a `Surface` (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Fixed-size RGBA8 raster the pen draws on.
/// Width and height never change after construction; only the bytes do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    data: Vec<u8>, // width * height * 4, row-major, RGBA
}

impl Surface {
    /// A fully transparent (all-zero) surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0u8; width * height * CHANNELS] }
    }

    /// Wrap an existing RGBA buffer. Returns `None` if the length doesn't match.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * CHANNELS {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Raw channel bytes in scan order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Blank every pixel back to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite the pixels with another surface of the same size.
    /// Returns false (and leaves `self` alone) on a size mismatch.
    #[must_use]
    pub fn paint_from(&mut self, other: &Surface) -> bool {
        if other.width != self.width || other.height != self.height {
            return false;
        }
        self.data.copy_from_slice(&other.data);
        true
    }

    /// RGBA of the pixel at (x,y), or `None` outside the surface.
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Write ink of the given colour at (x,y). Alpha only ever grows: the
    /// stronger of the old and new coverage wins, so overlapping segments
    /// never thin each other out.
    #[inline]
    pub fn ink_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3], alpha: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * CHANNELS;
        if alpha <= self.data[i + 3] {
            return;
        }
        self.data[i] = rgb[0];
        self.data[i + 1] = rgb[1];
        self.data[i + 2] = rgb[2];
        self.data[i + 3] = alpha;
    }
}

/// Integer pixel position in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One straight piece of ink, consumed right away by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub width: f32,
}

/// What the window shows each frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_blank_and_sized() {
        let s = Surface::new(3, 2);
        assert_eq!(s.pixel_count(), 6);
        assert_eq!(s.as_bytes().len(), 24);
        assert!(s.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn ink_keeps_the_stronger_alpha() {
        let mut s = Surface::new(2, 2);
        s.ink_pixel(1, 1, [0, 0, 0], 200);
        s.ink_pixel(1, 1, [0, 0, 0], 80);
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 200]));
        s.ink_pixel(-1, 0, [0, 0, 0], 255);
        s.ink_pixel(2, 0, [0, 0, 0], 255);
        assert_eq!(s.as_bytes().iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn paint_from_rejects_other_sizes() {
        let mut a = Surface::new(2, 2);
        let mut b = Surface::new(2, 2);
        b.ink_pixel(0, 0, [1, 2, 3], 255);
        assert!(a.paint_from(&b));
        assert_eq!(a, b);
        assert!(!a.paint_from(&Surface::new(3, 2)));
        assert!(Surface::from_rgba(2, 2, vec![0; 15]).is_none());
    }
}
