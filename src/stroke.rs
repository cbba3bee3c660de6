// Pen state and stroke rasterization.
// Discrete pointer samples become one continuous line: every sample is joined
// to the previous one by a round-capped segment, so fast strokes have no gaps.

use crate::input::PointerEvent;
use crate::types::{Point, Segment, Surface};

pub const DEFAULT_STROKE_WIDTH: f32 = 10.0;

/// Ink is plain opaque black; only alpha carries information.
pub const INK: [u8; 3] = [0, 0, 0];

/// Where the pen is and where it was. `previous == None` means the next
/// segment starts fresh (zero length) instead of connecting to a stale point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    pub current: Option<Point>,
    pub previous: Option<Point>,
    pub is_down: bool,
}

/// The pen's two-state machine. Visual: Drawing while the button/finger is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenState {
    Idle,
    Drawing,
}

/// The one logical pen. Mouse and touch both drive this same state.
pub struct StrokeEngine {
    state: PointerState,
    width: f32,          // pen diameter in pixels
    antialias: bool,     // soft one-pixel rim on every stroke
    dots_drawn: u64,     // one per pen-down
    segments_drawn: u64, // one per move while down
}

impl StrokeEngine {
    /// Create an idle pen of the given diameter.
    /// Visual: nothing changes until the first pen-down.
    pub fn new(width: f32, antialias: bool) -> Self {
        Self { state: PointerState::default(), width, antialias, dots_drawn: 0, segments_drawn: 0 }
    }

    /// Current/previous positions and whether the pen is down.
    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn pen(&self) -> PenState {
        if self.state.is_down { PenState::Drawing } else { PenState::Idle }
    }

    /// Number of pen-down dots rasterized so far.
    pub fn dots_drawn(&self) -> u64 {
        self.dots_drawn
    }

    /// Number of move segments rasterized so far.
    pub fn segments_drawn(&self) -> u64 {
        self.segments_drawn
    }

    /// Route one normalized event. Returns true if anything was rasterized.
    pub fn apply(&mut self, surface: &mut Surface, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(p) => {
                self.pointer_down(surface, p);
                true
            }
            PointerEvent::Move(p) => self.pointer_move(surface, p),
            PointerEvent::Up => {
                self.pointer_up();
                false
            }
        }
    }

    /// Pen goes active and leaves a dot, so a tap without movement still marks.
    /// A second down while already drawing restarts the stroke here.
    pub fn pointer_down(&mut self, surface: &mut Surface, p: Point) {
        self.state.is_down = true;
        self.state.previous = None;
        self.state.current = Some(p);
        self.stroke_to(surface, p);
        self.dots_drawn += 1;
    }

    /// Extends the stroke to `p` while the pen is down; ignored otherwise.
    pub fn pointer_move(&mut self, surface: &mut Surface, p: Point) -> bool {
        self.state.current = Some(p);
        if !self.state.is_down {
            return false;
        }
        self.stroke_to(surface, p);
        self.segments_drawn += 1;
        true
    }

    /// Pen lifts; the last point is forgotten so the next stroke starts fresh.
    pub fn pointer_up(&mut self) {
        self.state.is_down = false;
        self.state.previous = None;
    }

    /// Back to a fresh pen (used when the surface is cleared).
    pub fn reset(&mut self) {
        self.state = PointerState::default();
    }

    // Join the previous sample (or `p` itself, for a dot) to `p`.
    fn stroke_to(&mut self, surface: &mut Surface, p: Point) {
        let from = self.state.previous.unwrap_or(p);
        let seg = Segment { from, to: p, width: self.width };
        rasterize_segment(surface, &seg, self.antialias);
        self.state.previous = Some(p);
    }
}

/// Fill the capsule around `seg`: every pixel whose centre lies within
/// `width / 2` of the segment. That gives round caps, and consecutive
/// segments sharing an endpoint overlap into a round join.
/// With `antialias`, the one-pixel rim gets fractional coverage.
/// Visual: a black pill shape from `from` to `to`; a zero-length segment is a dot.
/// Endpoints may lie anywhere in `i32` space; only the part on the surface is drawn.
pub fn rasterize_segment(surface: &mut Surface, seg: &Segment, antialias: bool) {
    if !(seg.width > 0.0) || !seg.width.is_finite() {
        return;
    }
    if surface.width() == 0 || surface.height() == 0 {
        return;
    }
    // f64 keeps sub-pixel precision even for endpoints near the i32 limits.
    let r = seg.width as f64 * 0.5;
    let (ax, ay) = (seg.from.x as f64, seg.from.y as f64);
    let (bx, by) = (seg.to.x as f64, seg.to.y as f64);

    // Bounding box of the capsule, padded one pixel for the AA rim.
    // Worked in i64 so far-off endpoints and wide pens can't overflow,
    // then clamped to the surface.
    let pad = (r.ceil() as i64).min(i32::MAX as i64) + 1;
    let (w, h) = (surface.width() as i64, surface.height() as i64);
    let x0 = (seg.from.x.min(seg.to.x) as i64 - pad).max(0);
    let y0 = (seg.from.y.min(seg.to.y) as i64 - pad).max(0);
    let x1 = (seg.from.x.max(seg.to.x) as i64 + pad).min(w - 1);
    let y1 = (seg.from.y.max(seg.to.y) as i64 + pad).min(h - 1);
    if x0 > x1 || y0 > y1 {
        return; // capsule lies entirely off the surface
    }
    let (x0, y0, x1, y1) = (x0 as i32, y0 as i32, x1 as i32, y1 as i32);

    for y in y0..=y1 {
        for x in x0..=x1 {
            // Pixel (x,y) covers [x, x+1) so its centre is at +0.5.
            let d = distance_to_segment(x as f64 + 0.5, y as f64 + 0.5, ax, ay, bx, by);
            let coverage = if antialias {
                (r - d + 0.5).clamp(0.0, 1.0)
            } else if d <= r {
                1.0
            } else {
                0.0
            };
            if coverage <= 0.0 {
                continue;
            }
            let alpha = (coverage * 255.0).round() as u8;
            surface.ink_pixel(x, y, INK, alpha);
        }
    }
}

/// Euclidean distance from (px,py) to the closed segment a→b.
fn distance_to_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0 // zero-length segment is a dot
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(s: &Surface, x: usize, y: usize) -> u8 {
        s.pixel(x, y).map(|p| p[3]).unwrap_or(0)
    }

    #[test]
    fn down_moves_up_draws_one_dot_and_one_segment_per_move() {
        let mut surface = Surface::new(100, 100);
        let mut pen = StrokeEngine::new(DEFAULT_STROKE_WIDTH, true);

        pen.pointer_down(&mut surface, Point::new(10, 10));
        for i in 1..=7 {
            assert!(pen.pointer_move(&mut surface, Point::new(10 + i * 5, 10 + i * 3)));
        }
        pen.pointer_up();

        assert_eq!(pen.dots_drawn(), 1);
        assert_eq!(pen.segments_drawn(), 7);
        assert_eq!(pen.state().previous, None);
        assert_eq!(pen.pen(), PenState::Idle);
    }

    #[test]
    fn move_while_idle_leaves_surface_untouched() {
        let mut surface = Surface::new(50, 50);
        let mut pen = StrokeEngine::new(DEFAULT_STROKE_WIDTH, true);
        assert!(!pen.pointer_move(&mut surface, Point::new(20, 20)));
        assert_eq!(pen.segments_drawn(), 0);
        assert_eq!(surface, Surface::new(50, 50));
        // position is still tracked
        assert_eq!(pen.state().current, Some(Point::new(20, 20)));
    }

    #[test]
    fn tap_leaves_an_opaque_round_dot() {
        let mut surface = Surface::new(280, 280);
        let mut pen = StrokeEngine::new(10.0, true);
        pen.pointer_down(&mut surface, Point::new(50, 50));
        pen.pointer_up();

        for (x, y) in [(50, 50), (49, 49), (52, 47), (47, 52)] {
            assert_eq!(alpha(&surface, x, y), 255, "({x},{y})");
        }
        // outside the radius, and the square's corners stay clear
        assert_eq!(alpha(&surface, 40, 50), 0);
        assert_eq!(alpha(&surface, 45, 45), 0);
        assert_eq!(alpha(&surface, 200, 200), 0);
        assert!(surface.as_bytes().chunks(4).all(|px| px[..3] == INK));
    }

    #[test]
    fn next_down_does_not_connect_to_the_old_stroke() {
        let mut surface = Surface::new(100, 20);
        let mut pen = StrokeEngine::new(4.0, false);
        pen.pointer_down(&mut surface, Point::new(10, 10));
        pen.pointer_up();
        pen.pointer_down(&mut surface, Point::new(90, 10));
        pen.pointer_up();
        // nothing in between the two dots
        assert_eq!(alpha(&surface, 50, 10), 0);
    }

    #[test]
    fn segment_is_continuous_between_samples() {
        let mut surface = Surface::new(100, 20);
        let mut pen = StrokeEngine::new(4.0, false);
        pen.pointer_down(&mut surface, Point::new(10, 10));
        pen.pointer_move(&mut surface, Point::new(90, 10));
        for x in 10..90 {
            assert_eq!(alpha(&surface, x, 10), 255, "gap at x={x}");
        }
    }

    #[test]
    fn antialias_softens_only_the_rim() {
        let mut hard = Surface::new(40, 40);
        let mut soft = Surface::new(40, 40);
        let seg = Segment { from: Point::new(20, 20), to: Point::new(20, 20), width: 10.0 };
        rasterize_segment(&mut hard, &seg, false);
        rasterize_segment(&mut soft, &seg, true);

        assert!(hard.as_bytes().chunks(4).all(|px| px[3] == 0 || px[3] == 255));
        assert!(soft.as_bytes().chunks(4).any(|px| px[3] > 0 && px[3] < 255));
        assert_eq!(alpha(&soft, 20, 20), 255);
    }

    #[test]
    fn segment_near_edge_is_clipped() {
        let mut surface = Surface::new(10, 10);
        let seg = Segment { from: Point::new(-5, -5), to: Point::new(2, 2), width: 6.0 };
        rasterize_segment(&mut surface, &seg, true);
        assert_eq!(alpha(&surface, 0, 0), 255);
        assert_eq!(alpha(&surface, 9, 9), 0);
    }

    #[test]
    fn apply_routes_events() {
        let mut surface = Surface::new(30, 30);
        let mut pen = StrokeEngine::new(4.0, true);
        assert!(!pen.apply(&mut surface, PointerEvent::Move(Point::new(5, 5))));
        assert!(pen.apply(&mut surface, PointerEvent::Down(Point::new(5, 5))));
        assert_eq!(pen.pen(), PenState::Drawing);
        assert!(pen.apply(&mut surface, PointerEvent::Move(Point::new(9, 9))));
        assert!(!pen.apply(&mut surface, PointerEvent::Up));
        assert_eq!(pen.pen(), PenState::Idle);
    }

    #[test]
    fn l_shaped_stroke_has_a_round_corner() {
        let mut surface = Surface::new(60, 60);
        let mut pen = StrokeEngine::new(6.0, false);
        pen.pointer_down(&mut surface, Point::new(20, 20));
        pen.pointer_move(&mut surface, Point::new(40, 20));
        pen.pointer_move(&mut surface, Point::new(40, 40));
        pen.pointer_up();

        // corner and both legs are unbroken
        assert_eq!(alpha(&surface, 40, 20), 255);
        for x in 20..40 {
            assert_eq!(alpha(&surface, x, 20), 255, "gap at x={x}");
        }
        for y in 20..40 {
            assert_eq!(alpha(&surface, 40, y), 255, "gap at y={y}");
        }
        // outer elbow is filled...
        assert_eq!(alpha(&surface, 41, 18), 255);
        assert_eq!(alpha(&surface, 42, 19), 255);
        // ...but rounded off, not mitered to a square corner
        assert_eq!(alpha(&surface, 42, 17), 0);
    }

    #[test]
    fn far_off_endpoints_do_not_overflow() {
        let mut surface = Surface::new(50, 50);
        let mut pen = StrokeEngine::new(DEFAULT_STROKE_WIDTH, true);
        pen.pointer_down(&mut surface, Point::new(i32::MAX, 10));
        assert_eq!(surface, Surface::new(50, 50));
        pen.pointer_move(&mut surface, Point::new(i32::MIN, i32::MIN));
        pen.pointer_up();

        // a line crossing the whole surface from far outside still lands
        pen.pointer_down(&mut surface, Point::new(i32::MIN, 25));
        pen.pointer_move(&mut surface, Point::new(i32::MAX, 25));
        assert_eq!(alpha(&surface, 25, 25), 255);
    }

    #[test]
    fn degenerate_widths_draw_nothing() {
        let mut surface = Surface::new(20, 20);
        for width in [f32::INFINITY, f32::NAN, 0.0, -3.0] {
            let seg = Segment { from: Point::new(10, 10), to: Point::new(12, 12), width };
            rasterize_segment(&mut surface, &seg, true);
        }
        assert_eq!(surface, Surface::new(20, 20));

        // huge but finite pens cover everything without overflowing the box
        let seg = Segment { from: Point::new(10, 10), to: Point::new(10, 10), width: 1.0e30 };
        rasterize_segment(&mut surface, &seg, false);
        assert!(surface.as_bytes().chunks(4).all(|px| px[3] == 255));
    }
}
