// Device events -> one pen.
// Mouse and touch report positions through different fields: a mouse event
// already carries its offset inside the surface, a touch point only its page
// position. Both end up as surface-local pixels before the stroke engine sees them.

use crate::types::Point;

/// Where the surface's top-left corner sits in page space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceOffset {
    pub left: f32,
    pub top: f32,
}

impl SurfaceOffset {
    pub fn to_local(&self, page_x: f32, page_y: f32) -> Point {
        Point::new((page_x - self.left).round() as i32, (page_y - self.top).round() as i32)
    }
}

/// Mouse position already relative to the surface's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl MouseEvent {
    fn local(&self) -> Point {
        Point::new(self.offset_x.round() as i32, self.offset_y.round() as i32)
    }
}

/// One finger, in page space; the surface offset still has to be subtracted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub page_x: f32,
    pub page_y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub touches: Vec<TouchPoint>,
}

/// Raw input as the host delivers it.
/// The window backend (minifb) only produces the mouse variants; the touch
/// variants are fed by hosts with a touch source and by tests.
#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    MouseDown(MouseEvent),
    MouseMove(MouseEvent),
    MouseUp,
    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd,
}

/// Normalized pen input in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
}

impl TouchEvent {
    /// The single contact, or `None` for multi-finger (or empty) events.
    fn single(&self) -> Option<&TouchPoint> {
        match self.touches.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Map a device event onto the pen. Multi-touch yields `None` and is dropped.
pub fn normalize(event: &DeviceEvent, offset: SurfaceOffset) -> Option<PointerEvent> {
    match event {
        DeviceEvent::MouseDown(m) => Some(PointerEvent::Down(m.local())),
        DeviceEvent::MouseMove(m) => Some(PointerEvent::Move(m.local())),
        DeviceEvent::MouseUp | DeviceEvent::TouchEnd => Some(PointerEvent::Up),
        DeviceEvent::TouchStart(t) => {
            t.single().map(|p| PointerEvent::Down(offset.to_local(p.page_x, p.page_y)))
        }
        DeviceEvent::TouchMove(t) => {
            t.single().map(|p| PointerEvent::Move(offset.to_local(p.page_x, p.page_y)))
        }
    }
}
