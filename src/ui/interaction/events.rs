use crate::model::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    Press,
    Drag,
    Release,
    /// Wheel motion; positive values zoom in.
    Scroll { delta: f64 },
    DoubleClick,
}

/// Low-level pointer input delivered by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: ScreenPoint,
}

impl PointerEvent {
    pub fn press(x: f64, y: f64) -> Self {
        Self::at(PointerEventKind::Press, x, y)
    }

    pub fn drag(x: f64, y: f64) -> Self {
        Self::at(PointerEventKind::Drag, x, y)
    }

    pub fn release(x: f64, y: f64) -> Self {
        Self::at(PointerEventKind::Release, x, y)
    }

    pub fn scroll(x: f64, y: f64, delta: f64) -> Self {
        Self::at(PointerEventKind::Scroll { delta }, x, y)
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::at(PointerEventKind::DoubleClick, x, y)
    }

    fn at(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: ScreenPoint::new(x, y),
        }
    }
}
