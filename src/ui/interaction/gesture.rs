use crate::model::{ImageSource, PixelRect, ViewportPoint, ViewportRect};

use super::events::{PointerEvent, PointerEventKind};
use super::surface::{Overlay, OverlayId, OverlayStyle, Surface};
use super::transform::to_pixel;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        start: ViewportPoint,
        candidate: ViewportRect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Draw mode is off; the surface handled the event as navigation.
    Forwarded { moved: bool },
    Started(ViewportPoint),
    Updated(ViewportRect),
    /// A finished rectangle with area, ready to be committed.
    Completed(PixelRect),
    /// A finished rectangle without area; nothing is committed.
    Discarded(PixelRect),
    Ignored,
}

/// Press/drag/release state machine for drawing one rectangle at a time.
///
/// The machine owns all drag state; callbacks receive it explicitly instead of
/// capturing it.
#[derive(Debug, Clone, Default)]
pub struct GestureCapture {
    state: GestureState,
}

impl GestureCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Handles one pointer event while draw mode is active.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        source: &ImageSource,
        surface: &mut dyn Surface,
    ) -> GestureOutcome {
        match (event.kind, self.state) {
            (PointerEventKind::Press, state) => {
                if matches!(state, GestureState::Dragging { .. }) {
                    log::debug!("press while dragging; restarting the drag");
                }
                let start = surface.pointer_to_viewport(event.position);
                let candidate = ViewportRect::from_corners(start, start);
                self.state = GestureState::Dragging { start, candidate };
                draw_candidate(surface, candidate);
                GestureOutcome::Started(start)
            }
            (PointerEventKind::Drag, GestureState::Dragging { start, .. }) => {
                let current = surface.pointer_to_viewport(event.position);
                let candidate = ViewportRect::from_corners(start, current);
                self.state = GestureState::Dragging { start, candidate };
                draw_candidate(surface, candidate);
                GestureOutcome::Updated(candidate)
            }
            (PointerEventKind::Release, GestureState::Dragging { start, .. }) => {
                self.state = GestureState::Idle;
                surface.remove_overlay(OverlayId::Candidate);
                let end = surface.pointer_to_viewport(event.position);
                let rect = to_pixel(source, &ViewportRect::from_corners(start, end));
                if rect.has_area() {
                    GestureOutcome::Completed(rect)
                } else {
                    log::warn!("discarding ROI with non-positive width or height: {rect}");
                    GestureOutcome::Discarded(rect)
                }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Abandons any drag in progress and removes its candidate overlay.
    pub fn reset(&mut self, surface: &mut dyn Surface) {
        if self.is_dragging() {
            surface.remove_overlay(OverlayId::Candidate);
        }
        self.state = GestureState::Idle;
    }
}

fn draw_candidate(surface: &mut dyn Surface, location: ViewportRect) {
    surface.remove_overlay(OverlayId::Candidate);
    surface.add_overlay(Overlay {
        id: OverlayId::Candidate,
        location,
        style: OverlayStyle::Candidate,
    });
}
