use crate::model::ImageSource;

use super::events::PointerEvent;
use super::gesture::{GestureCapture, GestureOutcome};
use super::overlay::OverlaySync;
use super::roi::RoiStore;
use super::surface::Surface;

/// A surface bound to one active image source.
///
/// Built when a source becomes active and torn down with [`Viewer::close`]
/// whenever the source changes, so overlays and gestures never see stale
/// dimensions.
#[derive(Debug)]
pub struct Viewer<S: Surface> {
    surface: S,
    source: ImageSource,
    gesture: GestureCapture,
    overlays: OverlaySync,
    draw_mode: bool,
}

impl<S: Surface> Viewer<S> {
    pub fn open(mut surface: S, source: ImageSource, store: &RoiStore) -> Self {
        surface.set_native_navigation(true);
        let mut viewer = Self {
            surface,
            source,
            gesture: GestureCapture::new(),
            overlays: OverlaySync::new(),
            draw_mode: false,
        };
        viewer.refresh(store);
        log::info!(
            "viewer opened on {}x{} source",
            source.width(),
            source.height()
        );
        viewer
    }

    /// Removes every overlay this viewer drew and hands the surface back.
    pub fn close(mut self) -> S {
        self.gesture.reset(&mut self.surface);
        self.overlays.clear(&mut self.surface);
        self.surface
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    pub fn gesture(&self) -> &GestureCapture {
        &self.gesture
    }

    /// Switches between drawing and native navigation. The two never run at once.
    pub fn set_draw_mode(&mut self, enabled: bool) {
        if self.draw_mode == enabled {
            return;
        }
        self.gesture.reset(&mut self.surface);
        self.draw_mode = enabled;
        self.surface.set_native_navigation(!enabled);
        log::debug!("draw mode {}", if enabled { "on" } else { "off" });
    }

    /// Routes one pointer event to either gesture capture or native navigation,
    /// committing finished rectangles into `store`.
    pub fn handle_pointer(&mut self, event: &PointerEvent, store: &mut RoiStore) -> GestureOutcome {
        if !self.draw_mode {
            let moved = self.surface.handle_native(event);
            if moved {
                self.refresh(store);
            }
            return GestureOutcome::Forwarded { moved };
        }

        let outcome = self.gesture.handle(event, &self.source, &mut self.surface);
        if let GestureOutcome::Completed(rect) = outcome {
            if let Some(index) = store.add(rect) {
                log::info!("added ROI {}: {rect}", index + 1);
            }
            self.refresh(store);
        }
        outcome
    }

    /// Redraws every ROI overlay from the store. Safe to call at any time.
    pub fn refresh(&mut self, store: &RoiStore) {
        self.overlays.sync(store, &self.source, &mut self.surface);
    }
}
