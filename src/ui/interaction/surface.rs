use std::collections::BTreeMap;
use std::fmt;

use crate::model::{ScreenPoint, ViewportPoint, ViewportRect};

use super::events::{PointerEvent, PointerEventKind};
use super::transform::{Camera, ZoomStep};

/// Identifier of an overlay drawn on the surface.
///
/// Committed ROIs and the drag candidate use disjoint names, so overlay sync and
/// gesture capture never touch each other's overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlayId {
    Roi(usize),
    Candidate,
}

impl fmt::Display for OverlayId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roi(index) => write!(formatter, "roi-rectangle-{index}"),
            Self::Candidate => formatter.write_str("roi-rectangle-temp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStyle {
    Committed,
    Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub location: ViewportRect,
    pub style: OverlayStyle,
}

/// The deep-zoom renderer as seen by the annotation engine.
pub trait Surface {
    fn pointer_to_viewport(&self, position: ScreenPoint) -> ViewportPoint;

    /// Enables or disables the renderer's own click/drag/scroll navigation.
    fn set_native_navigation(&mut self, enabled: bool);

    fn native_navigation(&self) -> bool;

    /// Lets the renderer interpret `event` as pan/zoom. Returns whether the
    /// visible region changed.
    fn handle_native(&mut self, event: &PointerEvent) -> bool;

    fn add_overlay(&mut self, overlay: Overlay);

    fn remove_overlay(&mut self, id: OverlayId);

    /// Points the renderer at a new raster image. Any size known for the
    /// previous image is forgotten.
    fn load_raster(&mut self, url: &str);

    /// Full-resolution size of the raster last passed to `load_raster`, once
    /// the renderer has decoded it.
    fn content_size(&self) -> Option<(u32, u32)>;
}

/// Headless surface that keeps overlays in memory and navigates with a [`Camera`].
#[derive(Debug, Clone)]
pub struct MemorySurface {
    camera: Camera,
    overlays: BTreeMap<OverlayId, Overlay>,
    native_navigation: bool,
    raster_sizes: BTreeMap<String, (u32, u32)>,
    raster: Option<String>,
    last_pointer: Option<ScreenPoint>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl MemorySurface {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            camera: Camera::new(canvas_width, canvas_height),
            overlays: BTreeMap::new(),
            native_navigation: true,
            raster_sizes: BTreeMap::new(),
            raster: None,
            last_pointer: None,
        }
    }

    /// Size this surface reports once `url` has been loaded.
    pub fn with_raster(mut self, url: impl Into<String>, width: u32, height: u32) -> Self {
        self.raster_sizes.insert(url.into(), (width, height));
        self
    }

    pub fn loaded_raster(&self) -> Option<&str> {
        self.raster.as_deref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Where an overlay currently appears on screen, as `(top-left, bottom-right)`.
    pub fn screen_placement(&self, id: OverlayId) -> Option<(ScreenPoint, ScreenPoint)> {
        self.overlays
            .get(&id)
            .map(|overlay| self.camera.rect_to_screen(&overlay.location))
    }
}

impl Surface for MemorySurface {
    fn pointer_to_viewport(&self, position: ScreenPoint) -> ViewportPoint {
        self.camera.screen_to_viewport(position)
    }

    fn set_native_navigation(&mut self, enabled: bool) {
        self.native_navigation = enabled;
        self.last_pointer = None;
    }

    fn native_navigation(&self) -> bool {
        self.native_navigation
    }

    fn handle_native(&mut self, event: &PointerEvent) -> bool {
        if !self.native_navigation {
            return false;
        }
        match event.kind {
            PointerEventKind::Press => {
                self.last_pointer = Some(event.position);
                false
            }
            PointerEventKind::Drag => {
                let Some(last) = self.last_pointer.replace(event.position) else {
                    return false;
                };
                let (dx, dy) = (event.position.x - last.x, event.position.y - last.y);
                let before = self.camera.center;
                self.camera.pan_by_screen_delta(dx, dy);
                self.camera.center != before
            }
            PointerEventKind::Release => {
                self.last_pointer = None;
                false
            }
            PointerEventKind::Scroll { delta } => {
                let step = if delta > 0.0 {
                    ZoomStep::In
                } else if delta < 0.0 {
                    ZoomStep::Out
                } else {
                    return false;
                };
                let before = self.camera.zoom;
                self.camera.zoom_step_at(step, event.position);
                (self.camera.zoom - before).abs() > f64::EPSILON
            }
            PointerEventKind::DoubleClick => {
                let before = self.camera.zoom;
                self.camera.zoom_step_at(ZoomStep::In, event.position);
                (self.camera.zoom - before).abs() > f64::EPSILON
            }
        }
    }

    fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.insert(overlay.id, overlay);
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn load_raster(&mut self, url: &str) {
        self.raster = Some(url.to_string());
    }

    fn content_size(&self) -> Option<(u32, u32)> {
        let url = self.raster.as_ref()?;
        self.raster_sizes.get(url).copied()
    }
}
