mod events;
mod gesture;
mod overlay;
mod roi;
mod surface;
mod transform;
mod viewer;

#[cfg(test)]
mod tests;

pub use events::{PointerEvent, PointerEventKind};
pub use gesture::{GestureCapture, GestureOutcome, GestureState};
pub use overlay::OverlaySync;
pub use roi::{RoiRecord, RoiStore};
pub use surface::{MemorySurface, Overlay, OverlayId, OverlayStyle, Surface};
pub use transform::{
    Camera, MAX_ZOOM, MIN_ZOOM, ZOOM_LEVELS, ZoomStep, to_pixel, to_viewport, zoom_level_down,
    zoom_level_up,
};
pub use viewer::Viewer;
