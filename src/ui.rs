pub mod interaction;

pub use interaction::{
    Camera, GestureCapture, GestureOutcome, GestureState, MemorySurface, Overlay, OverlayId,
    OverlayStyle, OverlaySync, PointerEvent, PointerEventKind, RoiRecord, RoiStore, Surface,
    Viewer, ZoomStep, to_pixel, to_viewport,
};
