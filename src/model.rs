mod error;
mod format;
mod process;
mod rect;
mod sample;
mod source;

#[cfg(test)]
mod tests;

pub use error::{ModelError, Result};
pub use format::{PYRAMIDAL_EXTENSIONS, RASTER_EXTENSIONS, SlideFormat, supported_extensions};
pub use process::{DEFAULT_MANUAL_THRESHOLD, MorphOp, MorphOps, ProcessConfig, Threshold};
pub use rect::{
    CoordinateSpace, PixelRect, PixelSpace, Rect, ScreenPoint, ViewportPoint, ViewportRect,
    ViewportSpace,
};
pub use sample::{Prediction, RgbSample, Segmentation, decode_mask};
pub use source::ImageSource;
