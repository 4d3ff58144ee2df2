use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Marker for the coordinate system a [`Rect`] lives in.
pub trait CoordinateSpace: Copy + fmt::Debug + PartialEq + Default {
    type Scalar: Copy + fmt::Debug + PartialEq + PartialOrd + Default;
    const NAME: &'static str;
}

/// Continuous, zoom-independent coordinates used by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSpace;

/// Integer pixel coordinates of the full-resolution source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelSpace;

impl CoordinateSpace for ViewportSpace {
    type Scalar = f64;
    const NAME: &'static str = "viewport";
}

impl CoordinateSpace for PixelSpace {
    type Scalar = i64;
    const NAME: &'static str = "pixel";
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewportPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position in surface (screen) pixels, relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct Rect<S: CoordinateSpace> {
    pub x: S::Scalar,
    pub y: S::Scalar,
    pub width: S::Scalar,
    pub height: S::Scalar,
    space: PhantomData<S>,
}

pub type ViewportRect = Rect<ViewportSpace>;
pub type PixelRect = Rect<PixelSpace>;

impl<S: CoordinateSpace> Rect<S> {
    pub fn new(x: S::Scalar, y: S::Scalar, width: S::Scalar, height: S::Scalar) -> Self {
        Self {
            x,
            y,
            width,
            height,
            space: PhantomData,
        }
    }

    /// True when both sides are strictly positive; only such rects may be committed.
    pub fn has_area(&self) -> bool {
        let zero = S::Scalar::default();
        self.width > zero && self.height > zero
    }
}

impl<S: CoordinateSpace> fmt::Debug for Rect<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct(S::NAME)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ViewportRect {
    /// Builds the rectangle spanned by two corners in any order.
    pub fn from_corners(start: ViewportPoint, end: ViewportPoint) -> Self {
        Self::new(
            start.x.min(end.x),
            start.y.min(end.y),
            (end.x - start.x).abs(),
            (end.y - start.y).abs(),
        )
    }
}

impl PixelRect {
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "x={}, y={}, w={}, h={}",
            self.x, self.y, self.width, self.height
        )
    }
}
