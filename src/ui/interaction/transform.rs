use crate::model::{ImageSource, PixelRect, ScreenPoint, ViewportPoint, ViewportRect};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 64.0;

pub const ZOOM_LEVELS: [f64; 15] = [
    0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 16.0, 24.0, 32.0, 48.0, 64.0,
];

pub fn to_pixel(source: &ImageSource, rect: &ViewportRect) -> PixelRect {
    let width = f64::from(source.width());
    let height = f64::from(source.height());
    PixelRect::new(
        (rect.x * width).round() as i64,
        (rect.y * height).round() as i64,
        (rect.width * width).round() as i64,
        (rect.height * height).round() as i64,
    )
}

pub fn to_viewport(source: &ImageSource, rect: &PixelRect) -> ViewportRect {
    let width = f64::from(source.width());
    let height = f64::from(source.height());
    ViewportRect::new(
        rect.x as f64 / width,
        rect.y as f64 / height,
        rect.width as f64 / width,
        rect.height as f64 / height,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub zoom: f64,
    pub center: ViewportPoint,
}

impl Camera {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            canvas_width: canvas_width.max(1.0),
            canvas_height: canvas_height.max(1.0),
            zoom: 1.0,
            center: ViewportPoint::new(0.5, 0.5),
        }
    }

    pub fn home(&mut self) {
        self.zoom = 1.0;
        self.center = ViewportPoint::new(0.5, 0.5);
    }

    pub fn screen_to_viewport(&self, screen: ScreenPoint) -> ViewportPoint {
        let u = screen.x / self.canvas_width - 0.5;
        let v = screen.y / self.canvas_height - 0.5;
        ViewportPoint::new(self.center.x + u / self.zoom, self.center.y + v / self.zoom)
    }

    pub fn viewport_to_screen(&self, point: ViewportPoint) -> ScreenPoint {
        ScreenPoint::new(
            ((point.x - self.center.x) * self.zoom + 0.5) * self.canvas_width,
            ((point.y - self.center.y) * self.zoom + 0.5) * self.canvas_height,
        )
    }

    pub fn rect_to_screen(&self, rect: &ViewportRect) -> (ScreenPoint, ScreenPoint) {
        (
            self.viewport_to_screen(ViewportPoint::new(rect.x, rect.y)),
            self.viewport_to_screen(ViewportPoint::new(
                rect.x + rect.width,
                rect.y + rect.height,
            )),
        )
    }

    pub fn zoom_step_at(&mut self, step: ZoomStep, anchor: ScreenPoint) {
        let next = match step {
            ZoomStep::In => zoom_level_up(self.zoom),
            ZoomStep::Out => zoom_level_down(self.zoom),
        };
        self.set_zoom_at(anchor, next);
    }

    /// Changes zoom while keeping the viewport point under `anchor` fixed on screen.
    pub fn set_zoom_at(&mut self, anchor: ScreenPoint, next_zoom: f64) {
        let next_zoom = next_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let anchored = self.screen_to_viewport(anchor);
        let u = anchor.x / self.canvas_width - 0.5;
        let v = anchor.y / self.canvas_height - 0.5;
        self.zoom = next_zoom;
        self.center = ViewportPoint::new(anchored.x - u / next_zoom, anchored.y - v / next_zoom);
        self.clamp_center();
    }

    pub fn pan_by_screen_delta(&mut self, dx: f64, dy: f64) {
        self.center.x -= dx / (self.canvas_width * self.zoom);
        self.center.y -= dy / (self.canvas_height * self.zoom);
        self.clamp_center();
    }

    fn clamp_center(&mut self) {
        self.center.x = self.center.x.clamp(0.0, 1.0);
        self.center.y = self.center.y.clamp(0.0, 1.0);
    }
}

pub fn zoom_level_down(current: f64) -> f64 {
    let mut next = ZOOM_LEVELS[0];
    for level in ZOOM_LEVELS {
        if level < current {
            next = level;
        } else {
            break;
        }
    }
    next
}

pub fn zoom_level_up(current: f64) -> f64 {
    let mut next = ZOOM_LEVELS[ZOOM_LEVELS.len() - 1];
    for level in ZOOM_LEVELS.iter().rev().copied() {
        if level > current {
            next = level;
        } else {
            break;
        }
    }
    next
}
