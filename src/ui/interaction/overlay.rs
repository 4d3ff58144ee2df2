use crate::model::ImageSource;

use super::roi::RoiStore;
use super::surface::{Overlay, OverlayId, OverlayStyle, Surface};
use super::transform::to_viewport;

#[derive(Debug, Clone, Default)]
pub struct OverlaySync {
    drawn: usize,
}

impl OverlaySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn sync(&mut self, store: &RoiStore, source: &ImageSource, surface: &mut dyn Surface) {
        self.clear(surface);
        for (index, record) in store.iter().enumerate() {
            surface.add_overlay(Overlay {
                id: OverlayId::Roi(index),
                location: to_viewport(source, &record.rect),
                style: OverlayStyle::Committed,
            });
        }
        self.drawn = store.len();
        log::debug!("synced {} ROI overlays", self.drawn);
    }

    pub fn clear(&mut self, surface: &mut dyn Surface) {
        for index in 0..self.drawn {
            surface.remove_overlay(OverlayId::Roi(index));
        }
        self.drawn = 0;
    }
}
