use crate::model::{PixelRect, Prediction, Segmentation};

#[derive(Debug, Clone, PartialEq)]
pub struct RoiRecord {
    key: u64,
    pub rect: PixelRect,
    pub segmentation: Option<Segmentation>,
    pub label: Option<String>,
    pub prediction: Option<Prediction>,
}

impl RoiRecord {
    /// Session-unique key; unlike the position it survives removals of other ROIs.
    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn parsed_label(&self) -> Option<i64> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(|text| text.parse().ok())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoiStore {
    records: Vec<RoiRecord>,
    next_key: u64,
    version: u64,
}

impl RoiStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_key(&mut self) -> u64 {
        self.next_key = self.next_key.saturating_add(1);
        self.next_key
    }

    fn touch(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    pub fn add(&mut self, rect: PixelRect) -> Option<usize> {
        if !rect.has_area() {
            log::debug!("ignoring ROI without area: {rect}");
            return None;
        }
        let key = self.next_key();
        self.records.push(RoiRecord {
            key,
            rect,
            segmentation: None,
            label: None,
            prediction: None,
        });
        self.touch();
        Some(self.records.len() - 1)
    }

    pub fn add_manual(&mut self, x: i64, y: i64, width: i64, height: i64) -> Option<usize> {
        self.add(PixelRect::new(x, y, width, height))
    }

    pub fn remove(&mut self, index: usize) -> Option<RoiRecord> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.records.clear();
            self.touch();
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RoiRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoiRecord> {
        self.records.iter()
    }

    pub fn rects(&self) -> Vec<PixelRect> {
        self.records.iter().map(|record| record.rect).collect()
    }

    pub fn position_of_key(&self, key: u64) -> Option<usize> {
        self.records.iter().position(|record| record.key == key)
    }

    pub fn set_label(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.label = Some(text.into());
                true
            }
            None => false,
        }
    }

    /// Stores batch results in ROI order, resets every label to `0` and drops
    /// predictions made against earlier results.
    pub(crate) fn apply_segmentations(&mut self, results: Vec<Segmentation>) {
        for (record, segmentation) in self.records.iter_mut().zip(results) {
            record.segmentation = Some(segmentation);
            record.label = Some("0".to_string());
            record.prediction = None;
        }
    }

    pub(crate) fn set_prediction(&mut self, index: usize, prediction: Prediction) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.prediction = Some(prediction);
                true
            }
            None => false,
        }
    }

    pub fn segmentation_results(&self) -> Vec<Option<&Segmentation>> {
        self.parallel(|record| record.segmentation.as_ref())
    }

    pub fn labels(&self) -> Vec<Option<&str>> {
        self.parallel(|record| record.label.as_deref())
    }

    pub fn predictions(&self) -> Vec<Option<&Prediction>> {
        self.parallel(|record| record.prediction.as_ref())
    }

    fn parallel<'a, T: ?Sized>(
        &'a self,
        field: impl Fn(&'a RoiRecord) -> Option<&'a T>,
    ) -> Vec<Option<&'a T>> {
        let values = self.records.iter().map(field).collect::<Vec<_>>();
        if values.iter().all(Option::is_none) {
            Vec::new()
        } else {
            values
        }
    }
}
