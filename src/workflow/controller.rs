use std::mem;
use std::path::Path;

use crate::client::{self, ClientError, ProcessRequest, RemoteService, TrainedModel};
use crate::model::{
    ImageSource, PixelRect, Prediction, ProcessConfig, RgbSample, Segmentation, SlideFormat,
};
use crate::ui::{GestureOutcome, MemorySurface, PointerEvent, RoiRecord, Surface, Viewer};

use super::form::ManualRoiForm;
use super::io;
use super::report::{RoiReport, RunReport, StageReport};
use super::session::RoiSession;
use super::state::{SourceState, WorkflowState};
use super::{Result, StageBoard, StageKind, WorkflowError};

#[derive(Debug)]
enum SurfaceSlot<S: Surface> {
    Detached,
    Parked(S),
    Open(Viewer<S>),
}

#[derive(Debug, Clone)]
pub struct BatchTicket {
    sequence: u64,
    version: u64,
    request: ProcessRequest,
}

impl BatchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn request(&self) -> &ProcessRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Applied(usize),
    /// The ROIs changed, or a newer batch was requested; nothing was stored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct PredictTicket {
    key: u64,
    model_id: String,
    rgb: Vec<RgbSample>,
}

impl PredictTicket {
    pub fn roi_key(&self) -> u64 {
        self.key
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn samples(&self) -> &[RgbSample] {
        &self.rgb
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictOutcome {
    Stored(usize),
    Dropped,
}

/// Drives upload, tiling, ROI entry, processing, training and prediction
/// against a [`RemoteService`], owning all session state.
pub struct WorkflowController<R: RemoteService, S: Surface = MemorySurface> {
    service: R,
    state: WorkflowState,
    stages: StageBoard,
    config: ProcessConfig,
    surface: SurfaceSlot<S>,
    batch_sequence: u64,
}

impl<R: RemoteService, S: Surface> WorkflowController<R, S> {
    pub fn new(service: R) -> Self {
        Self {
            service,
            state: WorkflowState::default(),
            stages: StageBoard::new(),
            config: ProcessConfig::default(),
            surface: SurfaceSlot::Detached,
            batch_sequence: 0,
        }
    }

    pub fn service(&self) -> &R {
        &self.service
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stages(&self) -> &StageBoard {
        &self.stages
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ProcessConfig) {
        self.config = config;
    }

    pub fn config_mut(&mut self) -> &mut ProcessConfig {
        &mut self.config
    }

    pub fn viewer(&self) -> Option<&Viewer<S>> {
        match &self.surface {
            SurfaceSlot::Open(viewer) => Some(viewer),
            SurfaceSlot::Detached | SurfaceSlot::Parked(_) => None,
        }
    }

    fn surface_ref(&self) -> Option<&S> {
        match &self.surface {
            SurfaceSlot::Detached => None,
            SurfaceSlot::Parked(surface) => Some(surface),
            SurfaceSlot::Open(viewer) => Some(viewer.surface()),
        }
    }

    fn surface_mut(&mut self) -> Option<&mut S> {
        match &mut self.surface {
            SurfaceSlot::Detached => None,
            SurfaceSlot::Parked(surface) => Some(surface),
            SurfaceSlot::Open(viewer) => Some(viewer.surface_mut()),
        }
    }

    fn reject(&mut self, kind: StageKind, error: WorkflowError) -> WorkflowError {
        self.stages.fail(kind, error.to_string());
        error
    }

    // Surface lifecycle.

    /// Attaches a rendering surface, opening a viewer right away when an image
    /// source is active. Returns the previously attached surface.
    pub fn attach_surface(&mut self, mut surface: S) -> Option<S> {
        let previous = self.detach_surface();
        self.surface = match &self.state.source {
            SourceState::Ready(source) => {
                SurfaceSlot::Open(Viewer::open(surface, *source, &self.state.rois))
            }
            SourceState::AwaitingRaster { url } => {
                surface.load_raster(url);
                SurfaceSlot::Parked(surface)
            }
            SourceState::Unset => SurfaceSlot::Parked(surface),
        };
        previous
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        match mem::replace(&mut self.surface, SurfaceSlot::Detached) {
            SurfaceSlot::Detached => None,
            SurfaceSlot::Parked(surface) => Some(surface),
            SurfaceSlot::Open(viewer) => Some(viewer.close()),
        }
    }

    fn close_viewer(&mut self) {
        self.surface = match mem::replace(&mut self.surface, SurfaceSlot::Detached) {
            SurfaceSlot::Open(viewer) => SurfaceSlot::Parked(viewer.close()),
            other => other,
        };
    }

    fn activate_source(&mut self, source: ImageSource) {
        self.close_viewer();
        self.state.source = SourceState::Ready(source);
        self.surface = match mem::replace(&mut self.surface, SurfaceSlot::Detached) {
            SurfaceSlot::Parked(surface) => {
                SurfaceSlot::Open(Viewer::open(surface, source, &self.state.rois))
            }
            other => other,
        };
        log::info!(
            "active source is {} {}x{}",
            if source.is_tiled() { "tiled" } else { "raster" },
            source.width(),
            source.height()
        );
    }

    // Upload and tiling.

    /// Uploads `file` and, for pyramidal formats, tiles it and activates the
    /// tiled source. Raster uploads wait for their dimensions, see
    /// [`Self::on_raster_loaded`] and [`Self::resolve_raster_source`].
    pub fn upload(&mut self, file: &Path) -> Result<()> {
        let format = match SlideFormat::from_path(file) {
            Ok(format) => format,
            Err(error) => return Err(self.reject(StageKind::Upload, error.into())),
        };

        self.stages.begin(StageKind::Upload);
        let previous_progress = self.state.upload_progress;
        let service = &self.service;
        let progress = &mut self.state.upload_progress;
        let uploaded = service.upload(file, &mut |percent| {
            *progress = percent;
            log::debug!("upload {percent}%");
        });
        let image_path = match uploaded {
            Ok(image_path) => image_path,
            Err(error) => {
                self.state.upload_progress = previous_progress;
                self.stages.fail(StageKind::Upload, format!("upload failed: {error}"));
                return Err(error.into());
            }
        };

        self.close_viewer();
        self.state.reset_image();
        self.state.upload_progress = 100;
        self.state.image_path = Some(image_path.clone());
        self.stages.succeed(StageKind::Upload);
        log::info!("uploaded {} as {image_path}", file.display());

        if format.needs_tiling() {
            return self.tile(&image_path);
        }

        let url = self.service.raster_url(&image_path);
        if let Some(surface) = self.surface_mut() {
            surface.load_raster(&url);
        }
        self.state.source = SourceState::AwaitingRaster { url };
        if let Some((width, height)) = self.surface_ref().and_then(|surface| surface.content_size()) {
            self.on_raster_loaded(width, height)?;
        }
        Ok(())
    }

    fn tile(&mut self, image_path: &str) -> Result<()> {
        self.stages.begin(StageKind::Tile);
        match self.fetch_tiled_source(image_path) {
            Ok((manifest_url, source)) => {
                self.state.manifest_url = Some(manifest_url);
                self.stages.succeed(StageKind::Tile);
                self.activate_source(source);
                Ok(())
            }
            Err(error) => {
                self.stages.fail(StageKind::Tile, format!("tiling failed: {error}"));
                Err(error)
            }
        }
    }

    fn fetch_tiled_source(&self, image_path: &str) -> Result<(String, ImageSource)> {
        let manifest_url = self.service.tile(image_path)?;
        let manifest = self.service.fetch_manifest(&manifest_url)?;
        let source = ImageSource::tiled(manifest.width, manifest.height)?;
        Ok((manifest_url, source))
    }

    pub fn on_raster_loaded(&mut self, width: u32, height: u32) -> Result<()> {
        match &self.state.source {
            SourceState::Unset => return Err(WorkflowError::NoImage),
            SourceState::Ready(source) if source.is_tiled() => {
                log::warn!("ignoring raster size {width}x{height} for a tiled image");
                return Ok(());
            }
            SourceState::Ready(source) if (source.width(), source.height()) == (width, height) => {
                return Ok(());
            }
            SourceState::Ready(_) | SourceState::AwaitingRaster { .. } => {}
        }
        let source = ImageSource::raster(width, height)?;
        self.activate_source(source);
        Ok(())
    }

    /// Makes sure a source is active, asking the surface or, failing that,
    /// the service for the raster's dimensions.
    pub fn resolve_raster_source(&mut self) -> Result<ImageSource> {
        match &self.state.source {
            SourceState::Ready(source) => return Ok(*source),
            SourceState::Unset => return Err(WorkflowError::NoImage),
            SourceState::AwaitingRaster { .. } => {}
        }
        let dimensions = match self.surface_ref().and_then(|surface| surface.content_size()) {
            Some(dimensions) => dimensions,
            None => {
                let image_path = self.state.image_path.as_deref().ok_or(WorkflowError::NoImage)?;
                self.service.fetch_raster_dimensions(image_path)?
            }
        };
        self.on_raster_loaded(dimensions.0, dimensions.1)?;
        self.state
            .source
            .ready()
            .copied()
            .ok_or(WorkflowError::SourceNotReady)
    }

    // ROI entry.

    pub fn set_draw_mode(&mut self, enabled: bool) -> Result<()> {
        match &mut self.surface {
            SurfaceSlot::Open(viewer) => {
                viewer.set_draw_mode(enabled);
                Ok(())
            }
            SurfaceSlot::Detached | SurfaceSlot::Parked(_) => Err(WorkflowError::ViewerNotReady),
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Result<GestureOutcome> {
        match &mut self.surface {
            SurfaceSlot::Open(viewer) => Ok(viewer.handle_pointer(event, &mut self.state.rois)),
            SurfaceSlot::Detached | SurfaceSlot::Parked(_) => Err(WorkflowError::ViewerNotReady),
        }
    }

    fn refresh_overlays(&mut self) {
        if let SurfaceSlot::Open(viewer) = &mut self.surface {
            viewer.refresh(&self.state.rois);
        }
    }

    pub fn add_roi(&mut self, rect: PixelRect) -> Option<usize> {
        let index = self.state.rois.add(rect)?;
        if let Some(source) = self.state.source.ready() {
            if !source.contains(&rect) {
                log::warn!("ROI {} ({rect}) extends beyond the image", index + 1);
            }
        }
        log::info!("added ROI {}: {rect}", index + 1);
        self.refresh_overlays();
        Some(index)
    }

    pub fn add_manual_roi(&mut self, x: i64, y: i64, width: i64, height: i64) -> Option<usize> {
        self.add_roi(PixelRect::new(x, y, width, height))
    }

    /// Adds the form's rectangle and clears the form. Incomplete forms are left as is.
    pub fn submit_form(&mut self, form: &mut ManualRoiForm) -> Option<usize> {
        let index = self.add_roi(form.rect()?)?;
        form.clear();
        Some(index)
    }

    pub fn remove_roi(&mut self, index: usize) -> Option<RoiRecord> {
        let removed = self.state.rois.remove(index)?;
        log::info!("removed ROI {}: {}", index + 1, removed.rect);
        self.refresh_overlays();
        Some(removed)
    }

    pub fn clear_rois(&mut self) {
        self.state.rois.clear();
        self.refresh_overlays();
    }

    // Processing.

    pub fn process_single(&mut self, index: usize) -> Result<String> {
        let Some(image_path) = self.state.image_path.clone() else {
            return Err(self.reject(StageKind::ProcessSingle, WorkflowError::NoImage));
        };
        let Some(rect) = self.state.rois.get(index).map(|record| record.rect) else {
            return Err(self.reject(StageKind::ProcessSingle, WorkflowError::UnknownRoi(index)));
        };

        self.stages.begin(StageKind::ProcessSingle);
        match self.service.process_region(&image_path, rect, &self.config) {
            Ok(mask) => {
                self.state.single_result = Some(mask.clone());
                self.stages.succeed(StageKind::ProcessSingle);
                Ok(mask)
            }
            Err(error) => {
                self.stages
                    .fail(StageKind::ProcessSingle, format!("processing failed: {error}"));
                Err(error.into())
            }
        }
    }

    pub fn begin_batch(&mut self) -> Result<BatchTicket> {
        let Some(image_path) = self.state.image_path.clone() else {
            return Err(self.reject(StageKind::ProcessBatch, WorkflowError::NoImage));
        };
        if self.state.rois.is_empty() {
            return Err(self.reject(StageKind::ProcessBatch, WorkflowError::NoRois));
        }
        self.stages.begin(StageKind::ProcessBatch);
        self.batch_sequence = self.batch_sequence.saturating_add(1);
        Ok(BatchTicket {
            sequence: self.batch_sequence,
            version: self.state.rois.version(),
            request: ProcessRequest {
                image_path,
                rects: self.state.rois.rects(),
                config: self.config.clone(),
            },
        })
    }

    /// Applies a batch response, unless a newer batch was requested or the
    /// ROIs changed since `ticket` was issued.
    pub fn finish_batch(
        &mut self,
        ticket: BatchTicket,
        response: client::Result<Vec<Segmentation>>,
    ) -> Result<BatchOutcome> {
        if ticket.sequence != self.batch_sequence {
            log::warn!(
                "dropping batch response {} superseded by {}",
                ticket.sequence,
                self.batch_sequence
            );
            return Ok(BatchOutcome::Stale);
        }
        let results = match response {
            Ok(results) => results,
            Err(error) => {
                self.stages
                    .fail(StageKind::ProcessBatch, format!("processing failed: {error}"));
                return Err(error.into());
            }
        };
        let current = self.state.rois.version();
        if ticket.version != current {
            self.stages.discard(
                StageKind::ProcessBatch,
                format!(
                    "ROIs changed while processing (version {} is now {current})",
                    ticket.version
                ),
            );
            return Ok(BatchOutcome::Stale);
        }
        let expected = self.state.rois.len();
        if results.len() != expected {
            let error = ClientError::ResultCount {
                expected,
                got: results.len(),
            };
            self.stages
                .fail(StageKind::ProcessBatch, format!("processing failed: {error}"));
            return Err(error.into());
        }
        let count = results.len();
        self.batch_sequence = self.batch_sequence.saturating_add(1);
        self.state.rois.apply_segmentations(results);
        self.stages.succeed(StageKind::ProcessBatch);
        Ok(BatchOutcome::Applied(count))
    }

    pub fn process_batch(&mut self) -> Result<BatchOutcome> {
        let ticket = self.begin_batch()?;
        let response = self.service.process_regions(ticket.request());
        self.finish_batch(ticket, response)
    }

    // Labels and training.

    pub fn set_label(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        if self.state.rois.set_label(index, text) {
            Ok(())
        } else {
            Err(WorkflowError::UnknownRoi(index))
        }
    }

    pub fn apply_labels(&mut self, labels: &[Option<&str>]) -> Result<()> {
        for (index, label) in labels.iter().enumerate() {
            if let Some(label) = label {
                self.set_label(index, *label)?;
            }
        }
        Ok(())
    }

    /// Samples and integer labels of every ROI, or the first reason training can't start.
    pub fn training_set(&self) -> Result<(Vec<Vec<RgbSample>>, Vec<i64>)> {
        if self.state.rois.is_empty() {
            return Err(WorkflowError::NoRois);
        }
        let mut rgb = Vec::with_capacity(self.state.rois.len());
        let mut labels = Vec::with_capacity(self.state.rois.len());
        for (index, record) in self.state.rois.iter().enumerate() {
            let label = record
                .parsed_label()
                .ok_or(WorkflowError::LabelsIncomplete { index })?;
            let segmentation = record
                .segmentation
                .as_ref()
                .ok_or(WorkflowError::NotSegmented(index))?;
            rgb.push(segmentation.rgb.clone());
            labels.push(label);
        }
        Ok((rgb, labels))
    }

    pub fn train(&mut self) -> Result<&TrainedModel> {
        let (rgb, labels) = match self.training_set() {
            Ok(set) => set,
            Err(error) => return Err(self.reject(StageKind::Train, error)),
        };

        self.stages.begin(StageKind::Train);
        match self.service.train(&rgb, &labels) {
            Ok(model) => {
                log::info!(
                    "trained model {} over {} epochs",
                    model.model_id,
                    model.loss_history.len()
                );
                self.stages.succeed(StageKind::Train);
                Ok(&*self.state.model.insert(model))
            }
            Err(error) => {
                self.stages.fail(StageKind::Train, format!("training failed: {error}"));
                Err(error.into())
            }
        }
    }

    pub fn loss_curve(&self) -> Vec<(usize, f64)> {
        self.state
            .loss_history()
            .iter()
            .enumerate()
            .map(|(epoch, loss)| (epoch + 1, *loss))
            .collect()
    }

    // Prediction.

    pub fn begin_predict(&mut self, index: usize) -> Result<PredictTicket> {
        let Some(model_id) = self.state.model_id().map(str::to_string) else {
            return Err(self.reject(StageKind::Predict, WorkflowError::ModelMissing));
        };
        let lookup = self
            .state
            .rois
            .get(index)
            .ok_or(WorkflowError::UnknownRoi(index))
            .and_then(|record| {
                record
                    .segmentation
                    .as_ref()
                    .map(|segmentation| (record.key(), segmentation.rgb.clone()))
                    .ok_or(WorkflowError::NotSegmented(index))
            });
        let (key, rgb) = match lookup {
            Ok(found) => found,
            Err(error) => return Err(self.reject(StageKind::Predict, error)),
        };
        self.stages.begin(StageKind::Predict);
        Ok(PredictTicket { key, model_id, rgb })
    }

    /// Stores a prediction on the ROI it was requested for, wherever it sits now.
    pub fn finish_predict(
        &mut self,
        ticket: PredictTicket,
        response: client::Result<Prediction>,
    ) -> Result<PredictOutcome> {
        let prediction = match response {
            Ok(prediction) => prediction,
            Err(error) => {
                self.stages
                    .fail(StageKind::Predict, format!("prediction failed: {error}"));
                return Err(error.into());
            }
        };
        let Some(index) = self.state.rois.position_of_key(ticket.key) else {
            self.stages
                .discard(StageKind::Predict, "ROI was removed before its prediction arrived");
            return Ok(PredictOutcome::Dropped);
        };
        self.state.rois.set_prediction(index, prediction);
        self.stages.succeed(StageKind::Predict);
        Ok(PredictOutcome::Stored(index))
    }

    pub fn predict(&mut self, index: usize) -> Result<PredictOutcome> {
        let ticket = self.begin_predict(index)?;
        let response = self.service.predict(ticket.model_id(), ticket.samples());
        self.finish_predict(ticket, response)
    }

    pub fn predict_all(&mut self) -> Result<usize> {
        let mut stored = 0;
        for index in 0..self.state.rois.len() {
            if let PredictOutcome::Stored(_) = self.predict(index)? {
                stored += 1;
            }
        }
        Ok(stored)
    }

    // Export and persistence.

    pub fn export_rgb(&self, index: usize, path: impl AsRef<Path>) -> Result<()> {
        let record = self
            .state
            .rois
            .get(index)
            .ok_or(WorkflowError::UnknownRoi(index))?;
        let segmentation = record
            .segmentation
            .as_ref()
            .ok_or(WorkflowError::NotSegmented(index))?;
        io::export_rgb(path, &segmentation.rgb)
    }

    pub fn save_single_result(&self, path: impl AsRef<Path>) -> Result<()> {
        let mask = self.state.single_result().ok_or(WorkflowError::NoResult)?;
        io::save_mask(path, mask)
    }

    pub fn session(&self) -> RoiSession {
        RoiSession::capture(self.state.image_path(), &self.state.rois)
    }

    /// Adds the session's ROIs and labels to the store. Returns how many ROIs were added.
    pub fn load_session(&mut self, session: &RoiSession) -> usize {
        if let (Some(saved), Some(current)) = (&session.image_path, self.state.image_path()) {
            if saved != current {
                log::warn!("session was saved for {saved}, current image is {current}");
            }
        }
        let mut added = 0;
        for roi in &session.rois {
            let Some(index) = self.state.rois.add(roi.rect()) else {
                log::warn!("skipping session ROI without area: {}", roi.rect());
                continue;
            };
            if let Some(label) = &roi.label {
                self.state.rois.set_label(index, label.clone());
            }
            added += 1;
        }
        log::info!("loaded {added} ROIs from session");
        self.refresh_overlays();
        added
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            image_path: self.state.image_path.clone(),
            manifest_url: self.state.manifest_url.clone(),
            stages: self
                .stages
                .iter()
                .map(|(stage, status)| StageReport {
                    stage,
                    status: status.clone(),
                })
                .collect(),
            rois: self
                .state
                .rois
                .iter()
                .enumerate()
                .map(|(index, record)| RoiReport {
                    index,
                    x: record.rect.x,
                    y: record.rect.y,
                    width: record.rect.width,
                    height: record.rect.height,
                    label: record.label.clone(),
                    samples: record
                        .segmentation
                        .as_ref()
                        .map_or(0, Segmentation::sample_count),
                    predictions: record
                        .prediction
                        .as_ref()
                        .map(|prediction| prediction.classes.clone()),
                    majority_class: record
                        .prediction
                        .as_ref()
                        .and_then(Prediction::majority_class),
                })
                .collect(),
            model_id: self.state.model_id().map(str::to_string),
            loss_history: self.state.loss_history().to_vec(),
        }
    }
}
