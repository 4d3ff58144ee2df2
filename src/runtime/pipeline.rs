use std::path::PathBuf;

use crate::client::RemoteService;
use crate::model::ProcessConfig;
use crate::ui::Surface;
use crate::workflow::{BatchOutcome, RunReport, WorkflowController, load_session, save_report};

use super::{AppError, Result};

/// Inputs of an unattended upload-to-prediction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub image: PathBuf,
    /// Saved ROIs (and labels) to process.
    pub session: PathBuf,
    pub process: ProcessConfig,
    /// Stop after batch processing.
    pub skip_training: bool,
    pub report: Option<PathBuf>,
}

/// Uploads the image, processes the session's ROIs, trains on their labels
/// and predicts every ROI.
pub fn run_pipeline<R: RemoteService, S: Surface>(
    controller: &mut WorkflowController<R, S>,
    options: &RunOptions,
) -> Result<RunReport> {
    let session = load_session(&options.session)?;
    controller.set_config(options.process.clone());
    controller.upload(&options.image)?;

    if controller.load_session(&session) == 0 {
        return Err(AppError::Config(format!(
            "session {} has no usable ROIs",
            options.session.display()
        )));
    }

    match controller.process_batch()? {
        BatchOutcome::Applied(count) => log::info!("segmented {count} ROIs"),
        BatchOutcome::Stale => {
            return Err(AppError::Config(
                "ROIs changed during batch processing".to_string(),
            ));
        }
    }
    // Batch results reset labels, so the session's labels go on afterwards.
    let labels = session
        .rois
        .iter()
        .filter(|roi| roi.rect().has_area())
        .map(|roi| roi.label.as_deref())
        .collect::<Vec<_>>();
    controller.apply_labels(&labels)?;

    if !options.skip_training {
        controller.train()?;
        let predicted = controller.predict_all()?;
        log::info!("predicted {predicted} ROIs");
    }

    let report = controller.report();
    if let Some(path) = &options.report {
        save_report(path, &report)?;
        log::info!("report written to {}", path.display());
    }
    Ok(report)
}
