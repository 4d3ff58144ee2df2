mod controller;
mod error;
mod form;
mod io;
mod report;
mod session;
mod stage;
mod state;


pub use controller::{
    BatchOutcome, BatchTicket, PredictOutcome, PredictTicket, WorkflowController,
};
pub use error::{Result, WorkflowError};
pub use form::{FormField, ManualRoiForm};
pub use io::{export_rgb, load_session, save_mask, save_report, save_session};
pub use report::{RoiReport, RunReport, StageReport};
pub use session::{RoiSession, SessionRoi};
pub use stage::{StageBoard, StageKind, StageStatus};
pub use state::{SourceState, WorkflowState};
