use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::model::{DEFAULT_MANUAL_THRESHOLD, MorphOp, MorphOps, ProcessConfig, Threshold};
use crate::runtime::LogLevel;

#[derive(Debug, Parser)]
#[command(
    name = "slide-roi",
    version,
    about = "Annotate whole-slide images with ROIs and drive remote segmentation, training and prediction"
)]
pub(super) struct Cli {
    /// Client configuration file (JSON or YAML).
    #[arg(long, global = true)]
    pub(super) config: Option<PathBuf>,
    /// Processing service URL; overrides the config file and SLIDE_ROI_SERVER.
    #[arg(long, global = true)]
    pub(super) server: Option<String>,
    #[arg(long, global = true, value_enum)]
    pub(super) log_level: Option<LogLevel>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Checks that the service is reachable.
    Health,
    /// Lists files already uploaded to the service.
    Uploads,
    /// Lists accepted slide extensions.
    Formats,
    /// Uploads a slide and tiles it when it is pyramidal.
    Upload { file: PathBuf },
    /// Segments one region and writes its mask as PNG.
    Process {
        image: PathBuf,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
        #[arg(long)]
        width: i64,
        #[arg(long)]
        height: i64,
        #[command(flatten)]
        process: ProcessArgs,
        #[arg(long)]
        output: PathBuf,
    },
    /// Uploads a slide, processes a saved ROI session, trains and predicts.
    Run {
        image: PathBuf,
        #[arg(long)]
        session: PathBuf,
        #[command(flatten)]
        process: ProcessArgs,
        #[arg(long)]
        skip_training: bool,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(super) enum ThresholdArg {
    Otsu,
    Adaptive,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(super) enum MorphArg {
    Erosion,
    Dilation,
    Opening,
    Closing,
}

impl From<MorphArg> for MorphOp {
    fn from(arg: MorphArg) -> Self {
        match arg {
            MorphArg::Erosion => MorphOp::Erosion,
            MorphArg::Dilation => MorphOp::Dilation,
            MorphArg::Opening => MorphOp::Opening,
            MorphArg::Closing => MorphOp::Closing,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(super) struct ProcessArgs {
    #[arg(long, value_enum, default_value_t = ThresholdArg::Otsu)]
    pub(super) threshold: ThresholdArg,
    /// Threshold used with `--threshold manual`.
    #[arg(long, default_value_t = i64::from(DEFAULT_MANUAL_THRESHOLD))]
    pub(super) manual_value: i64,
    /// Morphological operations, applied in the order given.
    #[arg(long = "morph", value_enum)]
    pub(super) morph_ops: Vec<MorphArg>,
}

impl ProcessArgs {
    pub(super) fn to_config(&self) -> crate::model::Result<ProcessConfig> {
        let threshold = match self.threshold {
            ThresholdArg::Otsu => Threshold::Otsu,
            ThresholdArg::Adaptive => Threshold::Adaptive,
            ThresholdArg::Manual => Threshold::manual(self.manual_value)?,
        };
        let morph_ops = self
            .morph_ops
            .iter()
            .copied()
            .map(MorphOp::from)
            .collect::<MorphOps>();
        Ok(ProcessConfig::new(threshold, morph_ops))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UploadInfo {
    pub(super) image_path: Option<String>,
    pub(super) manifest_url: Option<String>,
    pub(super) source: Option<crate::model::ImageSource>,
    pub(super) raster_url: Option<String>,
}
