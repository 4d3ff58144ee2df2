use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Upload,
    Tile,
    ProcessSingle,
    ProcessBatch,
    Train,
    Predict,
}

impl StageKind {
    pub const ALL: [StageKind; 6] = [
        Self::Upload,
        Self::Tile,
        Self::ProcessSingle,
        Self::ProcessBatch,
        Self::Train,
        Self::Predict,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Tile => "tile",
            Self::ProcessSingle => "process single",
            Self::ProcessBatch => "process batch",
            Self::Train => "train",
            Self::Predict => "predict",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Idle,
    InProgress,
    Success,
    Error(String),
}

impl StageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageBoard {
    stages: BTreeMap<StageKind, StageStatus>,
}

impl Default for StageBoard {
    fn default() -> Self {
        Self {
            stages: StageKind::ALL
                .into_iter()
                .map(|kind| (kind, StageStatus::Idle))
                .collect(),
        }
    }
}

impl StageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, kind: StageKind) -> &StageStatus {
        static IDLE: StageStatus = StageStatus::Idle;
        self.stages.get(&kind).unwrap_or(&IDLE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageKind, &StageStatus)> {
        self.stages.iter().map(|(kind, status)| (*kind, status))
    }

    pub(crate) fn begin(&mut self, kind: StageKind) {
        log::info!("{kind} started");
        self.stages.insert(kind, StageStatus::InProgress);
    }

    pub(crate) fn succeed(&mut self, kind: StageKind) {
        log::info!("{kind} succeeded");
        self.stages.insert(kind, StageStatus::Success);
    }

    pub(crate) fn fail(&mut self, kind: StageKind, message: impl Into<String>) {
        let message = message.into();
        log::error!("{kind} failed: {message}");
        self.stages.insert(kind, StageStatus::Error(message));
    }

    /// Marks a stage whose response arrived too late to be applied.
    pub(crate) fn discard(&mut self, kind: StageKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{kind} response dropped: {message}");
        self.stages.insert(kind, StageStatus::Error(message));
    }
}
