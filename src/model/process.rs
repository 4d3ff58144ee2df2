use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ModelError, Result};

pub const DEFAULT_MANUAL_THRESHOLD: u8 = 128;

/// Binarization applied by the service before morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Threshold {
    #[default]
    Otsu,
    Adaptive,
    Manual { value: u8 },
}

impl Threshold {
    pub fn manual(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map(|value| Self::Manual { value })
            .map_err(|_| ModelError::ManualValueOutOfRange(value))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Otsu => "otsu",
            Self::Adaptive => "adaptive",
            Self::Manual { .. } => "manual",
        }
    }

    pub const fn manual_value(self) -> Option<u8> {
        match self {
            Self::Manual { value } => Some(value),
            Self::Otsu | Self::Adaptive => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphOp {
    Erosion,
    Dilation,
    Opening,
    Closing,
}

impl MorphOp {
    pub const ALL: [MorphOp; 4] = [Self::Erosion, Self::Dilation, Self::Opening, Self::Closing];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Erosion => "erosion",
            Self::Dilation => "dilation",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for MorphOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Morphology operations in the order they were selected, each at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<MorphOp>", into = "Vec<MorphOp>")]
pub struct MorphOps(Vec<MorphOp>);

impl MorphOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `op`; returns false if it was already selected.
    pub fn insert(&mut self, op: MorphOp) -> bool {
        if self.contains(op) {
            return false;
        }
        self.0.push(op);
        true
    }

    pub fn remove(&mut self, op: MorphOp) -> bool {
        let before = self.0.len();
        self.0.retain(|selected| *selected != op);
        self.0.len() != before
    }

    /// Selects `op` if absent and deselects it otherwise, like a checkbox list.
    pub fn toggle(&mut self, op: MorphOp) {
        if !self.remove(op) {
            self.0.push(op);
        }
    }

    pub fn contains(&self, op: MorphOp) -> bool {
        self.0.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = MorphOp> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(MorphOp::name).collect()
    }
}

impl From<Vec<MorphOp>> for MorphOps {
    fn from(ops: Vec<MorphOp>) -> Self {
        ops.into_iter().collect()
    }
}

impl From<MorphOps> for Vec<MorphOp> {
    fn from(ops: MorphOps) -> Self {
        ops.0
    }
}

impl FromIterator<MorphOp> for MorphOps {
    fn from_iter<I: IntoIterator<Item = MorphOp>>(iter: I) -> Self {
        let mut ops = Self::new();
        for op in iter {
            ops.insert(op);
        }
        ops
    }
}

/// Settings shared by single and batch region processing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    #[serde(default)]
    pub threshold: Threshold,
    #[serde(default)]
    pub morph_ops: MorphOps,
}

impl ProcessConfig {
    pub fn new(threshold: Threshold, morph_ops: MorphOps) -> Self {
        Self {
            threshold,
            morph_ops,
        }
    }
}
