use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{RgbSample, decode_mask};

use super::{Result, RoiSession, RunReport};

fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    let value = if is_yaml(path) {
        serde_yaml::from_str::<T>(&raw)?
    } else {
        serde_json::from_str::<T>(&raw)?
    };
    Ok(value)
}

fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    fs::write(path, serialized)?;
    Ok(())
}

pub fn load_session(path: impl AsRef<Path>) -> Result<RoiSession> {
    load_document(path.as_ref())
}

pub fn save_session(path: impl AsRef<Path>, session: &RoiSession) -> Result<()> {
    save_document(path.as_ref(), session)
}

pub fn save_report(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    save_document(path.as_ref(), report)
}

pub fn export_rgb(path: impl AsRef<Path>, samples: &[RgbSample]) -> Result<()> {
    fs::write(path, serde_json::to_string(samples)?)?;
    Ok(())
}

pub fn save_mask(path: impl AsRef<Path>, mask: &str) -> Result<()> {
    fs::write(path, decode_mask(mask)?)?;
    Ok(())
}
