use std::fs;

use crate::client::testing::FakeService;
use crate::model::{MorphOp, MorphOps, ProcessConfig, Threshold};
use crate::ui::MemorySurface;
use crate::workflow::{RoiSession, SessionRoi, StageKind, WorkflowController, save_session};

use super::{AppContext, AppError, ClientConfig, LogLevel, RunOptions, run_pipeline};

fn session(labels: [Option<&str>; 3]) -> RoiSession {
    RoiSession {
        image_path: None,
        rois: labels
            .iter()
            .enumerate()
            .map(|(index, label)| SessionRoi {
                x: index as i64 * 100,
                y: 0,
                width: if index == 1 { 0 } else { 50 },
                height: 50,
                label: label.map(str::to_string),
            })
            .collect(),
    }
}

#[test]
fn config_defaults_fill_missing_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("client.json");
    fs::write(&path, r#"{"timeout_secs": 30}"#).expect("write");
    let config = ClientConfig::load(&path).expect("config");
    assert_eq!(config.server_url, "http://127.0.0.1:8000");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.upload_chunk_bytes, 1024 * 1024);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn yaml_config_is_read_by_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("client.yml");
    fs::write(&path, "server_url: https://slides.example\nlog_level: debug\n").expect("write");
    let config = ClientConfig::load(&path).expect("config");
    assert_eq!(config.server_url, "https://slides.example");
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("client.json");
    fs::write(&path, r#"{"server_url": "ftp://nowhere"}"#).expect("write");
    assert!(matches!(ClientConfig::load(&path), Err(AppError::Config(_))));

    let zero_chunk = ClientConfig {
        upload_chunk_bytes: 0,
        ..ClientConfig::default()
    };
    assert!(AppContext::new(zero_chunk).is_err());
}

#[test]
fn overrides_replace_file_values() {
    let config = ClientConfig::default()
        .with_server(Some(" http://10.0.0.2:9000 ".to_string()))
        .with_server(Some(String::new()))
        .with_log_level(Some(LogLevel::Warn))
        .with_log_level(None);
    assert_eq!(config.server_url, "http://10.0.0.2:9000");
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[test]
fn context_builds_service_from_config() {
    let context = AppContext::new(ClientConfig {
        server_url: "http://slides.local:8000/".to_string(),
        ..ClientConfig::default()
    })
    .expect("context");
    assert_eq!(context.service().base_url(), "http://slides.local:8000");
    assert_eq!(context.config().timeout().as_secs(), 300);
}

#[test]
fn pipeline_runs_from_upload_to_prediction() {
    let dir = tempfile::tempdir().expect("temp dir");
    let session_path = dir.path().join("session.json");
    save_session(&session_path, &session([Some("0"), None, Some("1")])).expect("session");
    let report_path = dir.path().join("report.json");

    let mut controller: WorkflowController<FakeService, MemorySurface> =
        WorkflowController::new(FakeService::default());
    let options = RunOptions {
        image: "slide.svs".into(),
        session: session_path,
        process: ProcessConfig::new(
            Threshold::Manual { value: 90 },
            MorphOps::from(vec![MorphOp::Opening]),
        ),
        skip_training: false,
        report: Some(report_path.clone()),
    };
    let report = run_pipeline(&mut controller, &options).expect("run");

    assert_eq!(report.rois.len(), 2);
    assert_eq!(report.model_id.as_deref(), Some("model-1"));
    assert_eq!(*controller.service().trained_labels.borrow(), vec![0, 1]);
    assert_eq!(
        controller.service().calls(),
        vec!["upload", "tile", "manifest", "process", "train", "predict", "predict"]
    );
    assert!(controller.stages().status(StageKind::Predict).is_success());
    assert_eq!(controller.config().threshold, Threshold::Manual { value: 90 });
    assert!(report_path.exists());
}

#[test]
fn pipeline_stops_on_missing_labels() {
    let dir = tempfile::tempdir().expect("temp dir");
    let session_path = dir.path().join("session.yaml");
    save_session(&session_path, &session([Some("0"), None, Some("")])).expect("session");

    let mut controller: WorkflowController<FakeService, MemorySurface> =
        WorkflowController::new(FakeService::default());
    let options = RunOptions {
        image: "slide.svs".into(),
        session: session_path,
        process: ProcessConfig::default(),
        skip_training: false,
        report: None,
    };
    assert!(run_pipeline(&mut controller, &options).is_err());
    assert!(!controller.service().calls().contains(&"train"));
    assert!(controller.stages().status(StageKind::ProcessBatch).is_success());
}
