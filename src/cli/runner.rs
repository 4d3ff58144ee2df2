use clap::Parser;
use serde_json::json;

use crate::model::{PYRAMIDAL_EXTENSIONS, RASTER_EXTENSIONS};
use crate::runtime::{AppContext, ClientConfig, LogLevel, RunOptions, run_pipeline};
use crate::workflow::SourceState;

use super::types::{Cli, Commands, UploadInfo};

fn init_logging(config_level: LogLevel, flag: Option<LogLevel>) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config_level.name()),
    );
    if let Some(level) = flag {
        builder.filter_level(level.to_level_filter());
    }
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|error| error.to_string())?
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path).map_err(|error| error.to_string())?,
        None => ClientConfig::default(),
    }
    .with_env()
    .with_server(cli.server.clone())
    .with_log_level(cli.log_level);
    init_logging(config.log_level, cli.log_level);

    let app = AppContext::new(config).map_err(|error| error.to_string())?;

    match cli.command {
        Commands::Health => {
            let status = app.health().map_err(|error| error.to_string())?;
            print_json(&json!({"status": status, "server": app.config().server_url}))?;
        }
        Commands::Uploads => {
            let files = app.uploads().map_err(|error| error.to_string())?;
            print_json(&json!({"files": files}))?;
        }
        Commands::Formats => {
            print_json(&json!({
                "pyramidal": PYRAMIDAL_EXTENSIONS,
                "raster": RASTER_EXTENSIONS,
            }))?;
        }
        Commands::Upload { file } => {
            let mut controller = app.controller();
            controller
                .upload(&file)
                .map_err(|error| error.to_string())?;
            let state = controller.state();
            let raster_url = match state.source() {
                SourceState::AwaitingRaster { url } => Some(url.clone()),
                SourceState::Unset | SourceState::Ready(_) => None,
            };
            print_json(&UploadInfo {
                image_path: state.image_path().map(str::to_string),
                manifest_url: state.manifest_url().map(str::to_string),
                source: state.source().ready().copied(),
                raster_url,
            })?;
        }
        Commands::Process {
            image,
            x,
            y,
            width,
            height,
            process,
            output,
        } => {
            let config = process.to_config().map_err(|error| error.to_string())?;
            let mut controller = app.controller();
            controller.set_config(config);
            controller
                .upload(&image)
                .map_err(|error| error.to_string())?;
            let index = controller
                .add_manual_roi(x, y, width, height)
                .ok_or_else(|| format!("ROI {width}x{height} has no area"))?;
            controller
                .process_single(index)
                .map_err(|error| error.to_string())?;
            controller
                .save_single_result(&output)
                .map_err(|error| error.to_string())?;
            print_json(&json!({"status": "ok", "output": output}))?;
        }
        Commands::Run {
            image,
            session,
            process,
            skip_training,
            report,
        } => {
            let options = RunOptions {
                image,
                session,
                process: process.to_config().map_err(|error| error.to_string())?,
                skip_training,
                report,
            };
            let mut controller = app.controller();
            let run_report =
                run_pipeline(&mut controller, &options).map_err(|error| error.to_string())?;
            print_json(&run_report)?;
        }
    }

    Ok(())
}
