use clap::Parser;
use serde_json::json;

use crate::config::{CropConfig, load_config};
use crate::cropping::column_names;
use crate::model::axis_kinds;
use crate::workflow::{load_script, run_script, save_report};

use super::types::{AxesInfo, Cli, Commands};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            config,
            report,
        } => {
            let config = match config {
                Some(path) => load_config(&path).map_err(|error| error.to_string())?,
                None => CropConfig::default(),
            };
            let session = load_script(&script).map_err(|error| error.to_string())?;
            let run_report = run_script(&session, &config).map_err(|error| error.to_string())?;
            if let Some(report_path) = report {
                save_report(report_path, &run_report).map_err(|error| error.to_string())?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&run_report).map_err(|error| error.to_string())?
            );
        }
        Commands::Validate { script } => {
            let session = load_script(&script).map_err(|error| error.to_string())?;
            println!(
                "{}",
                json!({
                    "status": "ok",
                    "name": session.name,
                    "layers": session.layers.len(),
                    "steps": session.steps.len(),
                })
            );
        }
        Commands::Axes { ndim } => {
            let info = AxesInfo {
                ndim,
                axes: axis_kinds(ndim)
                    .into_iter()
                    .map(|axis| axis.label())
                    .collect(),
                columns: column_names(ndim),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&info).map_err(|error| error.to_string())?
            );
        }
    }

    Ok(())
}
