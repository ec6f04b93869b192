pub mod cli;
pub mod config;
pub mod cropping;
pub mod host;
pub mod model;
pub mod notice;
pub mod selection;
pub mod tool;
pub mod workflow;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
