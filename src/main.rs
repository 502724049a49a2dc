use anyhow::Result;
use clap::{ColorChoice, Parser};
use websketch::cli::{self, Cli, Commands};
use websketch::config::SketchConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    websketch::core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SketchConfig::load(&cli)?;

    match &cli.command {
        Commands::New {
            dir,
            name,
            description,
            single,
        } => cli::new::new_project(dir, name.as_deref(), description.as_deref(), *single)
            .map(|_| ()),
        Commands::Compose {
            dir,
            thumbnail,
            output,
            ..
        } => cli::compose::compose_project(dir, *thumbnail, output.as_deref(), &config),
        Commands::Export { dir, output } => {
            cli::export::export_project(dir, output.as_deref()).map(|_| ())
        }
        Commands::File { dir, action } => cli::file::run_file(dir, action),
        Commands::Serve { dir, .. } => cli::serve::serve_project(dir, &config),
        Commands::Store { action } => cli::store::run_store(action, &config),
    }
}
