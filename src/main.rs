//=========================================================================
// Paper Puzzle: Binary
//
// Usage: paper_puzzle [settings.toml]
//
// Levels are built into the binary; settings come from the optional
// TOML file, defaulting to auto-advance between levels.
//
//=========================================================================

use std::process::ExitCode;

use log::{error, info};
use paper_puzzle::core::error::PuzzleError;
use paper_puzzle::core::level::LevelCatalog;
use paper_puzzle::core::settings::PuzzleSettings;
use paper_puzzle::EngineBuilder;

const LEVELS: &str = include_str!("../levels/levels.toml");

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PuzzleError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => PuzzleSettings::from_path(path)?,
        None => PuzzleSettings {
            auto_advance: true,
            ..PuzzleSettings::default()
        },
    };
    let catalog = LevelCatalog::from_toml_str(LEVELS)?;
    info!("Booting with {} levels", catalog.len());

    EngineBuilder::new()
        .with_settings(settings)
        .with_levels(catalog)
        .build()
        .run()?;
    Ok(())
}
