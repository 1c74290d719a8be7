use std::path::{Path, PathBuf};

use anyhow::Context as _;
use flappy_engine::{FlightSession, WorldConfig};
use tracing::info;

use self::app::PlayApp;
use crate::{tui, util};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ManualPlayArg {
    /// Simulation config file (JSON); only its world section is used
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the obstacle layouts
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Path to the model file (JSON format)
    model_path: PathBuf,
    /// Simulation config file (JSON); only its world section is used
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the obstacle layouts
    #[arg(long)]
    seed: Option<u64>,
}

fn new_session(config: Option<&Path>, seed: Option<u64>) -> anyhow::Result<FlightSession> {
    let world = match config {
        Some(path) => util::read_config_file(path)?.world,
        None => WorldConfig::default(),
    };
    let session = match seed {
        Some(seed) => FlightSession::with_seed(world, seed),
        None => FlightSession::new(world),
    };
    session.context("Invalid world configuration")
}

pub(crate) fn run_manual(arg: &ManualPlayArg) -> anyhow::Result<()> {
    let ManualPlayArg { config, seed } = arg;
    let session = new_session(config.as_deref(), *seed)?;

    let mut app = PlayApp::manual(session);
    tui::run(&mut app)?;

    info!(high_score = app.high_score(), "session ended");
    Ok(())
}

pub(crate) fn run_auto(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        model_path,
        config,
        seed,
    } = arg;

    let model = util::read_model_file(model_path)?;
    info!(
        name = %model.name,
        generation = model.generation,
        fitness = model.final_fitness,
        "loaded model"
    );
    let session = new_session(config.as_deref(), *seed)?;

    let mut app = PlayApp::auto(session, model);
    tui::run(&mut app)?;

    info!(high_score = app.high_score(), "session ended");
    Ok(())
}
