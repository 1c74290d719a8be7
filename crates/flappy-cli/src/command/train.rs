use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use flappy_training::policy::Policy as _;
use tracing::info;

use crate::{command::SimulationArg, schema::model::NetworkModel, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    simulation: SimulationArg,
    /// Number of generations to evolve
    #[arg(long, default_value_t = 50)]
    generations: u64,
    /// Name stored in the saved model
    #[arg(long, default_value = "flappy")]
    name: String,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        simulation,
        generations,
        name,
        output,
    } = arg;

    let (mut controller, policies) = simulation.start()?;
    info!(
        population_size = policies.len(),
        generations, "training started"
    );
    let ranked = controller.train(policies, *generations, |_| {})?;

    let best = ranked
        .into_iter()
        .next()
        .context("Training produced no networks")?;
    info!(
        fitness = best.fitness(),
        high_score = controller.high_score(),
        "training finished"
    );

    let model = NetworkModel {
        name: name.clone(),
        trained_at: Utc::now(),
        generation: controller.generation(),
        final_fitness: best.fitness(),
        network: best,
    };
    Output::save_json(&model, output.clone())?;
    Ok(())
}
