use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flappy_training::{
    config::SimulationConfig,
    evolution::EvolutionController,
    network::{BreedingParams, FeedForwardNetwork},
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use self::{
    play::{AutoPlayArg, ManualPlayArg},
    train::TrainArg,
    watch::WatchArg,
};
use crate::util;

mod play;
mod train;
mod watch;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fly yourself
    #[command(name = "play")]
    ManualPlay(#[clap(flatten)] ManualPlayArg),
    /// Let a trained network fly
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Evolve networks headlessly and save the best one
    Train(#[clap(flatten)] TrainArg),
    /// Watch a population evolve in the terminal
    Watch(#[clap(flatten)] WatchArg),
}

/// Options shared by the commands that run evolution.
#[derive(Default, Debug, Clone, clap::Args)]
struct SimulationArg {
    /// Simulation config file (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Agents per generation (overrides the config file)
    #[arg(long)]
    population: Option<usize>,
    /// Share of each generation carried over unchanged (overrides the config file)
    #[arg(long)]
    elitism: Option<f32>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

impl SimulationArg {
    fn load(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(population) = self.population {
            config.evolution.population_size = population;
        }
        if let Some(elitism) = self.elitism {
            config.evolution.elitism_fraction = elitism;
        }
        Ok(config)
    }

    /// Builds a controller and a random first generation of networks.
    ///
    /// With `--seed`, both are derived from it and the whole run is reproducible.
    fn start(&self) -> anyhow::Result<(EvolutionController, Vec<FeedForwardNetwork>)> {
        let config = self.load()?;
        let population_size = config.evolution.population_size;
        let (mut rng, controller) = match self.seed {
            Some(seed) => (
                Pcg32::seed_from_u64(seed),
                EvolutionController::with_seed(config, seed),
            ),
            None => (
                Pcg32::from_rng(&mut rand::rng()),
                EvolutionController::new(config),
            ),
        };
        let controller = controller.context("Invalid simulation config")?;
        let policies = FeedForwardNetwork::random_population(
            population_size,
            &BreedingParams::default(),
            &mut rng,
        );
        Ok((controller, policies))
    }
}

impl CommandArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the selected mode takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.mode, Some(Mode::Train(_)))
    }
}

pub fn run(args: CommandArgs) -> anyhow::Result<()> {
    match args
        .mode
        .unwrap_or(Mode::ManualPlay(ManualPlayArg::default()))
    {
        Mode::ManualPlay(arg) => play::run_manual(&arg)?,
        Mode::AutoPlay(arg) => play::run_auto(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Watch(arg) => watch::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory as _;
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_only_train_is_headless() {
        let train = CommandArgs::try_parse_from(["flappy", "train", "--generations", "3"]).unwrap();
        assert!(!train.is_interactive());

        let default = CommandArgs::try_parse_from(["flappy"]).unwrap();
        assert!(default.is_interactive());

        let auto = CommandArgs::try_parse_from(["flappy", "auto-play", "model.json"]).unwrap();
        assert!(auto.is_interactive());
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = SimulationArg {
            population: Some(20),
            elitism: Some(0.1),
            ..SimulationArg::default()
        };
        let config = arg.load().unwrap();
        assert_eq!(config.evolution.population_size, 20);
        assert_eq!(config.evolution.elitism_fraction, 0.1);
        assert_eq!(config.tick_limit, Some(10_000));
    }

    #[test]
    fn test_invalid_overrides_are_rejected_before_running() {
        let arg = SimulationArg {
            population: Some(0),
            ..SimulationArg::default()
        };
        let err = arg.start().unwrap_err();
        assert!(format!("{err:#}").contains("population size must be at least 1"));
    }

    #[test]
    fn test_seeded_start_is_reproducible() {
        let arg = SimulationArg {
            population: Some(4),
            seed: Some(8),
            ..SimulationArg::default()
        };
        let (_, first) = arg.start().unwrap();
        let (_, second) = arg.start().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }
}
