use tracing::info;

use self::app::WatchApp;
use crate::{command::SimulationArg, tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WatchArg {
    #[clap(flatten)]
    simulation: SimulationArg,
}

pub(crate) fn run(arg: &WatchArg) -> anyhow::Result<()> {
    let (controller, policies) = arg.simulation.start()?;
    let mut app = WatchApp::new(controller, policies)?;
    tui::run(&mut app)?;

    let (generation, high_score) = app.progress();
    info!(generation, high_score, "stopped watching");
    app.into_result()
}
