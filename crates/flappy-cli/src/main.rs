use tracing_subscriber::EnvFilter;

mod command;
mod schema;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    let args = command::CommandArgs::parse_args();
    init_tracing(args.is_interactive());
    command::run(args)
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
///
/// Terminal UIs own the screen, so they log nothing unless asked to.
fn init_tracing(interactive: bool) {
    let default_filter = if interactive { "off" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
