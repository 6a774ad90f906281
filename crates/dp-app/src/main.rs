// ABOUTME: Entry point of the debug-panes layout previewer.
// ABOUTME: Loads config, builds the layout session and reads commands from stdin.

mod app;
mod commands;
mod panels;
mod text_surface;

use std::io;

use anyhow::Result;
use dp_core::Config;
use tracing_subscriber::EnvFilter;

use app::App;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting debug-panes");

    let config = Config::load_or_default();
    let description = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.layout.description.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new(&config, &description, runtime.handle().clone())?;
    app.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!(layout = %app.session().describe()?, "exiting");
    Ok(())
}
