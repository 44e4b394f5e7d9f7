//! Watch mode: rewrite the output file whenever the document changes.

use std::sync::Arc;

use anyhow::Result;

use crate::actor::{Builder, Coordinator};
use crate::config::Config;
use crate::converter::Converter;
use crate::core::register_shutdown;
use crate::log;
use crate::reload::{ServerState, Snapshot};

pub fn run(config: Arc<Config>, converter: Arc<dyn Converter>) -> Result<()> {
    let shutdown_rx = register_shutdown();
    let coordinator = Coordinator::watch(&config)?.with_shutdown_signal(shutdown_rx);

    let html = super::convert::build_once(&config, converter.as_ref())?;
    log!(
        "watch";
        "{} -> {}",
        config.input.display(),
        config.output.display()
    );
    log!(
        "watch";
        "watching {} for changes (press Ctrl+C to stop)",
        config.input.display()
    );

    // No HTTP clients; the state only tracks versions and build errors.
    let state = Arc::new(ServerState::new(Snapshot::initial(html)));
    let builder = Builder::new(converter, config.input.clone(), state)
        .with_output(config.output.clone());

    let rt = super::runtime()?;
    rt.block_on(coordinator.run(builder))
}
