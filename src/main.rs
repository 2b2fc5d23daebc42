use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nuwa::{Cli, Config, Group, HttpRunner, LogWriter, SignalRunner, health_router, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    logging::init(config.debug)?;

    tracing::debug!(listen = %config.listen, "nuwa is listening");

    let group = Group::builder()
        .with_subscriber(Arc::new(LogWriter::new()))
        .with_runner(Arc::new(HttpRunner::new(config.listen, health_router())))
        .with_runner(Arc::new(SignalRunner::new()))
        .build();

    group.run().await.context("error serving")?;
    tracing::info!("nuwa stopped");
    Ok(())
}
