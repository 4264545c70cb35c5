// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shuntd: the job-router daemon.

use shunt_core::Config;
use shunt_router::{env, AmqpBroker, HttpReporter, JobIntake, PipelineRouter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shuntd=info,shunt_router=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "router stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::config_file();
    tracing::info!(path = %config_path.display(), "reading config");
    let config = Config::load(&config_path)?;

    let client = reqwest::Client::builder().timeout(env::http_timeout()).build()?;
    let reporter = HttpReporter::new(client, &config.status.name, &config.storage.name);

    // Intake and the router each own an independent connection; neither
    // shares a channel with the other.
    let intake_broker = AmqpBroker::connect(&config.amqp_url()).await?;
    let router_broker = AmqpBroker::connect(&config.amqp_url()).await?;

    // Single-slot hand-off: one record in flight, strict FIFO into the
    // dispatch loop.
    let (tx, rx) = tokio::sync::mpsc::channel(1);
    let intake = JobIntake::new(intake_broker, &config, tx);
    let router = PipelineRouter::new(router_broker, reporter, &config, rx);

    let intake_task = tokio::spawn(async move {
        if let Err(err) = intake.run().await {
            tracing::error!(error = %err, "job intake failed");
        }
    });

    let result = router.run().await;
    // Once the dispatch loop is done, nothing consumes hand-offs; stop
    // intake rather than leaving it parked on a dead channel.
    intake_task.abort();
    result?;
    Ok(())
}
