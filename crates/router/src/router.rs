// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pipeline router: stage queue topology and the dispatch loop.

use crate::adapters::broker::BrokerAdapter;
use crate::adapters::report::ReportAdapter;
use crate::dispatch::{resolve, Dispatch};
use crate::error::RouterError;
use shunt_core::{Config, Pipeline, QueueConfig};
use tokio::sync::mpsc;

/// Owns the per-stage queues and routes every record it receives.
pub struct PipelineRouter<B: BrokerAdapter, R: ReportAdapter> {
    broker: B,
    reporter: R,
    pipeline: Pipeline,
    queues: Vec<QueueConfig>,
    rx: mpsc::Receiver<shunt_core::Job>,
}

impl<B, R> PipelineRouter<B, R>
where
    B: BrokerAdapter,
    R: ReportAdapter,
{
    pub fn new(broker: B, reporter: R, config: &Config, rx: mpsc::Receiver<shunt_core::Job>) -> Self {
        Self {
            broker,
            reporter,
            pipeline: config.pipeline(),
            queues: config.wrappers.clone(),
            rx,
        }
    }

    /// Declare the stage queues, then dispatch records until shutdown.
    ///
    /// The first publish, routing, or report failure aborts the loop;
    /// there is no reconnect, the surrounding process restarts instead.
    pub async fn run(mut self) -> Result<(), RouterError> {
        for queue in &self.queues {
            self.broker.declare_queue(queue).await?;
        }
        tracing::info!(stages = self.pipeline.len(), "pipeline router ready");

        while let Some(mut job) = self.rx.recv().await {
            match resolve(&job, &self.pipeline)? {
                Dispatch::Forward(stage) => {
                    tracing::debug!(job = %job.id, stage, "forwarding");
                    let body = shunt_wire::encode(&job)?;
                    self.broker.publish(stage, body).await?;
                }
                Dispatch::FinalizeFailed => {
                    job.finished = true;
                    tracing::info!(job = %job.id, error = %job.error, "retiring failed record");
                    self.reporter.report_status(&job).await?;
                }
                Dispatch::FinalizeSucceeded => {
                    job.finished = true;
                    tracing::info!(job = %job.id, "retiring finished record");
                    self.reporter.report_status(&job).await?;
                    self.reporter.report_storage(&job).await?;
                }
                Dispatch::Shutdown => {
                    tracing::info!(job = %job.id, "shutdown record received, stopping dispatch");
                    return Ok(());
                }
            }
        }

        // Intake dropped its sender after a broadcast; every broadcast
        // record was already drained in FIFO order above.
        tracing::info!("intake closed the hand-off channel, stopping dispatch");
        Ok(())
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
