// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job intake: sole consumer of the job-manager queue.
//!
//! Gatekeeper for provenance and the shutdown broadcast initiator. Every
//! admitted record is handed to the dispatch loop over a single-slot
//! channel, so records enter the state machine in a single global order
//! with at most one in flight.

use crate::adapters::broker::{BrokerAdapter, Delivery, JobConsumer};
use crate::error::IntakeError;
use shunt_core::{Config, Job, JobId, JobKind, QueueConfig, JOB_MANAGER, JOB_ROUTER};
use tokio::sync::mpsc;

/// Consumes the job-manager queue and feeds the dispatch loop.
pub struct JobIntake<B: BrokerAdapter> {
    broker: B,
    queue: QueueConfig,
    stages: Vec<String>,
    tx: mpsc::Sender<Job>,
}

impl<B: BrokerAdapter> JobIntake<B> {
    pub fn new(broker: B, config: &Config, tx: mpsc::Sender<Job>) -> Self {
        Self {
            broker,
            queue: config.jobs.clone(),
            stages: config.wrappers.iter().map(|w| w.name.clone()).collect(),
            tx,
        }
    }

    /// Consume until the shutdown broadcast completes or the consumer
    /// stream ends. Setup failures are fatal; a malformed message is not.
    pub async fn run(self) -> Result<(), IntakeError> {
        self.broker.declare_queue(&self.queue).await?;
        // Prefetch 1: one undelivered message at a time, acked manually
        // once its outcome is committed to the channel.
        let mut deliveries = self.broker.consume(&self.queue, 1).await?;
        tracing::info!(queue = %self.queue.name, "consuming job-manager queue");

        while let Some(next) = deliveries.next().await {
            let delivery = next?;
            let mut job = match shunt_wire::decode(delivery.body()) {
                Ok(job) => job,
                Err(err) => {
                    tracing::warn!(error = %err, "malformed job body, synthesizing failure record");
                    synthesize_decode_failure(&err)
                }
            };

            if job.kind.is_die() {
                delivery.ack().await?;
                self.broadcast_shutdown(job).await?;
                return Ok(());
            }

            if job.last_origin != JOB_MANAGER {
                tracing::warn!(job = %job.id, origin = %job.last_origin, "rejecting record with foreign origin");
                job.mark_failed("LastOrigin can only be 'JobManager'");
            } else {
                job.last_origin = JOB_ROUTER.to_string();
            }

            self.forward(job).await?;
            delivery.ack().await?;
        }

        Ok(())
    }

    /// Hand one per-stage copy of the shutdown record to the dispatch
    /// loop, in stage order. Each send blocks until the previous copy has
    /// been taken, so every stage queue gets its record before the loop
    /// can exit.
    async fn broadcast_shutdown(&self, job: Job) -> Result<(), IntakeError> {
        tracing::info!(job = %job.id, stages = self.stages.len(), "shutdown signal received, broadcasting");
        for stage in &self.stages {
            let mut copy = job.clone();
            copy.required_origin = stage.clone();
            self.forward(copy).await?;
        }
        Ok(())
    }

    async fn forward(&self, job: Job) -> Result<(), IntakeError> {
        self.tx.send(job).await.map_err(|_| IntakeError::ChannelClosed)
    }
}

/// Failed record standing in for a body that would not decode, so the
/// failure is retired through status reporting instead of vanishing.
fn synthesize_decode_failure(err: &shunt_wire::WireError) -> Job {
    let mut job = Job {
        id: JobId::default(),
        kind: JobKind::Work,
        status: true,
        finished: false,
        last_origin: JOB_MANAGER.to_string(),
        required_origin: String::new(),
        error: String::new(),
    };
    job.mark_failed(format!("failed to decode job body: {err}"));
    job
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
