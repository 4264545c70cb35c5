// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The routing decision table.
//!
//! [`resolve`] is the whole state machine as a pure function: it inspects a
//! record's origin, outcome, and resolved target and names the next action,
//! leaving every broker and HTTP side effect to the dispatch loop. The
//! stage order doubles as the retry ladder, so a single ordered list
//! determines both steady-state routing and failure recovery.

use shunt_core::{Job, JobKind, Pipeline, RoutingTarget, JOB_MANAGER};
use thiserror::Error;

/// Routing failures that abort the dispatch loop.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no wrapper stages are configured")]
    EmptyPipeline,

    #[error("required origin '{0}' is not a configured stage")]
    UnknownStage(String),

    #[error("record '{id}' addresses the router with kind '{kind}', only 'die' may")]
    RouterTargetNotDie { id: String, kind: JobKind },
}

/// Next action for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Publish the record to the named stage queue.
    Forward(&'a str),
    /// Retire the record through the status service.
    FinalizeFailed,
    /// Retire the record through the status and storage services.
    FinalizeSucceeded,
    /// Exit the dispatch loop.
    Shutdown,
}

/// Decide the next hop for a record.
pub fn resolve<'a>(job: &'a Job, pipeline: &'a Pipeline) -> Result<Dispatch<'a>, RouteError> {
    let target = RoutingTarget::resolve(&job.required_origin, pipeline);

    if job.last_origin == JOB_MANAGER {
        return match target {
            RoutingTarget::Unset => {
                let first = pipeline.first().ok_or(RouteError::EmptyPipeline)?;
                Ok(Dispatch::Forward(first))
            }
            RoutingTarget::Stage(stage) => Ok(Dispatch::Forward(stage)),
            RoutingTarget::Router | RoutingTarget::Unknown(_) => {
                Err(RouteError::UnknownStage(job.required_origin.clone()))
            }
        };
    }

    if !job.status {
        // The record failed upstream. An unset target walks the ladder;
        // an explicit target, or running out of stages, retires it. A
        // non-stage origin has no position and therefore no next stage.
        return match target {
            RoutingTarget::Unset => match pipeline.next_after(&job.last_origin) {
                Some(next) => Ok(Dispatch::Forward(next)),
                None => Ok(Dispatch::FinalizeFailed),
            },
            _ => Ok(Dispatch::FinalizeFailed),
        };
    }

    match target {
        RoutingTarget::Router if job.kind.is_die() => Ok(Dispatch::Shutdown),
        RoutingTarget::Router => Err(RouteError::RouterTargetNotDie {
            id: job.id.to_string(),
            kind: job.kind,
        }),
        _ => Ok(Dispatch::FinalizeSucceeded),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
