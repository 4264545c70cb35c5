// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shunt-router: job intake, the routing decision table, and the pipeline
//! router dispatch loop.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod intake;
pub mod router;

pub use adapters::broker::{AmqpBroker, BrokerAdapter, BrokerError, Delivery, JobConsumer};
pub use adapters::report::{HttpReporter, ReportAdapter, ReportError};
pub use dispatch::{resolve, Dispatch, RouteError};
pub use error::{IntakeError, RouterError};
pub use intake::JobIntake;
pub use router::PipelineRouter;

#[cfg(any(test, feature = "test-support"))]
pub use adapters::broker::FakeBroker;
#[cfg(any(test, feature = "test-support"))]
pub use adapters::report::FakeReporter;
