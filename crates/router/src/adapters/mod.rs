// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for external I/O

pub mod broker;
pub mod report;

pub use broker::{AmqpBroker, BrokerAdapter, BrokerError, Delivery, JobConsumer};
pub use report::{HttpReporter, ReportAdapter, ReportError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use broker::FakeBroker;
#[cfg(any(test, feature = "test-support"))]
pub use report::FakeReporter;
