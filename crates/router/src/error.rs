// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker error types.

use crate::adapters::{BrokerError, ReportError};
use crate::dispatch::RouteError;
use thiserror::Error;

/// Fatal intake errors
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("dispatch loop is gone, cannot hand off record")]
    ChannelClosed,
}

/// Fatal router errors
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("routing error: {0}")]
    Route(#[from] RouteError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("wire error: {0}")]
    Wire(#[from] shunt_wire::WireError),
}
