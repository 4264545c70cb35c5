// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire codec for Job Records.
//!
//! Body format: JSON, field names fixed by the upstream job manager. The
//! broker frames whole messages, so no length prefix is needed.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use shunt_core::Job;
use thiserror::Error;

/// Codec errors
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed job record: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode job record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Encode a job record into a message body.
pub fn encode(job: &Job) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(job).map_err(WireError::Encode)
}

/// Decode a message body into a job record.
///
/// Malformed input yields a distinct error; it never produces a partial
/// record.
pub fn decode(body: &[u8]) -> Result<Job, WireError> {
    serde_json::from_slice(body).map_err(WireError::Malformed)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
