// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status and storage reporting adapter.

use async_trait::async_trait;
use shunt_core::Job;
use thiserror::Error;

/// Errors from reporting a finalized record downstream.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{service} update failed: {reason}")]
    Transport { service: &'static str, reason: String },

    #[error("{service} update failed (HTTP {code})")]
    Rejected { service: &'static str, code: u16 },
}

/// Adapter for the status and storage services.
#[async_trait]
pub trait ReportAdapter: Send + Sync + 'static {
    /// Report a finalized record to the status service.
    async fn report_status(&self, job: &Job) -> Result<(), ReportError>;

    /// Hand a finalized record to the storage service.
    async fn report_storage(&self, job: &Job) -> Result<(), ReportError>;
}

/// HTTP reporter: POSTs the JSON-serialized record; exactly 200 is success.
///
/// The client is shared and carries a fixed per-call timeout, so a stalled
/// service surfaces as a transport failure instead of blocking the
/// dispatch loop forever.
#[derive(Clone)]
pub struct HttpReporter {
    client: reqwest::Client,
    status_url: String,
    storage_url: String,
}

impl HttpReporter {
    pub fn new(client: reqwest::Client, status_addr: &str, storage_addr: &str) -> Self {
        Self {
            client,
            status_url: format!("http://{status_addr}"),
            storage_url: format!("http://{storage_addr}"),
        }
    }

    async fn post(&self, service: &'static str, url: &str, job: &Job) -> Result<(), ReportError> {
        let response = self
            .client
            .post(url)
            .json(job)
            .send()
            .await
            .map_err(|err| ReportError::Transport { service, reason: err.to_string() })?;

        let code = response.status().as_u16();
        if code != 200 {
            return Err(ReportError::Rejected { service, code });
        }
        Ok(())
    }
}

#[async_trait]
impl ReportAdapter for HttpReporter {
    async fn report_status(&self, job: &Job) -> Result<(), ReportError> {
        self.post("status", &self.status_url, job).await
    }

    async fn report_storage(&self, job: &Job) -> Result<(), ReportError> {
        self.post("storage", &self.storage_url, job).await
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ReportAdapter, ReportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shunt_core::Job;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeReporterState {
        status_calls: Vec<Job>,
        storage_calls: Vec<Job>,
        fail_status: bool,
        fail_storage: bool,
    }

    /// Fake reporter recording every call.
    #[derive(Clone, Default)]
    pub struct FakeReporter {
        inner: Arc<Mutex<FakeReporterState>>,
    }

    impl FakeReporter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make status reports fail.
        pub fn fail_status(&self) {
            self.inner.lock().fail_status = true;
        }

        /// Make storage reports fail.
        pub fn fail_storage(&self) {
            self.inner.lock().fail_storage = true;
        }

        pub fn status_calls(&self) -> Vec<Job> {
            self.inner.lock().status_calls.clone()
        }

        pub fn storage_calls(&self) -> Vec<Job> {
            self.inner.lock().storage_calls.clone()
        }
    }

    #[async_trait]
    impl ReportAdapter for FakeReporter {
        async fn report_status(&self, job: &Job) -> Result<(), ReportError> {
            let mut state = self.inner.lock();
            if state.fail_status {
                return Err(ReportError::Rejected { service: "status", code: 500 });
            }
            state.status_calls.push(job.clone());
            Ok(())
        }

        async fn report_storage(&self, job: &Job) -> Result<(), ReportError> {
            let mut state = self.inner.lock();
            if state.fail_storage {
                return Err(ReportError::Rejected { service: "storage", code: 500 });
            }
            state.storage_calls.push(job.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeReporter;
