// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Job Record exchanged between the job manager, the wrapper stages,
//! and the router.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a logical job.
///
/// Minted by the job manager and preserved verbatim across every hop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new JobId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this JobId.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Kind of work a record requests.
///
/// `Die` is a control signal: it carries no payload semantics and triggers
/// the shutdown broadcast on intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    Work,
    Die,
}

impl JobKind {
    /// Check if this record is the shutdown control signal.
    pub fn is_die(&self) -> bool {
        matches!(self, JobKind::Die)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobKind::Work => "work",
            JobKind::Die => "die",
        })
    }
}

/// A job record.
///
/// Field names on the wire match the upstream job manager's JSON encoding.
/// `required_origin` doubles as an explicit target-stage override and the
/// router-addressed control marker; see [`crate::RoutingTarget`] for the
/// resolved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "ID")]
    pub id: JobId,
    #[serde(rename = "Type")]
    pub kind: JobKind,
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "Finished")]
    pub finished: bool,
    #[serde(rename = "LastOrigin")]
    pub last_origin: String,
    #[serde(rename = "RequiredOrigin", default)]
    pub required_origin: String,
    #[serde(rename = "Error", default)]
    pub error: String,
}

impl Job {
    /// Mark the record as failed with a diagnostic.
    ///
    /// Finalization stays with the router; this only flips the outcome.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = false;
        self.error = error.into();
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct JobBuilder {
    id: JobId,
    kind: JobKind,
    status: bool,
    finished: bool,
    last_origin: String,
    required_origin: String,
    error: String,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for JobBuilder {
    fn default() -> Self {
        Self {
            id: JobId::new("job-1"),
            kind: JobKind::Work,
            status: true,
            finished: false,
            last_origin: crate::JOB_MANAGER.to_string(),
            required_origin: String::new(),
            error: String::new(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobBuilder {
    pub fn id(mut self, v: impl Into<JobId>) -> Self {
        self.id = v.into();
        self
    }

    pub fn kind(mut self, v: JobKind) -> Self {
        self.kind = v;
        self
    }

    pub fn status(mut self, v: bool) -> Self {
        self.status = v;
        self
    }

    pub fn finished(mut self, v: bool) -> Self {
        self.finished = v;
        self
    }

    pub fn last_origin(mut self, v: impl Into<String>) -> Self {
        self.last_origin = v.into();
        self
    }

    pub fn required_origin(mut self, v: impl Into<String>) -> Self {
        self.required_origin = v.into();
        self
    }

    pub fn error(mut self, v: impl Into<String>) -> Self {
        self.error = v.into();
        self
    }

    pub fn build(self) -> Job {
        Job {
            id: self.id,
            kind: self.kind,
            status: self.status,
            finished: self.finished,
            last_origin: self.last_origin,
            required_origin: self.required_origin,
            error: self.error,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    /// Create a builder with test defaults: a `Work` record fresh from the
    /// job manager.
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
