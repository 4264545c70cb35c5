// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the scenario tests.

pub use shunt_core::{Config, Job, JobKind, JOB_MANAGER, JOB_ROUTER};
pub use shunt_router::{FakeBroker, FakeReporter, IntakeError, JobIntake, PipelineRouter, RouterError};

/// Build a config through the real TOML parser.
pub fn config(stages: &[&str]) -> Config {
    let mut raw = String::from(
        r#"
[server]
host = "localhost"
port = 5672
user = "guest"
password = "guest"
"#,
    );
    for stage in stages {
        raw.push_str(&format!(
            r#"
[[wrappers]]
name = "{stage}"
durable = true
delete_when_unused = false
exclusive = false
no_wait = false
auto_ack = false
"#
        ));
    }
    raw.push_str(
        r#"
[jobs]
name = "incoming_jobs"
durable = true
delete_when_unused = false
exclusive = false
no_wait = false
auto_ack = false

[status]
name = "127.0.0.1:8001"

[storage]
name = "127.0.0.1:8002"
"#,
    );
    Config::from_toml(&raw).unwrap()
}

/// Everything a scenario can observe after a run.
pub struct PipelineRun {
    pub intake_broker: FakeBroker,
    pub router_broker: FakeBroker,
    pub reporter: FakeReporter,
    pub intake_result: Result<(), IntakeError>,
    pub router_result: Result<(), RouterError>,
}

/// Feed scripted job-manager deliveries through intake, the single-slot
/// channel, and the dispatch loop, exactly as `shuntd` wires them.
pub async fn run_pipeline(stages: &[&str], deliveries: Vec<Vec<u8>>) -> PipelineRun {
    let config = config(stages);

    let intake_broker = FakeBroker::new();
    for body in deliveries {
        intake_broker.push_delivery(body);
    }
    let router_broker = FakeBroker::new();
    let reporter = FakeReporter::new();

    let (tx, rx) = tokio::sync::mpsc::channel(1);
    let intake = JobIntake::new(intake_broker.clone(), &config, tx);
    let router = PipelineRouter::new(router_broker.clone(), reporter.clone(), &config, rx);

    let intake_task = tokio::spawn(intake.run());
    let router_result = router.run().await;
    let intake_result = intake_task.await.unwrap();

    PipelineRun { intake_broker, router_broker, reporter, intake_result, router_result }
}

pub fn encoded(job: &Job) -> Vec<u8> {
    shunt_wire::encode(job).unwrap()
}
