// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shutdown broadcast: a `Die` record fans out to every stage queue and
//! brings both workers down.

use crate::prelude::*;

#[tokio::test]
async fn die_fans_out_to_every_stage_queue_in_order() {
    let die = Job::builder().id("ctl-1").kind(JobKind::Die).build();
    let run = run_pipeline(&["first", "second"], vec![encoded(&die)]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();

    let published = run.router_broker.published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].0, "first");
    assert_eq!(published[1].0, "second");

    for (queue, body) in &published {
        let copy = shunt_wire::decode(body).unwrap();
        assert_eq!(copy.kind, JobKind::Die);
        assert_eq!(copy.id, "ctl-1");
        assert_eq!(&copy.required_origin, queue, "each stage gets its own addressed copy");
        assert_eq!(copy.last_origin, JOB_MANAGER);
    }

    assert!(run.reporter.status_calls().is_empty());
    assert!(run.reporter.storage_calls().is_empty());
}

#[tokio::test]
async fn die_leaves_later_deliveries_unconsumed() {
    let die = Job::builder().id("ctl-1").kind(JobKind::Die).build();
    let late = Job::builder().id("late").last_origin("first").build();
    let run = run_pipeline(&["first"], vec![encoded(&die), encoded(&late)]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();

    // Only the Die itself was acked; the late record stays on the queue
    // for whoever consumes it next.
    assert_eq!(run.intake_broker.acked(), 1);
    assert!(run.reporter.status_calls().is_empty());
    assert_eq!(run.router_broker.published().len(), 1);
}

#[tokio::test]
async fn router_addressed_die_short_circuits_the_loop() {
    // Inject the post-broadcast control record straight into the hand-off
    // channel, the way a dying stage's response would arrive.
    let config = config(&["first"]);
    let broker = FakeBroker::new();
    let reporter = FakeReporter::new();
    let (tx, rx) = tokio::sync::mpsc::channel(1);

    let router = PipelineRouter::new(broker.clone(), reporter.clone(), &config, rx);
    let handle = tokio::spawn(router.run());

    let die = Job::builder()
        .kind(JobKind::Die)
        .last_origin(JOB_ROUTER)
        .required_origin(JOB_ROUTER)
        .build();
    tx.send(die).await.unwrap();

    handle.await.unwrap().unwrap();
    assert!(broker.published().is_empty());
    assert!(reporter.status_calls().is_empty());
    assert!(reporter.storage_calls().is_empty());
}
