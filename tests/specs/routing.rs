// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intake-to-router scenarios for records arriving on the job-manager
//! queue.

use crate::prelude::*;

#[tokio::test]
async fn provenance_violation_funnels_into_failure_finalization() {
    // A record claiming a wrapper origin shows up on the job-manager
    // queue: intake flags it, the router retires it through status.
    let stray = Job::builder().id("stray-1").last_origin("first").build();
    let run = run_pipeline(&["first", "second"], vec![encoded(&stray)]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();

    assert!(run.router_broker.published().is_empty());
    let status = run.reporter.status_calls();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].id, "stray-1", "the ID survives the whole journey");
    assert_eq!(status[0].error, "LastOrigin can only be 'JobManager'");
    assert!(!status[0].status);
    assert!(status[0].finished);
    assert!(run.reporter.storage_calls().is_empty());
}

#[tokio::test]
async fn malformed_body_is_retired_through_status() {
    let run = run_pipeline(&["first"], vec![b"{broken".to_vec()]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();

    let status = run.reporter.status_calls();
    assert_eq!(status.len(), 1);
    assert!(!status[0].status);
    assert!(status[0].finished);
    assert!(status[0].error.contains("decode"));
    assert!(run.router_broker.published().is_empty());
}

#[tokio::test]
async fn every_delivery_is_acked_exactly_once() {
    let stray = Job::builder().id("a").last_origin("first").build();
    let run =
        run_pipeline(&["first"], vec![encoded(&stray), b"junk".to_vec()]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();
    assert_eq!(run.intake_broker.acked(), 2);
    assert_eq!(run.reporter.status_calls().len(), 2);
}

#[tokio::test]
async fn records_flow_through_in_arrival_order() {
    let first = Job::builder().id("a").last_origin("first").build();
    let second = Job::builder().id("b").last_origin("first").build();
    let run = run_pipeline(&["first"], vec![encoded(&first), encoded(&second)]).await;

    run.intake_result.unwrap();
    run.router_result.unwrap();

    let ids: Vec<_> =
        run.reporter.status_calls().iter().map(|job| job.id.to_string()).collect();
    assert_eq!(ids, ["a", "b"]);
}
