//! Probes against a real headless Chrome.
//!
//! These tests require Chrome/Chromium to be installed and are marked #[ignore]
//! by default. Run with: cargo test --package compat-engine -- --ignored

use std::sync::Arc;

use compat_engine::chromium::user_agent;
use compat_engine::{CaseStatus, ChromiumConfig, ChromiumEngine, MatrixRunner, RunOptions};
use compat_matrix::{Catalog, Expectations, ProbeCase, TargetEnv};

async fn run(cases: Vec<ProbeCase>, env: TargetEnv) -> compat_engine::RunReport {
    let mut catalog = Catalog::new();
    for case in cases {
        catalog.insert(case, "inline").expect("duplicate probe");
    }

    let engine = Arc::new(
        ChromiumEngine::launch(ChromiumConfig::default())
            .await
            .expect("failed to launch browser"),
    );
    let report = MatrixRunner::new(engine.clone(), RunOptions::default())
        .run(&catalog, env)
        .await;
    engine.close().await.expect("failed to close browser");
    report
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn builtin_probes_match_chrome() {
    let report = run(
        vec![
            ProbeCase::element("div", Expectations::new(["[object HTMLDivElement]"])).unwrap(),
            ProbeCase::global("bogus", Expectations::new(["exception"])).unwrap(),
            ProbeCase::element("a", Expectations::new([""])).unwrap(),
            ProbeCase::style("div", Expectations::new(["", "block"])).unwrap(),
        ],
        TargetEnv::Chrome,
    )
    .await;

    for case in &report.cases {
        assert_eq!(case.status, CaseStatus::Pass, "{}: {:?}", case.id, case);
    }
}

#[tokio::test]
#[ignore]
async fn user_agent_follows_target() {
    let case = ProbeCase::global(
        "navigator.userAgent",
        Expectations::new([user_agent(TargetEnv::Chrome)])
            .with_override(TargetEnv::InternetExplorer, [user_agent(TargetEnv::InternetExplorer)]),
    )
    .unwrap();

    let report = run(vec![case], TargetEnv::InternetExplorer).await;

    assert!(report.is_success(), "{:?}", report.cases[0]);
}
