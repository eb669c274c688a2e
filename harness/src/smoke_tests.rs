use super::*;
use crate::testing::{console_with_input, ok, test_config, FakeRunner};

const DASHBOARDS: &str = r#"{"DashboardEntries": [
    {"DashboardName": "Scenario1-Lambda-Monitoring"},
    {"DashboardName": "Scenario3-FullStack"}
]}"#;

#[test]
fn reports_matching_dashboards_and_links() {
    let config = test_config();
    let runner = FakeRunner::new()
        .respond("list-dashboards", ok(DASHBOARDS))
        .respond("oam list-links", ok(r#"{"Items": [{"Arn": "arn:aws:oam::222222222222:link/x"}]}"#));
    let mut console = console_with_input("");

    assert!(test_scenario(&mut console, &config, &runner, Scenario::Minimal).unwrap());

    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Scenario1-Lambda-Monitoring"));
    assert!(!out.contains("Scenario3-FullStack"));
    assert!(out.contains("1 OAM link(s) active"));
}

#[test]
fn notes_when_dashboards_are_not_up_yet() {
    let config = test_config();
    let runner = FakeRunner::new()
        .respond("list-dashboards", ok(r#"{"DashboardEntries": []}"#))
        .respond("oam list-links", ok(r#"{"Items": []}"#));
    let mut console = console_with_input("");

    assert!(test_scenario(&mut console, &config, &runner, Scenario::CustomMetrics).unwrap());

    let out = console.writer.stripped().unwrap();
    assert!(out.contains("No dashboards found yet (may take a few minutes)"));
    assert!(out.contains("No OAM links (expected for scenarios without cross-account)"));
}
