use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{console_with_input, failed, ok, test_config, FakeRunner};

fn outputs_json(pairs: &[(&str, &str)]) -> String {
    let entries: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!(r#"{{"OutputKey": "{k}", "OutputValue": "{v}"}}"#))
        .collect();
    format!("[{}]", entries.join(","))
}

#[test]
fn reports_missing_monitoring_stack() {
    let config = test_config();
    let runner = FakeRunner::new().respond(
        "describe-stacks --stack-name MonitoringAccountStack",
        failed(254, "Stack with id MonitoringAccountStack does not exist"),
    );
    let mut console = console_with_input("");

    let shown = show_grafana_info(&mut console, &config, &runner).unwrap();

    assert!(!shown);
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("Monitoring account stack not found!"));
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("option A"));
}

#[test]
fn suggests_adot_redeploy_when_url_absent() {
    let config = test_config();
    let runner = FakeRunner::new().respond(
        "describe-stacks",
        ok(&outputs_json(&[("SinkArn", "arn:aws:oam::111111111111:sink/abc")])),
    );
    let mut console = console_with_input("");

    let shown = show_grafana_info(&mut console, &config, &runner).unwrap();

    assert!(!shown);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Redeploy with ADOT using option 'A'"));
}

#[test]
fn prints_url_and_credentials() {
    let config = test_config();
    let runner = FakeRunner::new().respond(
        "describe-stacks",
        ok(&outputs_json(&[
            ("GrafanaURL", "http://grafana.example.com:3000"),
            ("PrometheusConsole", "http://prom.example.com:9090"),
        ])),
    );
    let mut console = console_with_input("");

    let shown = show_grafana_info(&mut console, &config, &runner).unwrap();

    assert!(shown);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("http://grafana.example.com:3000"));
    assert!(out.contains("Username: admin"));
    assert!(out.contains("admin123!ChangeME"));
    assert!(out.contains("http://prom.example.com:9090"));
    // the monitoring profile is queried, not the application one
    assert_eq!(runner.invocations("--profile monitoring"), 1);
}

#[test]
fn flags_private_grafana_endpoints() {
    let config = test_config();
    let runner = FakeRunner::new().respond(
        "describe-stacks",
        ok(&outputs_json(&[("GrafanaURL", "Not exposed publicly")])),
    );
    let mut console = console_with_input("");

    let shown = show_grafana_info(&mut console, &config, &runner).unwrap();

    assert!(!shown);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("not exposed publicly"));
}
