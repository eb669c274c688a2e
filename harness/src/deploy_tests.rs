use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{
    console_with_input, failed, ok, test_config, FakeRunner, APPLICATION_IDENTITY,
    MONITORING_IDENTITY,
};

#[test]
fn deploy_monitoring_succeeds_and_returns_sink_arn() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("get-caller-identity", ok(MONITORING_IDENTITY))
        .respond("describe-stacks --stack-name CDKToolkit", ok("{}"))
        .respond(
            "OutputKey==`SinkArn`",
            ok("arn:aws:oam:us-east-1:111111111111:sink/abc\n"),
        );
    let mut console = console_with_input("y\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let sink = driver
        .deploy_monitoring_account(&mut console, true, true)
        .unwrap();

    assert_eq!(sink.as_deref(), Some("arn:aws:oam:us-east-1:111111111111:sink/abc"));
    assert_eq!(runner.invocations("cdk synth"), 1);
    assert_eq!(runner.invocations("cdk deploy"), 1);
    assert!(project.path().join("bin/deploy-monitoring.ts").exists());
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("ADOT Monitoring: ENABLED"));
    assert!(out.contains("Monitoring account deployed!"));
}

#[test]
fn deploy_monitoring_stops_on_identity_mismatch() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    // profile resolves to the application account instead
    let runner = FakeRunner::new().respond("get-caller-identity", ok(APPLICATION_IDENTITY));
    let mut console = console_with_input("");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let sink = driver
        .deploy_monitoring_account(&mut console, false, true)
        .unwrap();

    assert_eq!(sink, None);
    assert_eq!(runner.invocations("cdk"), 0);
    assert!(!project.path().join("bin/deploy-monitoring.ts").exists());
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("Profile resolves to account 222222222222, expected 111111111111"));
}

#[test]
fn deploy_monitoring_prints_login_hint_when_credentials_fail() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond(
        "get-caller-identity",
        failed(255, "Error loading SSO Token: Token for monitoring does not exist"),
    );
    let mut console = console_with_input("");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let sink = driver
        .deploy_monitoring_account(&mut console, false, true)
        .unwrap();

    assert_eq!(sink, None);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("aws sso login --profile monitoring"));
}

#[test]
fn deploy_monitoring_respects_cancellation() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("get-caller-identity", ok(MONITORING_IDENTITY))
        .respond("describe-stacks --stack-name CDKToolkit", ok("{}"));
    let mut console = console_with_input("n\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let sink = driver
        .deploy_monitoring_account(&mut console, false, true)
        .unwrap();

    assert_eq!(sink, None);
    assert_eq!(runner.invocations("cdk synth"), 1);
    assert_eq!(runner.invocations("cdk deploy"), 0);
}

#[test]
fn deploy_scenario_offers_bootstrap_when_toolkit_missing() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("get-caller-identity", ok(APPLICATION_IDENTITY))
        .respond(
            "describe-stacks --stack-name CDKToolkit",
            failed(254, "Stack with id CDKToolkit does not exist"),
        );
    // yes to bootstrap, yes to deploy
    let mut console = console_with_input("y\ny\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let deployed = driver
        .deploy_scenario(&mut console, Scenario::Minimal, None)
        .unwrap();

    assert!(deployed);
    assert_eq!(
        runner.invocations("cdk bootstrap aws://222222222222/us-west-2"),
        1
    );
    assert!(project.path().join("bin/deploy-scenario1.ts").exists());
}

#[test]
fn deploy_scenario_passes_sink_through_to_entrypoint() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("get-caller-identity", ok(APPLICATION_IDENTITY))
        .respond("describe-stacks --stack-name CDKToolkit", ok("{}"));
    let mut console = console_with_input("y\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let arn = "arn:aws:oam:us-east-1:111111111111:sink/abc";
    let deployed = driver
        .deploy_scenario(&mut console, Scenario::CrossAccount, Some(arn))
        .unwrap();

    assert!(deployed);
    let entry = std::fs::read_to_string(project.path().join("bin/deploy-scenario2.ts")).unwrap();
    assert!(entry.contains(arn));
}

#[test]
fn destroy_scenario_skips_destroy_when_stack_absent() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond(
        "describe-stacks --stack-name Scenario3Stack",
        failed(254, "Stack with id Scenario3Stack does not exist"),
    );
    let mut console = console_with_input("");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let destroyed = driver
        .destroy_scenario(&mut console, Scenario::FullStack)
        .unwrap();

    assert!(destroyed);
    assert_eq!(runner.invocations("destroy"), 0);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Scenario3Stack does not exist (already deleted)"));
}

#[test]
fn destroy_scenario_requires_entrypoint_file() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("describe-stacks --stack-name Scenario1Stack", ok("{}"));
    let mut console = console_with_input("y\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let destroyed = driver
        .destroy_scenario(&mut console, Scenario::Minimal)
        .unwrap();

    assert!(!destroyed);
    assert_eq!(runner.invocations("destroy"), 0);
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("Deployment file not found"));
}

#[test]
fn destroy_scenario_runs_cdk_destroy_and_cleans_up() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    entrypoint::write_scenario_entrypoint(project.path(), &config, Scenario::Minimal, None)
        .unwrap();
    let runner = FakeRunner::new()
        .respond("describe-stacks --stack-name Scenario1Stack", ok("{}"));
    let mut console = console_with_input("y\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let destroyed = driver
        .destroy_scenario(&mut console, Scenario::Minimal)
        .unwrap();

    assert!(destroyed);
    assert_eq!(runner.invocations("cdk destroy"), 1);
    assert!(!project.path().join("bin/deploy-scenario1.ts").exists());
}

#[test]
fn destroy_monitoring_recreates_missing_entrypoint() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("describe-stacks --stack-name MonitoringAccountStack", ok("{}"));
    let mut console = console_with_input("y\n");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    let destroyed = driver.destroy_monitoring_account(&mut console).unwrap();

    assert!(destroyed);
    assert_eq!(runner.invocations("cdk destroy"), 1);
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Recreating deployment file for destruction..."));
    // recreated only to drive the destroy, then removed again
    assert!(!project.path().join("bin/deploy-monitoring.ts").exists());
}

#[test]
fn build_project_reports_npm_failure() {
    let config = test_config();
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond("npm run build", failed(1, "tsc: error TS2304"));
    let mut console = console_with_input("");

    let driver = DeploymentDriver::new(&config, project.path(), &runner);
    assert!(!driver.build_project(&mut console).unwrap());
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("Build failed"));
}
