use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::testing::{console_with_input, ok, test_config, FakeRunner, MONITORING_IDENTITY};

fn session(project: &std::path::Path) -> Session {
    Session {
        config: test_config(),
        state: SessionState::default(),
        project_root: project.to_path_buf(),
        state_file: project.join(crate::state::STATE_FILE_NAME),
    }
}

#[rstest]
#[case("2")]
#[case("6")]
fn cross_account_scenarios_require_a_sink(#[case] choice: &str) {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    let mut console = console_with_input("");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(menu.dispatch(&mut console, choice).unwrap());

    // nothing external may run before the precondition check
    assert_eq!(runner.calls.borrow().len(), 0);
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("requires monitoring account to be deployed first (option 0 or A)"));
}

#[test]
fn unknown_choice_warns_and_keeps_looping() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    let mut console = console_with_input("");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(menu.dispatch(&mut console, "x").unwrap());
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Invalid option"));
}

#[test]
fn quit_ends_the_loop() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    let mut console = console_with_input("");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(!menu.dispatch(&mut console, "q").unwrap());
    assert!(!menu.dispatch(&mut console, "Q").unwrap());
}

#[test]
fn successful_monitoring_deploy_records_the_sink() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("get-caller-identity", ok(MONITORING_IDENTITY))
        .respond("describe-stacks --stack-name CDKToolkit", ok("{}"))
        .respond(
            "OutputKey==`SinkArn`",
            ok("arn:aws:oam:us-east-1:111111111111:sink/abc\n"),
        );
    // container insights prompt, then deployment confirm
    let mut console = console_with_input("y\ny\n");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(menu.dispatch(&mut console, "0").unwrap());

    let saved = SessionState::load(&project.path().join(crate::state::STATE_FILE_NAME));
    assert_eq!(
        saved.sink_arn.as_deref(),
        Some("arn:aws:oam:us-east-1:111111111111:sink/abc")
    );
}

#[test]
fn load_generation_rejects_out_of_range_duration() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    let mut console = console_with_input("45\n");
    let mut session = session(project.path());
    session.state.current_scenario = Some(Scenario::Minimal);
    let mut menu = MenuController::new(session, &runner);

    assert!(menu.dispatch(&mut console, "g").unwrap());

    assert_eq!(runner.calls.borrow().len(), 0);
    let err = console.writer.err_to_stripped().unwrap();
    assert!(err.contains("Duration must be between 1 and 30 minutes"));
}

#[test]
fn load_generation_needs_a_current_scenario() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    let mut console = console_with_input("");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(menu.dispatch(&mut console, "g").unwrap());
    let out = console.writer.stripped().unwrap();
    assert!(out.contains("No scenario deployed yet"));
}

#[test]
fn destroy_current_scenario_clears_state_on_success() {
    let project = tempfile::tempdir().unwrap();
    crate::entrypoint::write_scenario_entrypoint(
        project.path(),
        &test_config(),
        Scenario::Minimal,
        None,
    )
    .unwrap();
    let runner = FakeRunner::new()
        .respond("describe-stacks --stack-name Scenario1Stack", ok("{}"));
    let mut console = console_with_input("y\n");
    let mut session = session(project.path());
    session.state.current_scenario = Some(Scenario::Minimal);
    let mut menu = MenuController::new(session, &runner);

    assert!(menu.dispatch(&mut console, "d").unwrap());

    let saved = SessionState::load(&project.path().join(crate::state::STATE_FILE_NAME));
    assert_eq!(saved.current_scenario, None);
}

#[test]
fn lowercase_g_and_uppercase_g_are_distinct_actions() {
    let project = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond(
        "describe-stacks --stack-name MonitoringAccountStack",
        ok(r#"[{"OutputKey": "GrafanaURL", "OutputValue": "http://g.example.com"}]"#),
    );
    // input feeds the trailing pause prompt
    let mut console = console_with_input("\n");
    let mut menu = MenuController::new(session(project.path()), &runner);

    assert!(menu.dispatch(&mut console, "G").unwrap());

    let out = console.writer.stripped().unwrap();
    assert!(out.contains("Grafana"));
    // no load-generation prompt ran
    assert!(!out.contains("Duration in minutes"));
}
