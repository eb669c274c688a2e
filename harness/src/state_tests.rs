use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::{SessionState, STATE_FILE_NAME};
use crate::scenario::Scenario;

#[test]
fn round_trips_scenario_and_sink() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);

    let state = SessionState {
        current_scenario: Some(Scenario::FullStack),
        sink_arn: Some("arn:x".to_string()),
        last_updated: None,
    };
    state.save(&path).unwrap();

    let reloaded = SessionState::load(&path);
    assert_eq!(Some(Scenario::FullStack), reloaded.current_scenario);
    assert_eq!(Some("arn:x".to_string()), reloaded.sink_arn);
    assert!(reloaded.last_updated.is_some());
}

#[test]
fn uses_plain_numbers_in_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);

    SessionState {
        current_scenario: Some(Scenario::CrossAccount),
        sink_arn: None,
        last_updated: None,
    }
    .save(&path)
    .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(2, value["current_scenario"]);
    assert!(value["sink_arn"].is_null());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let state = SessionState::load(&dir.path().join(STATE_FILE_NAME));
    assert_eq!(SessionState::default(), state);
}

#[test]
fn corrupt_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    fs::write(&path, "{not json").unwrap();

    let state = SessionState::load(&path);
    assert_eq!(None, state.current_scenario);
    assert_eq!(None, state.sink_arn);
}
