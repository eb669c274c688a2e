use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::scenario::Scenario;

pub const STATE_FILE_NAME: &str = ".monitoring-state.json";

/// Session state carried between runs: the scenario currently deployed and
/// the cross-account sink ARN, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub current_scenario: Option<Scenario>,
    #[serde(default)]
    pub sink_arn: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SessionState {
    /// A missing or unreadable state file means "no prior session"; this
    /// never fails.
    pub fn load(path: &Path) -> SessionState {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Persists the state, stamping `last_updated`. Callers treat failures
    /// as warnings; a lost state file only costs the operator a re-deploy
    /// prompt on the next run.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = SessionState {
            last_updated: Some(Utc::now()),
            ..self.clone()
        };
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
