use crate::cloud::AwsCli;
use crate::config::AccountConfig;
use crate::errors::{Error, Result};
use crate::runner::CommandRunner;
use crate::scenario::Scenario;
use crate::utils::console::Console;

/// Quick post-deploy check: are the scenario's dashboards up, and did the
/// cross-account link land? Informational only.
pub fn test_scenario(
    console: &mut Console,
    config: &AccountConfig,
    runner: &dyn CommandRunner,
    scenario: Scenario,
) -> Result<bool> {
    console.header(&format!("Testing Scenario {}", scenario.number()))?;

    let aws = AwsCli::new(runner, &config.application_profile, &config.application_region);
    let marker = format!("Scenario{}", scenario.number());

    console.info("Checking dashboards...")?;
    match aws.list_dashboards() {
        Ok(dashboards) => {
            let matching: Vec<&String> = dashboards
                .iter()
                .filter(|name| name.contains(&marker))
                .collect();
            if matching.is_empty() {
                console.warn("No dashboards found yet (may take a few minutes)")?;
            } else {
                console.success(&format!("Found {} dashboard(s):", matching.len()))?;
                for name in matching {
                    console.info(&format!("  - {name}"))?;
                }
            }
        }
        Err(Error::CommandFailed { stderr, .. }) => {
            console.warn("Could not list dashboards")?;
            console.info(&stderr)?;
        }
        Err(e) => return Err(e),
    }

    console.info("Checking cross-account links...")?;
    match aws.list_oam_links() {
        Ok(0) => {
            console.info("No OAM links (expected for scenarios without cross-account)")?;
        }
        Ok(count) => {
            console.success(&format!("{count} OAM link(s) active"))?;
        }
        Err(Error::CommandFailed { stderr, .. }) => {
            console.warn("Could not list OAM links")?;
            console.info(&stderr)?;
        }
        Err(e) => return Err(e),
    }

    Ok(true)
}

#[cfg(test)]
#[path = "smoke_tests.rs"]
mod smoke_tests;
