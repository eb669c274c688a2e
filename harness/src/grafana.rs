use crate::cloud::AwsCli;
use crate::config::AccountConfig;
use crate::errors::{Error, Result};
use crate::runner::CommandRunner;
use crate::scenario::MONITORING_STACK_NAME;
use crate::utils::console::Console;

const INITIAL_PASSWORD: &str = "admin123!ChangeME";

/// Prints how to reach the Grafana instance the monitoring stack runs
/// when deployed with ADOT. Everything here is read-only guidance.
pub fn show_grafana_info(
    console: &mut Console,
    config: &AccountConfig,
    runner: &dyn CommandRunner,
) -> Result<bool> {
    console.header("Grafana Access")?;

    let aws = AwsCli::new(runner, &config.monitoring_profile, &config.monitoring_region);
    let outputs = match aws.stack_outputs(MONITORING_STACK_NAME) {
        Ok(outputs) => outputs,
        Err(Error::CommandFailed { .. }) => {
            console.error("Monitoring account stack not found!")?;
            console.info("Deploy the monitoring account with ADOT first (option A)")?;
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let Some(url) = outputs.get("GrafanaURL") else {
        console.warn("Grafana is not part of the current deployment")?;
        console.info("Redeploy with ADOT using option 'A'")?;
        return Ok(false);
    };

    if url == "Not exposed publicly" {
        console.warn("Grafana is running but not exposed publicly")?;
        console.info("Reach it through the VPN or with an SSM port-forward to the ECS task")?;
        return Ok(false);
    }

    console.success(&format!("Grafana URL: {url}"))?;
    console.info("Username: admin")?;
    console.info(&format!("Initial password: {INITIAL_PASSWORD}"))?;
    console.warn("Change the password after first login")?;

    if let Some(prometheus) = outputs.get("PrometheusConsole") {
        console.info(&format!("Prometheus console: {prometheus}"))?;
    }
    if let Some(collector) = outputs.get("ADOTCollectorConsole") {
        console.info(&format!("ADOT collector console: {collector}"))?;
    }
    Ok(true)
}

#[cfg(test)]
#[path = "grafana_tests.rs"]
mod grafana_tests;
