use std::thread;
use std::time::Duration;

use crate::cloud::{AwsCli, StackDescriptor};
use crate::config::AccountConfig;
use crate::deploy::DeploymentDriver;
use crate::errors::{Error, Result};
use crate::runner::CommandRunner;
use crate::scenario::{Scenario, MONITORING_STACK_NAME};
use crate::utils::console::Console;

/// What the operator picked from a numbered stack listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Cancelled,
    All,
    Indices(Vec<usize>),
}

/// Parses a teardown selection against a listing of `len` entries.
/// Indices are 1-based as printed; any invalid token rejects the whole
/// input so a typo never destroys an unintended stack.
pub fn parse_selection(input: &str, len: usize) -> Result<Selection> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(Selection::Cancelled);
    }
    if input.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }

    let mut indices = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        let idx: usize = token.parse().map_err(|_| {
            Error::IllegalArguments(
                "Invalid input. Please enter numbers separated by commas.".to_string(),
            )
        })?;
        if idx == 0 || idx > len {
            return Err(Error::IllegalArguments(format!("Invalid selection: {idx}")));
        }
        indices.push(idx);
    }
    if indices.is_empty() {
        return Err(Error::IllegalArguments(
            "Invalid input. Please enter numbers separated by commas.".to_string(),
        ));
    }
    Ok(Selection::Indices(indices))
}

/// Lists harness-owned stacks across both accounts and drives the
/// multi-select teardown flow.
pub struct StackInventory<'a> {
    config: &'a AccountConfig,
    runner: &'a dyn CommandRunner,
    /// Settle time between consecutive destroys.
    pause: Duration,
}

impl<'a> StackInventory<'a> {
    pub fn new(config: &'a AccountConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            pause: Duration::from_secs(2),
        }
    }

    #[cfg(test)]
    fn without_pause(mut self) -> Self {
        self.pause = Duration::ZERO;
        self
    }

    /// Gathers deployed harness stacks from both accounts. An account the
    /// CLI cannot reach contributes nothing rather than failing the whole
    /// listing.
    pub fn list_deployed_stacks(&self, console: &mut Console) -> Result<Vec<StackDescriptor>> {
        let mut stacks = Vec::new();

        let accounts = [
            (
                "monitoring",
                &self.config.monitoring_account_id,
                &self.config.monitoring_profile,
                &self.config.monitoring_region,
            ),
            (
                "application",
                &self.config.application_account_id,
                &self.config.application_profile,
                &self.config.application_region,
            ),
        ];
        for (label, account, profile, region) in accounts {
            let aws = AwsCli::new(self.runner, profile, region);
            match aws.list_stacks() {
                Ok(found) => {
                    for (name, status) in found {
                        stacks.push(StackDescriptor {
                            name,
                            status,
                            label: label.to_string(),
                            account: account.clone(),
                            profile: profile.clone(),
                            region: region.clone(),
                        });
                    }
                }
                Err(Error::CommandFailed { .. }) => {
                    console.warn(&format!("Could not list stacks in the {label} account"))?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(stacks)
    }

    /// Prints the inventory as a numbered table.
    pub fn print_stacks(
        &self,
        console: &mut Console,
        stacks: &[StackDescriptor],
    ) -> Result<()> {
        console.info(&format!(
            "    {:<45} {:<25} {:<15}",
            "Stack", "Status", "Account"
        ))?;
        console.rule(90)?;
        for (i, stack) in stacks.iter().enumerate() {
            console.info(&format!(
                "{:>2}. {:<45} {:<25} {:<15}",
                i + 1,
                stack.name,
                stack.status,
                stack.label
            ))?;
        }
        Ok(())
    }

    /// Shows every deployed stack and destroys the ones the operator
    /// picks, with a typed confirmation before anything is deleted.
    /// Returns whether at least one destroy succeeded.
    pub fn interactive_destroy(
        &self,
        console: &mut Console,
        driver: &DeploymentDriver<'_>,
    ) -> Result<bool> {
        console.header("Destroy Stacks")?;
        console.info("Scanning both accounts for deployed stacks...")?;
        let stacks = self.list_deployed_stacks(console)?;
        if stacks.is_empty() {
            console.warn("No stacks found to destroy")?;
            return Ok(false);
        }

        self.print_stacks(console, &stacks)?;
        console.info("Enter stack numbers to destroy (comma-separated), 'all', or 'q' to cancel")?;
        let input = console.prompt("Selection: ")?;
        let selection = match parse_selection(&input, stacks.len()) {
            Ok(selection) => selection,
            Err(Error::IllegalArguments(msg)) => {
                console.error(&msg)?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let picked: Vec<&StackDescriptor> = match &selection {
            Selection::Cancelled => {
                console.warn("Cancelled")?;
                return Ok(false);
            }
            Selection::All => stacks.iter().collect(),
            Selection::Indices(indices) => indices.iter().map(|&i| &stacks[i - 1]).collect(),
        };

        console.warn("The following stacks will be destroyed:")?;
        for stack in &picked {
            console.info(&format!("  - {} ({})", stack.name, stack.label))?;
        }
        let answer = console.prompt("Are you sure? Type 'yes' to confirm: ")?;
        if !answer.eq_ignore_ascii_case("yes") {
            console.warn("Cancelled")?;
            return Ok(false);
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        for (i, stack) in picked.iter().enumerate() {
            if i > 0 {
                thread::sleep(self.pause);
            }
            let result = if stack.name == MONITORING_STACK_NAME {
                driver.destroy_monitoring_account(console)?
            } else if let Some(scenario) = Scenario::from_stack_name(&stack.name) {
                driver.destroy_scenario(console, scenario)?
            } else {
                console.error(&format!("Unrecognized stack: {}", stack.name))?;
                false
            };
            if result {
                succeeded += 1;
            } else {
                failed += 1;
            }
        }

        console.header("Teardown Summary")?;
        console.info(&format!("Destroyed: {succeeded}"))?;
        if failed > 0 {
            console.warn(&format!("Failed or skipped: {failed}"))?;
        }
        Ok(succeeded > 0)
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod inventory_tests;
