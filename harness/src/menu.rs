use std::path::PathBuf;

use crate::config::AccountConfig;
use crate::deploy::DeploymentDriver;
use crate::errors::Result;
use crate::grafana;
use crate::inventory::StackInventory;
use crate::load::LoadGenerator;
use crate::runner::CommandRunner;
use crate::scenario::{Scenario, MONITORING_STACK_NAME};
use crate::smoke;
use crate::state::SessionState;
use crate::utils::console::Console;

const DEFAULT_LOAD_MINUTES: u32 = 5;
const MAX_LOAD_MINUTES: u32 = 30;

/// Everything one interactive run carries between menu turns.
pub struct Session {
    pub config: AccountConfig,
    pub state: SessionState,
    pub project_root: PathBuf,
    pub state_file: PathBuf,
}

/// The interactive menu loop. Dispatches each choice to the deployment,
/// load, inventory and diagnostic flows and keeps the session state on
/// disk in sync with what actually happened.
pub struct MenuController<'a> {
    session: Session,
    runner: &'a dyn CommandRunner,
}

impl<'a> MenuController<'a> {
    pub fn new(session: Session, runner: &'a dyn CommandRunner) -> Self {
        Self { session, runner }
    }

    fn driver(&self) -> DeploymentDriver<'_> {
        DeploymentDriver::new(&self.session.config, &self.session.project_root, self.runner)
    }

    fn save_state(&self, console: &mut Console) -> Result<()> {
        if let Err(e) = self.session.state.save(&self.session.state_file) {
            console.warn(&format!("Failed to save state: {e}"))?;
        }
        Ok(())
    }

    fn show_menu(&self, console: &mut Console) -> Result<()> {
        console.header("AWS Monitoring Test Scenarios")?;
        if let Some(scenario) = self.session.state.current_scenario {
            console.success(&format!(
                "Current scenario: {} ({})",
                scenario.number(),
                scenario.display_name()
            ))?;
        }
        if self.session.state.sink_arn.is_some() {
            console.success("Monitoring account: deployed (sink available)")?;
        }

        console.info("")?;
        console.info("Monitoring Account")?;
        console.rule(40)?;
        console.info("  0. Deploy monitoring account (CloudWatch only)")?;
        console.info("  A. Deploy monitoring account with ADOT (adds Prometheus + Grafana)")?;
        console.info("  M. Destroy monitoring account")?;

        console.info("")?;
        console.info("Application Scenarios")?;
        console.rule(40)?;
        for scenario in Scenario::ALL {
            console.info(&format!(
                "  {}. {}{}",
                scenario.number(),
                scenario.display_name(),
                if scenario.requires_sink() {
                    " (needs monitoring account)"
                } else {
                    ""
                }
            ))?;
        }

        console.info("")?;
        console.info("Actions")?;
        console.rule(40)?;
        console.info("  l. List deployed stacks")?;
        console.info("  t. Test current scenario")?;
        console.info("  g. Generate load for current scenario")?;
        console.info("  G. Show Grafana access info")?;
        console.info("  d. Destroy current scenario")?;
        console.info("  D. Destroy stacks (interactive)")?;
        console.info("  q. Quit")?;
        Ok(())
    }

    pub fn run(&mut self, console: &mut Console) -> Result<()> {
        loop {
            self.show_menu(console)?;
            let choice = console.prompt("\nSelect option: ")?;
            if !self.dispatch(console, &choice)? {
                return Ok(());
            }
        }
    }

    /// Handles one menu choice; `false` ends the loop. Single letters
    /// with two meanings (g/G, d/D) dispatch case-sensitively.
    pub fn dispatch(&mut self, console: &mut Console, choice: &str) -> Result<bool> {
        match choice {
            "q" | "Q" => {
                console.info("Exiting...")?;
                return Ok(false);
            }
            "0" => self.deploy_monitoring(console, false)?,
            "A" | "a" => self.deploy_monitoring_with_adot(console)?,
            "1" | "2" | "3" | "4" | "5" | "6" => {
                // single digits within the scenario range only
                if let Ok(scenario) = Scenario::try_from(choice.as_bytes()[0] - b'0') {
                    self.deploy_scenario(console, scenario)?;
                }
            }
            "l" | "L" => self.list_stacks(console)?,
            "t" | "T" => self.test_current_scenario(console)?,
            "g" => self.generate_load(console)?,
            "G" => {
                grafana::show_grafana_info(console, &self.session.config, self.runner)?;
                console.pause()?;
            }
            "d" => self.destroy_current_scenario(console)?,
            "D" => self.interactive_destroy(console)?,
            "M" | "m" => self.destroy_monitoring(console)?,
            _ => console.warn("Invalid option")?,
        }
        Ok(true)
    }

    fn prompt_container_insights(&self, console: &mut Console) -> Result<bool> {
        let answer = console.prompt("Enable Container Insights? (Y/n): ")?;
        Ok(!answer.eq_ignore_ascii_case("n"))
    }

    fn deploy_monitoring(&mut self, console: &mut Console, adot: bool) -> Result<()> {
        let container_insights = self.prompt_container_insights(console)?;
        let sink = self
            .driver()
            .deploy_monitoring_account(console, adot, container_insights)?;
        if let Some(arn) = sink {
            self.session.state.sink_arn = Some(arn);
            console.success("Monitoring account ready for cross-account scenarios")?;
            self.save_state(console)?;
        }
        Ok(())
    }

    fn deploy_monitoring_with_adot(&mut self, console: &mut Console) -> Result<()> {
        console.info("ADOT adds an ECS cluster running the ADOT collector, Prometheus and Grafana")?;
        console.warn("This deploys billable ECS and load balancer resources")?;
        if !console.confirm("Continue?")? {
            return Ok(());
        }
        self.deploy_monitoring(console, true)
    }

    fn deploy_scenario(&mut self, console: &mut Console, scenario: Scenario) -> Result<()> {
        let mut sink = self.session.state.sink_arn.clone();
        if scenario.requires_sink() && sink.is_none() {
            console.error(&format!(
                "Scenario {} requires monitoring account to be deployed first (option 0 or A)",
                scenario.number()
            ))?;
            return Ok(());
        }
        if !scenario.requires_sink() && sink.is_some() {
            if !console.confirm("Use cross-account monitoring?")? {
                sink = None;
            }
        }

        if self
            .driver()
            .deploy_scenario(console, scenario, sink.as_deref())?
        {
            self.session.state.current_scenario = Some(scenario);
            console.success(&format!("Current scenario set to: {}", scenario.number()))?;
            self.save_state(console)?;
        }
        Ok(())
    }

    fn list_stacks(&self, console: &mut Console) -> Result<()> {
        console.header("Deployed Stacks")?;
        let inventory = StackInventory::new(&self.session.config, self.runner);
        let stacks = inventory.list_deployed_stacks(console)?;
        if stacks.is_empty() {
            console.warn("No stacks deployed")?;
        } else {
            inventory.print_stacks(console, &stacks)?;
        }
        console.pause()?;
        Ok(())
    }

    fn test_current_scenario(&self, console: &mut Console) -> Result<()> {
        match self.session.state.current_scenario {
            Some(scenario) => {
                smoke::test_scenario(console, &self.session.config, self.runner, scenario)?;
                console.pause()?;
            }
            None => console.warn("No scenario deployed yet")?,
        }
        Ok(())
    }

    fn generate_load(&self, console: &mut Console) -> Result<()> {
        let Some(scenario) = self.session.state.current_scenario else {
            console.warn("No scenario deployed yet")?;
            return Ok(());
        };

        let answer = console.prompt(&format!(
            "Duration in minutes [{DEFAULT_LOAD_MINUTES}]: "
        ))?;
        let minutes = if answer.is_empty() {
            DEFAULT_LOAD_MINUTES
        } else {
            match answer.parse::<u32>() {
                Ok(m) if (1..=MAX_LOAD_MINUTES).contains(&m) => m,
                _ => {
                    console.error(&format!(
                        "Duration must be between 1 and {MAX_LOAD_MINUTES} minutes"
                    ))?;
                    return Ok(());
                }
            }
        };

        console.warn("Generated traffic incurs normal AWS charges")?;
        if !console.confirm(&format!("Generate load for {minutes} minute(s)?"))? {
            return Ok(());
        }
        LoadGenerator::new(&self.session.config, self.runner)
            .generate_load(console, scenario, minutes)?;
        Ok(())
    }

    fn destroy_current_scenario(&mut self, console: &mut Console) -> Result<()> {
        match self.session.state.current_scenario {
            Some(scenario) => {
                if self.driver().destroy_scenario(console, scenario)? {
                    self.session.state.current_scenario = None;
                    self.save_state(console)?;
                }
            }
            None => console.warn("No scenario to destroy")?,
        }
        Ok(())
    }

    fn interactive_destroy(&mut self, console: &mut Console) -> Result<()> {
        let inventory = StackInventory::new(&self.session.config, self.runner);
        let driver = self.driver();
        if !inventory.interactive_destroy(console, &driver)? {
            return Ok(());
        }

        // reconcile state with what actually survived the teardown
        let remaining = inventory.list_deployed_stacks(console)?;
        if !remaining.iter().any(|s| s.name == MONITORING_STACK_NAME) {
            self.session.state.sink_arn = None;
        }
        if let Some(scenario) = self.session.state.current_scenario {
            if !remaining.iter().any(|s| s.name == scenario.stack_name()) {
                self.session.state.current_scenario = None;
            }
        }
        self.save_state(console)?;
        Ok(())
    }

    fn destroy_monitoring(&mut self, console: &mut Console) -> Result<()> {
        if self.driver().destroy_monitoring_account(console)? {
            self.session.state.sink_arn = None;
            self.save_state(console)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod menu_tests;
