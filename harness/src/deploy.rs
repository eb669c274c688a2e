use std::fs;
use std::path::Path;

use crate::cloud::{AwsCli, CdkCli, StackPresence, BOOTSTRAP_STACK_NAME};
use crate::config::AccountConfig;
use crate::entrypoint;
use crate::errors::{Error, Result};
use crate::runner::{CommandLine, CommandRunner};
use crate::scenario::{Scenario, MONITORING_STACK_NAME};
use crate::utils::console::Console;

/// Output key the monitoring stack exposes its OAM sink under.
pub const SINK_OUTPUT_KEY: &str = "SinkArn";

/// Orchestrates the synth/deploy/destroy sequences for the monitoring
/// account and the application scenarios. Every cloud interaction goes
/// through the injected runner; failures of external commands are printed
/// and surface as a negative result, never as a propagated error, so the
/// operator can simply re-invoke the menu action.
pub struct DeploymentDriver<'a> {
    config: &'a AccountConfig,
    project_root: &'a Path,
    runner: &'a dyn CommandRunner,
}

impl<'a> DeploymentDriver<'a> {
    pub fn new(
        config: &'a AccountConfig,
        project_root: &'a Path,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            project_root,
            runner,
        }
    }

    fn monitoring_aws(&self) -> AwsCli<'a> {
        AwsCli::new(
            self.runner,
            &self.config.monitoring_profile,
            &self.config.monitoring_region,
        )
    }

    fn application_aws(&self) -> AwsCli<'a> {
        AwsCli::new(
            self.runner,
            &self.config.application_profile,
            &self.config.application_region,
        )
    }

    /// One-shot `npm run build` in the project root before the first menu
    /// turn.
    pub fn build_project(&self, console: &mut Console) -> Result<bool> {
        console.info("Building project...")?;
        let output = self
            .runner
            .run(&CommandLine::new("npm", ["run", "build"]).cwd(self.project_root))?;
        if output.success() {
            console.success("Build complete")?;
            Ok(true)
        } else {
            console.error("Build failed")?;
            console.info(&output.stderr)?;
            Ok(false)
        }
    }

    /// Confirms the resolved credentials belong to `expected_account`.
    /// A CLI failure or an account mismatch is reported and yields `false`;
    /// nothing external beyond the identity call has run at that point.
    fn verify_identity(
        &self,
        console: &mut Console,
        aws: &AwsCli<'_>,
        expected_account: &str,
        profile: &str,
    ) -> Result<bool> {
        console.info("Verifying AWS credentials...")?;
        match aws.caller_identity() {
            Ok(identity) => {
                if identity.account != expected_account {
                    console.error(&format!(
                        "Profile resolves to account {}, expected {}",
                        identity.account, expected_account
                    ))?;
                    return Ok(false);
                }
                console.success(&format!("Authenticated as: {}", identity.arn))?;
                Ok(true)
            }
            Err(Error::CommandFailed { .. }) => {
                console.error(&format!("Cannot access AWS with profile '{profile}'"))?;
                console.info(&format!("Please run: aws sso login --profile {profile}"))?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Checks for the CDK bootstrap stack and offers to create it when it
    /// is missing. Declining the offer aborts the calling action.
    fn ensure_bootstrap(
        &self,
        console: &mut Console,
        account_id: &str,
        region: &str,
        profile: &str,
    ) -> Result<bool> {
        console.info(&format!("Checking CDK bootstrap for account {account_id}..."))?;
        let aws = AwsCli::new(self.runner, profile, region);
        // anything other than a clean describe counts as "not bootstrapped"
        if matches!(aws.stack_exists(BOOTSTRAP_STACK_NAME), Ok(StackPresence::Present)) {
            console.success("CDK already bootstrapped")?;
            return Ok(true);
        }

        console.warn(&format!("CDK not bootstrapped in account {account_id}"))?;
        console.info(&format!(
            "Run: cdk bootstrap aws://{account_id}/{region} --profile {profile}"
        ))?;
        if !console.confirm("Bootstrap now?")? {
            return Ok(false);
        }

        console.info("Bootstrapping CDK...")?;
        let cdk = CdkCli::new(self.runner, profile, self.project_root);
        let output = cdk.bootstrap(account_id, region)?;
        if !output.success() {
            console.error("Bootstrap failed")?;
            console.info(&output.stderr)?;
            return Ok(false);
        }
        console.success("Bootstrap complete")?;
        Ok(true)
    }

    /// Deploys the monitoring-account stack and returns the sink ARN, or
    /// `None` on any failure or operator cancellation.
    pub fn deploy_monitoring_account(
        &self,
        console: &mut Console,
        adot_enabled: bool,
        container_insights: bool,
    ) -> Result<Option<String>> {
        console.header("Deploying Monitoring Account")?;
        console.info(&format!("Account: {}", self.config.monitoring_account_id))?;
        console.info(&format!("Profile: {}", self.config.monitoring_profile))?;
        console.info(&format!("Region: {}", self.config.monitoring_region))?;
        if adot_enabled {
            console.info("ADOT Monitoring: ENABLED (CloudWatch + Prometheus + Grafana)")?;
        } else {
            console.info("ADOT Monitoring: DISABLED (CloudWatch only)")?;
        }
        console.info(&format!(
            "Container Insights: {}",
            if container_insights { "ENABLED" } else { "DISABLED" }
        ))?;

        let aws = self.monitoring_aws();
        if !self.verify_identity(
            console,
            &aws,
            &self.config.monitoring_account_id,
            &self.config.monitoring_profile,
        )? {
            return Ok(None);
        }

        if !self.ensure_bootstrap(
            console,
            &self.config.monitoring_account_id,
            &self.config.monitoring_region,
            &self.config.monitoring_profile,
        )? {
            return Ok(None);
        }

        entrypoint::write_monitoring_entrypoint(
            self.project_root,
            self.config,
            adot_enabled,
            container_insights,
        )?;

        let cdk = CdkCli::new(self.runner, &self.config.monitoring_profile, self.project_root);
        let app = entrypoint::monitoring_entrypoint_rel();

        console.info("Synthesizing CloudFormation template...")?;
        let synth = cdk.synth(&app, MONITORING_STACK_NAME)?;
        console.info(&synth.stdout)?;
        if !synth.success() {
            console.error("Synthesis failed")?;
            console.info(&synth.stderr)?;
            return Ok(None);
        }
        console.success("Synthesis complete")?;

        console.warn(&format!(
            "Ready to deploy to monitoring account {}",
            self.config.monitoring_account_id
        ))?;
        if !console.confirm("Continue with deployment?")? {
            console.warn("Deployment cancelled")?;
            return Ok(None);
        }

        console.info("Deploying stack...")?;
        let deploy = cdk.deploy(&app, MONITORING_STACK_NAME)?;
        console.info(&deploy.stdout)?;
        if !deploy.success() {
            console.error("Deployment failed")?;
            console.info(&deploy.stderr)?;
            return Ok(None);
        }
        console.success("Monitoring account deployed!")?;

        console.info("Retrieving sink ARN...")?;
        match aws.stack_output(MONITORING_STACK_NAME, SINK_OUTPUT_KEY) {
            Ok(Some(sink_arn)) => {
                console.success(&format!("Sink ARN: {sink_arn}"))?;
                Ok(Some(sink_arn))
            }
            Ok(None) => {
                console.error("Failed to retrieve sink ARN")?;
                Ok(None)
            }
            Err(Error::CommandFailed { stderr, .. }) => {
                console.error("Failed to retrieve sink ARN")?;
                console.info(&stderr)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Deploys one scenario stack in the application account.
    pub fn deploy_scenario(
        &self,
        console: &mut Console,
        scenario: Scenario,
        sink_arn: Option<&str>,
    ) -> Result<bool> {
        console.header(&format!(
            "Scenario {}: {}",
            scenario.number(),
            scenario.display_name()
        ))?;
        console.info(&format!("Stack: {}", scenario.stack_class()))?;
        console.info(&format!("Account: {}", self.config.application_account_id))?;
        console.info(&format!("Profile: {}", self.config.application_profile))?;
        console.info(&format!("Region: {}", self.config.application_region))?;
        if let Some(arn) = sink_arn {
            let shown: String = arn.chars().take(50).collect();
            console.info(&format!("Sink ARN: {shown}..."))?;
        }

        let aws = self.application_aws();
        if !self.verify_identity(
            console,
            &aws,
            &self.config.application_account_id,
            &self.config.application_profile,
        )? {
            return Ok(false);
        }

        if !self.ensure_bootstrap(
            console,
            &self.config.application_account_id,
            &self.config.application_region,
            &self.config.application_profile,
        )? {
            return Ok(false);
        }

        let path = entrypoint::write_scenario_entrypoint(
            self.project_root,
            self.config,
            scenario,
            sink_arn,
        )?;

        let cdk = CdkCli::new(self.runner, &self.config.application_profile, self.project_root);
        let app = entrypoint::scenario_entrypoint_rel(scenario);
        let stack = scenario.stack_name();

        console.info(&format!(
            "Synthesizing CloudFormation template ({})...",
            path.display()
        ))?;
        let synth = cdk.synth(&app, &stack)?;
        if !synth.success() {
            console.error("Synthesis failed")?;
            console.info(&synth.stderr)?;
            return Ok(false);
        }
        console.success("Synthesis complete")?;

        console.warn(&format!("Ready to deploy Scenario {}", scenario.number()))?;
        if !console.confirm("Continue with deployment?")? {
            console.warn("Deployment skipped")?;
            return Ok(false);
        }

        console.info("Deploying stack...")?;
        let deploy = cdk.deploy(&app, &stack)?;
        if !deploy.success() {
            console.error("Deployment failed")?;
            console.info(&deploy.stderr)?;
            return Ok(false);
        }
        console.success(&format!("Scenario {} deployed successfully!", scenario.number()))?;

        console.info("Stack outputs:")?;
        let table = aws.stack_outputs_table(&stack)?;
        if table.success() {
            console.info(&table.stdout)?;
        }
        Ok(true)
    }

    /// Tears down one scenario stack. A stack that is already gone counts
    /// as success and skips the destroy command entirely.
    pub fn destroy_scenario(&self, console: &mut Console, scenario: Scenario) -> Result<bool> {
        console.header(&format!("Destroying Scenario {}", scenario.number()))?;

        let stack = scenario.stack_name();
        console.info(&format!("Checking if {stack} exists..."))?;
        let aws = self.application_aws();
        match aws.stack_exists(&stack) {
            Ok(StackPresence::Present) => {}
            Ok(StackPresence::Absent) => {
                console.warn(&format!("{stack} does not exist (already deleted)"))?;
                self.remove_artifact(
                    console,
                    &entrypoint::scenario_entrypoint_path(self.project_root, scenario),
                )?;
                return Ok(true);
            }
            Err(Error::CommandFailed { stderr, .. }) => {
                console.error("Failed to check stack status")?;
                console.info(&stderr)?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        console.success("Stack exists. Proceeding with destruction...")?;
        console.warn(&format!(
            "This will delete all resources in Scenario {}",
            scenario.number()
        ))?;
        if !console.confirm("Continue with destruction?")? {
            console.warn("Destruction cancelled")?;
            return Ok(false);
        }

        let path = entrypoint::scenario_entrypoint_path(self.project_root, scenario);
        if !path.exists() {
            console.error(&format!("Deployment file not found: {}", path.display()))?;
            console.warn("Stack exists but deployment file is missing.")?;
            console.info("Use the AWS console to delete the stack, or recreate the deployment file.")?;
            return Ok(false);
        }

        console.info("Destroying stack...")?;
        let cdk = CdkCli::new(self.runner, &self.config.application_profile, self.project_root);
        let destroy = cdk.destroy(&entrypoint::scenario_entrypoint_rel(scenario), &stack)?;
        console.info(&destroy.stdout)?;
        if !destroy.success() {
            console.error("Destruction failed")?;
            console.info(&destroy.stderr)?;
            return Ok(false);
        }
        console.success(&format!("Scenario {} destroyed successfully!", scenario.number()))?;
        self.remove_artifact(console, &path)?;
        Ok(true)
    }

    /// Tears down the monitoring-account stack, recreating its entry point
    /// first if a previous teardown cleaned it up.
    pub fn destroy_monitoring_account(&self, console: &mut Console) -> Result<bool> {
        console.header("Destroying Monitoring Account")?;

        console.info("Checking if monitoring stack exists...")?;
        let aws = self.monitoring_aws();
        match aws.stack_exists(MONITORING_STACK_NAME) {
            Ok(StackPresence::Present) => {}
            Ok(StackPresence::Absent) => {
                console.warn(&format!(
                    "{MONITORING_STACK_NAME} does not exist (already deleted)"
                ))?;
                self.remove_artifact(
                    console,
                    &entrypoint::monitoring_entrypoint_path(self.project_root),
                )?;
                return Ok(true);
            }
            Err(Error::CommandFailed { stderr, .. }) => {
                console.error("Failed to check stack status")?;
                console.info(&stderr)?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        console.success("Stack exists. Proceeding with destruction...")?;
        console.warn("This will delete the central monitoring sink and all ADOT resources")?;
        if !console.confirm("Continue with destruction?")? {
            console.warn("Destruction cancelled")?;
            return Ok(false);
        }

        let path = entrypoint::monitoring_entrypoint_path(self.project_root);
        if !path.exists() {
            console.info("Recreating deployment file for destruction...")?;
            entrypoint::write_monitoring_entrypoint(self.project_root, self.config, false, true)?;
            console.success("Deployment file recreated")?;
        }

        console.info("Destroying monitoring account stack...")?;
        let cdk = CdkCli::new(self.runner, &self.config.monitoring_profile, self.project_root);
        let destroy = cdk.destroy(
            &entrypoint::monitoring_entrypoint_rel(),
            MONITORING_STACK_NAME,
        )?;
        console.info(&destroy.stdout)?;
        if !destroy.success() {
            console.error("Destruction failed")?;
            console.info(&destroy.stderr)?;
            return Ok(false);
        }
        console.success("Monitoring account destroyed successfully!")?;
        self.remove_artifact(console, &path)?;
        Ok(true)
    }

    fn remove_artifact(&self, console: &mut Console, path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)?;
            console.info(&format!("Cleaned up deployment file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod deploy_tests;
