use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{Error, Result};
use crate::runner::{CommandLine, CommandOutput, CommandRunner};

/// Lifecycle statuses under which a stack counts as "deployed" for
/// inventory purposes.
pub const COMPLETE_STACK_STATUSES: [&str; 3] = [
    "CREATE_COMPLETE",
    "UPDATE_COMPLETE",
    "UPDATE_ROLLBACK_COMPLETE",
];

/// Stack name the CDK bootstrap leaves behind in a prepared account.
pub const BOOTSTRAP_STACK_NAME: &str = "CDKToolkit";

#[derive(Debug, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Arn")]
    pub arn: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPresence {
    Present,
    Absent,
}

/// A deployed stack as reported by `list-stacks`, labeled with the account
/// it came from. Reconstructed on every inventory query, never cached.
#[derive(Debug, Clone)]
pub struct StackDescriptor {
    pub name: String,
    pub status: String,
    /// Account role as the operator knows it: `monitoring` or `application`.
    pub label: String,
    pub account: String,
    pub profile: String,
    pub region: String,
}

/// Ordered stack output key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct StackOutputs(Vec<(String, String)>);

impl StackOutputs {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated key list, printed when an expected output is absent
    /// so the operator can see what the stack actually exposes.
    pub fn available(&self) -> String {
        self.0
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(String, String)> for StackOutputs {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        StackOutputs(iter.into_iter().collect())
    }
}

#[derive(Debug, Deserialize)]
struct OutputEntry {
    #[serde(rename = "OutputKey")]
    key: String,
    #[serde(rename = "OutputValue")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct StackSummary {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Status")]
    status: String,
}

#[derive(Debug, Deserialize)]
struct DashboardList {
    #[serde(rename = "DashboardEntries", default)]
    entries: Vec<DashboardEntry>,
}

#[derive(Debug, Deserialize)]
struct DashboardEntry {
    #[serde(rename = "DashboardName")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OamLinkList {
    #[serde(rename = "Items", default)]
    items: Vec<serde_json::Value>,
}

fn command_failed(cmd: &CommandLine, output: &CommandOutput) -> Error {
    Error::CommandFailed {
        command: cmd.display(),
        code: output.code,
        stderr: output.stderr.clone(),
    }
}

/// Narrow wrapper over the cloud-provider CLI, pinned to one
/// profile/region pair. Only the queries the harness actually issues are
/// exposed, so the orchestration code can be exercised against a fake
/// runner.
pub struct AwsCli<'a> {
    runner: &'a dyn CommandRunner,
    profile: String,
    region: String,
}

impl<'a> AwsCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, profile: &str, region: &str) -> Self {
        Self {
            runner,
            profile: profile.to_string(),
            region: region.to_string(),
        }
    }

    fn base(&self, args: &[&str]) -> CommandLine {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full.push("--profile".to_string());
        full.push(self.profile.clone());
        full.push("--region".to_string());
        full.push(self.region.clone());
        CommandLine::new("aws", full)
    }

    fn run_checked(&self, cmd: CommandLine) -> Result<CommandOutput> {
        let output = self.runner.run(&cmd)?;
        if !output.success() {
            return Err(command_failed(&cmd, &output));
        }
        Ok(output)
    }

    pub fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self.run_checked(self.base(&["sts", "get-caller-identity"]))?;
        Ok(serde_json::from_str(&output.stdout)?)
    }

    /// Three-valued existence check. The CLI reports a missing stack only
    /// through free-text stderr; matching on `does not exist` is a
    /// compatibility shim with that message format and must not grow.
    pub fn stack_exists(&self, stack: &str) -> Result<StackPresence> {
        let cmd = self.base(&["cloudformation", "describe-stacks", "--stack-name", stack]);
        let output = self.runner.run(&cmd)?;
        if output.success() {
            return Ok(StackPresence::Present);
        }
        if output.stderr.contains("does not exist") {
            return Ok(StackPresence::Absent);
        }
        Err(command_failed(&cmd, &output))
    }

    pub fn stack_outputs(&self, stack: &str) -> Result<StackOutputs> {
        let output = self.run_checked(self.base(&[
            "cloudformation",
            "describe-stacks",
            "--stack-name",
            stack,
            "--query",
            "Stacks[0].Outputs",
            "--output",
            "json",
        ]))?;
        // a stack without outputs serializes as `null`
        let entries: Option<Vec<OutputEntry>> = serde_json::from_str(output.stdout.trim())?;
        Ok(entries
            .unwrap_or_default()
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }

    /// A single named output as text; `None` when the stack does not
    /// expose it.
    pub fn stack_output(&self, stack: &str, key: &str) -> Result<Option<String>> {
        let query = format!("Stacks[0].Outputs[?OutputKey==`{key}`].OutputValue");
        let output = self.run_checked(self.base(&[
            "cloudformation",
            "describe-stacks",
            "--stack-name",
            stack,
            "--query",
            &query,
            "--output",
            "text",
        ]))?;
        let value = output.stdout.trim().to_string();
        if value.is_empty() || value == "None" {
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Pre-rendered output table for terminal display.
    pub fn stack_outputs_table(&self, stack: &str) -> Result<CommandOutput> {
        self.runner.run(&self.base(&[
            "cloudformation",
            "describe-stacks",
            "--stack-name",
            stack,
            "--query",
            "Stacks[0].Outputs",
            "--output",
            "table",
        ]))
    }

    /// Deployed stacks whose name carries one of the harness markers,
    /// restricted to complete lifecycle statuses.
    pub fn list_stacks(&self) -> Result<Vec<(String, String)>> {
        let mut args = vec!["cloudformation", "list-stacks", "--stack-status-filter"];
        args.extend(COMPLETE_STACK_STATUSES);
        args.extend([
            "--query",
            "StackSummaries[?contains(StackName, `Monitoring`) || contains(StackName, `Scenario`)].{Name:StackName,Status:StackStatus}",
            "--output",
            "json",
        ]);
        let output = self.run_checked(self.base(&args))?;
        let summaries: Vec<StackSummary> = serde_json::from_str(output.stdout.trim())?;
        Ok(summaries.into_iter().map(|s| (s.name, s.status)).collect())
    }

    pub fn invoke_function(&self, name: &str, payload: &str) -> Result<CommandOutput> {
        let response_file = std::env::temp_dir().join("lambda-response.json");
        let mut cmd = self.base(&["lambda", "invoke", "--function-name", name, "--payload", payload]);
        cmd.args.push(response_file.to_string_lossy().into_owned());
        self.runner.run(&cmd)
    }

    pub fn put_item(&self, table: &str, item_json: &str) -> Result<CommandOutput> {
        self.runner.run(&self.base(&[
            "dynamodb",
            "put-item",
            "--table-name",
            table,
            "--item",
            item_json,
        ]))
    }

    pub fn upload_object(&self, local: &Path, bucket: &str, key: &str) -> Result<CommandOutput> {
        let source = local.to_string_lossy().into_owned();
        let target = format!("s3://{bucket}/{key}");
        self.runner
            .run(&self.base(&["s3", "cp", &source, &target]))
    }

    pub fn download_object(&self, bucket: &str, key: &str, local: &Path) -> Result<CommandOutput> {
        let source = format!("s3://{bucket}/{key}");
        let target = local.to_string_lossy().into_owned();
        self.runner
            .run(&self.base(&["s3", "cp", &source, &target]))
    }

    pub fn list_dashboards(&self) -> Result<Vec<String>> {
        let output = self.run_checked(self.base(&["cloudwatch", "list-dashboards"]))?;
        let list: DashboardList = serde_json::from_str(&output.stdout)?;
        Ok(list.entries.into_iter().map(|e| e.name).collect())
    }

    pub fn list_oam_links(&self) -> Result<usize> {
        let output = self.run_checked(self.base(&["oam", "list-links"]))?;
        let list: OamLinkList = serde_json::from_str(&output.stdout)?;
        Ok(list.items.len())
    }
}

/// Wrapper around the CDK CLI, always invoked through `npx` from the
/// project root so the checked-out app resolves its own toolchain.
pub struct CdkCli<'a> {
    runner: &'a dyn CommandRunner,
    profile: String,
    project_root: PathBuf,
}

impl<'a> CdkCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, profile: &str, project_root: &Path) -> Self {
        Self {
            runner,
            profile: profile.to_string(),
            project_root: project_root.to_path_buf(),
        }
    }

    fn app_arg(entrypoint: &str) -> String {
        format!("npx ts-node {entrypoint}")
    }

    pub fn bootstrap(&self, account: &str, region: &str) -> Result<CommandOutput> {
        let target = format!("aws://{account}/{region}");
        self.runner.run(
            &CommandLine::new(
                "npx",
                ["cdk", "bootstrap", &target, "--profile", &self.profile],
            )
            .env("AWS_PROFILE", &self.profile),
        )
    }

    pub fn synth(&self, entrypoint: &str, stack: &str) -> Result<CommandOutput> {
        self.runner.run(
            &CommandLine::new(
                "npx",
                [
                    "cdk",
                    "synth",
                    "--app",
                    &Self::app_arg(entrypoint),
                    "--profile",
                    &self.profile,
                    stack,
                ],
            )
            .cwd(&self.project_root),
        )
    }

    pub fn deploy(&self, entrypoint: &str, stack: &str) -> Result<CommandOutput> {
        self.runner.run(
            &CommandLine::new(
                "npx",
                [
                    "cdk",
                    "deploy",
                    "--app",
                    &Self::app_arg(entrypoint),
                    "--profile",
                    &self.profile,
                    "--require-approval",
                    "never",
                    stack,
                ],
            )
            .cwd(&self.project_root),
        )
    }

    pub fn destroy(&self, entrypoint: &str, stack: &str) -> Result<CommandOutput> {
        self.runner.run(
            &CommandLine::new(
                "npx",
                [
                    "cdk",
                    "destroy",
                    "--app",
                    &Self::app_arg(entrypoint),
                    "--profile",
                    &self.profile,
                    "--force",
                    stack,
                ],
            )
            .cwd(&self.project_root),
        )
    }
}

#[cfg(test)]
#[path = "cloud_tests.rs"]
mod cloud_tests;
