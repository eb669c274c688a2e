use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use crate::cloud::{AwsCli, StackOutputs};
use crate::config::AccountConfig;
use crate::errors::{Error, Result};
use crate::runner::{CommandLine, CommandRunner};
use crate::scenario::Scenario;
use crate::utils::console::Console;

/// How often and how many times a load routine fires. Derived from the
/// requested duration so a run finishes slightly ahead of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    pub iterations: u32,
    pub interval: Duration,
}

impl LoadPlan {
    pub fn for_scenario(scenario: Scenario, duration_minutes: u32) -> Self {
        match scenario {
            Scenario::Minimal | Scenario::MinimalCrossAccount => Self {
                iterations: duration_minutes * 12,
                interval: Duration::from_secs(5),
            },
            Scenario::CustomMetrics => Self {
                iterations: 1,
                interval: Duration::from_secs(u64::from(duration_minutes) * 60),
            },
            Scenario::CrossAccount | Scenario::FullStack | Scenario::MultiService => Self {
                iterations: duration_minutes * 10,
                interval: Duration::from_secs(6),
            },
        }
    }
}

/// Drives synthetic traffic against a deployed scenario's resources so
/// its dashboards and alarms have data to show.
pub struct LoadGenerator<'a> {
    config: &'a AccountConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> LoadGenerator<'a> {
    pub fn new(config: &'a AccountConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    fn aws(&self) -> AwsCli<'a> {
        AwsCli::new(
            self.runner,
            &self.config.application_profile,
            &self.config.application_region,
        )
    }

    pub fn generate_load(
        &self,
        console: &mut Console,
        scenario: Scenario,
        duration_minutes: u32,
    ) -> Result<bool> {
        console.header(&format!(
            "Generating load for Scenario {} ({} min)",
            scenario.number(),
            duration_minutes
        ))?;

        let aws = self.aws();
        let outputs = match aws.stack_outputs(&scenario.stack_name()) {
            Ok(outputs) => outputs,
            Err(Error::CommandFailed { .. }) => {
                console.error(&format!(
                    "Failed to retrieve stack outputs. Is Scenario {} deployed?",
                    scenario.number()
                ))?;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let plan = LoadPlan::for_scenario(scenario, duration_minutes);
        match scenario {
            Scenario::Minimal | Scenario::MinimalCrossAccount => {
                self.lambda_load(console, &aws, &outputs, &plan)
            }
            Scenario::CrossAccount => self.dynamodb_load(console, &aws, &outputs, &plan),
            Scenario::FullStack => self.full_stack_load(console, &aws, &outputs, &plan),
            Scenario::CustomMetrics => self.idle_load(console, &outputs, &plan),
            Scenario::MultiService => self.multi_service_load(console, &aws, &outputs, &plan),
        }
    }

    fn missing_output(
        &self,
        console: &mut Console,
        key: &str,
        outputs: &StackOutputs,
    ) -> Result<bool> {
        console.error(&format!("Stack output {key} not found"))?;
        console.info(&format!("Available outputs: {}", outputs.available()))?;
        Ok(false)
    }

    /// Repeatedly invokes the scenario's function with a small synthetic
    /// payload.
    fn lambda_load(
        &self,
        console: &mut Console,
        aws: &AwsCli<'_>,
        outputs: &StackOutputs,
        plan: &LoadPlan,
    ) -> Result<bool> {
        let Some(function) = outputs.get("LambdaFunctionName") else {
            return self.missing_output(console, "LambdaFunctionName", outputs);
        };
        console.info(&format!("Invoking {function} every 5 seconds..."))?;

        for i in 1..=plan.iterations {
            let invoke = aws.invoke_function(function, r#"{"test": "load"}"#)?;
            if !invoke.success() {
                console.warn(&format!("Invocation {i} failed"))?;
            }
            self.progress(console, i, plan.iterations)?;
            thread::sleep(plan.interval);
        }
        console.success("Load generation complete")?;
        Ok(true)
    }

    /// Writes synthetic items into the scenario's table.
    fn dynamodb_load(
        &self,
        console: &mut Console,
        aws: &AwsCli<'_>,
        outputs: &StackOutputs,
        plan: &LoadPlan,
    ) -> Result<bool> {
        let Some(table) = outputs.get("TableName") else {
            return self.missing_output(console, "TableName", outputs);
        };
        console.info(&format!("Writing items to {table} every 6 seconds..."))?;

        for i in 1..=plan.iterations {
            let ts = Utc::now().timestamp();
            let item = json!({
                "id": {"S": format!("load-test-{i}-{ts}")},
                "timestamp": {"N": ts.to_string()},
                "data": {"S": format!("Load test item {i}")},
                "scenario": {"S": "scenario2-load-test"},
            });
            let put = aws.put_item(table, &item.to_string())?;
            if !put.success() {
                console.warn(&format!("Write {i} failed"))?;
            }
            self.progress(console, i, plan.iterations)?;
            thread::sleep(plan.interval);
        }
        console.success("Load generation complete")?;
        Ok(true)
    }

    /// Hits whichever of the full stack's resources exist: the load
    /// balancer, the API and worker functions, and the table.
    fn full_stack_load(
        &self,
        console: &mut Console,
        aws: &AwsCli<'_>,
        outputs: &StackOutputs,
        plan: &LoadPlan,
    ) -> Result<bool> {
        let alb = outputs.get("ALBDNSName");
        let api = outputs.get("APIFunctionName");
        let worker = outputs.get("WorkerFunctionName");
        let table = outputs.get("TableName");
        if alb.is_none() && api.is_none() && worker.is_none() && table.is_none() {
            console.error("No resources found to generate load")?;
            console.info(&format!("Available outputs: {}", outputs.available()))?;
            return Ok(false);
        }

        console.info("Driving traffic across the full stack every 6 seconds...")?;
        for i in 1..=plan.iterations {
            if let Some(dns) = alb {
                let url = format!("http://{dns}");
                self.runner.run(&CommandLine::new(
                    "curl",
                    ["-s", "-o", "/dev/null", "-w", "%{http_code}", url.as_str(), "--max-time", "5"],
                ))?;
            }
            if let Some(function) = api {
                aws.invoke_function(function, r#"{"path": "/items", "httpMethod": "GET"}"#)?;
            }
            if let Some(function) = worker {
                aws.invoke_function(function, r#"{"test": "load"}"#)?;
            }
            if let Some(table) = table {
                let ts = Utc::now().timestamp();
                let item = json!({
                    "id": {"S": format!("load-test-{i}-{ts}")},
                    "timestamp": {"N": ts.to_string()},
                    "data": {"S": format!("Load test item {i}")},
                    "scenario": {"S": "scenario3-load-test"},
                });
                aws.put_item(table, &item.to_string())?;
            }
            self.progress(console, i, plan.iterations)?;
            thread::sleep(plan.interval);
        }
        console.success("Load generation complete")?;
        Ok(true)
    }

    /// Scenario 4 emits its own metrics from a scheduled task; all this
    /// does is wait so the operator can watch them arrive.
    fn idle_load(
        &self,
        console: &mut Console,
        outputs: &StackOutputs,
        plan: &LoadPlan,
    ) -> Result<bool> {
        let Some(cluster) = outputs.get("ECSClusterName") else {
            return self.missing_output(console, "ECSClusterName", outputs);
        };
        console.info(&format!(
            "Cluster {cluster} publishes custom metrics on its own schedule."
        ))?;
        console.info("Waiting while metrics accumulate...")?;
        thread::sleep(plan.interval);
        console.success("Wait complete. Check the CloudWatch console for custom metrics.")?;
        Ok(true)
    }

    /// Round-trips objects through the bucket and pokes the function,
    /// using whichever of the two the stack actually exposes.
    fn multi_service_load(
        &self,
        console: &mut Console,
        aws: &AwsCli<'_>,
        outputs: &StackOutputs,
        plan: &LoadPlan,
    ) -> Result<bool> {
        let bucket = outputs.get("BucketName");
        let function = outputs.get("LambdaFunctionName");
        if bucket.is_none() && function.is_none() {
            console.error("No resources found to generate load")?;
            console.info(&format!("Available outputs: {}", outputs.available()))?;
            return Ok(false);
        }
        console.info("Exercising the multi-service resources every 6 seconds...")?;

        let scratch = tempdir()?;
        for i in 1..=plan.iterations {
            if let Some(bucket) = bucket {
                let key = format!("load-tests/test-{i}.txt");
                let local = scratch.join(format!("test-{i}.txt"));
                let mut file = std::fs::File::create(&local)?;
                writeln!(file, "Load test object {i} at {}", Utc::now().to_rfc3339())?;
                let upload = aws.upload_object(&local, bucket, &key)?;
                if upload.success() {
                    aws.download_object(bucket, &key, &local)?;
                } else {
                    console.warn(&format!("Upload {i} failed"))?;
                }
                std::fs::remove_file(&local)?;
            }
            if let Some(function) = function {
                aws.invoke_function(function, r#"{"test": "load"}"#)?;
            }
            self.progress(console, i, plan.iterations)?;
            thread::sleep(plan.interval);
        }
        console.success("Load generation complete")?;
        Ok(true)
    }

    fn progress(&self, console: &mut Console, done: u32, total: u32) -> Result<()> {
        if done % 10 == 0 || done == total {
            console.info(&format!("Progress: {done}/{total}"))?;
        }
        Ok(())
    }
}

fn tempdir() -> Result<std::path::PathBuf> {
    let dir = std::env::temp_dir().join("monitoring-harness-load");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod load_tests;
