use std::fs;
use std::path::{Path, PathBuf};

use indoc::formatdoc;

use crate::config::AccountConfig;
use crate::errors::Result;
use crate::scenario::Scenario;

/// Namespaces the ADOT collector scrapes when it is enabled.
pub const CLOUDWATCH_NAMESPACES: [&str; 7] = [
    "AWS/ECS",
    "AWS/Lambda",
    "AWS/RDS",
    "AWS/DynamoDB",
    "AWS/ApplicationELB",
    "AWS/EC2",
    "AWS/S3",
];

pub fn monitoring_entrypoint_path(project_root: &Path) -> PathBuf {
    project_root.join("bin").join("deploy-monitoring.ts")
}

pub fn scenario_entrypoint_path(project_root: &Path, scenario: Scenario) -> PathBuf {
    project_root
        .join("bin")
        .join(format!("deploy-scenario{}.ts", scenario.number()))
}

/// Relative form handed to `cdk --app`.
pub fn monitoring_entrypoint_rel() -> String {
    "bin/deploy-monitoring.ts".to_string()
}

pub fn scenario_entrypoint_rel(scenario: Scenario) -> String {
    format!("bin/deploy-scenario{}.ts", scenario.number())
}

/// Entry point instantiating the monitoring-account stack with the list of
/// application accounts allowed to link to the sink.
pub fn monitoring_entrypoint(
    config: &AccountConfig,
    adot_enabled: bool,
    container_insights: bool,
) -> String {
    let mut extras = Vec::new();
    if adot_enabled {
        let namespaces = CLOUDWATCH_NAMESPACES
            .iter()
            .map(|ns| format!("'{ns}'"))
            .collect::<Vec<_>>()
            .join(", ");
        extras.push(format!("cloudWatchNamespaces: [{namespaces}]"));
    }
    if !container_insights {
        extras.push("enableContainerInsights: false".to_string());
    }
    let config_line = if extras.is_empty() {
        String::new()
    } else {
        format!(",\n    {}", extras.join(",\n    "))
    };

    formatdoc! {r#"
        #!/usr/bin/env node
        import 'source-map-support/register';
        import * as cdk from 'aws-cdk-lib';
        import {{ MonitoringAccountStack }} from '../lib/example-stacks';

        const app = new cdk.App();
        new MonitoringAccountStack(app, 'MonitoringAccountStack',
          ['{application_account}'],
          {{
            env: {{
              account: '{monitoring_account}',
              region: '{monitoring_region}'
            }}{config_line}
          }}
        );
    "#,
        application_account = config.application_account_id,
        monitoring_account = config.monitoring_account_id,
        monitoring_region = config.monitoring_region,
        config_line = config_line,
    }
}

/// Entry point instantiating one scenario stack in the application
/// account, optionally linked to the monitoring sink.
pub fn scenario_entrypoint(
    config: &AccountConfig,
    scenario: Scenario,
    sink_arn: Option<&str>,
) -> String {
    let sink_param = sink_arn
        .map(|arn| format!(", sinkArn: '{arn}'"))
        .unwrap_or_default();
    // a configured alarm topic means the stack must not create its own
    let alarm_param = if config.alarm_topic_arn.is_some() {
        ", enableAlarms: false"
    } else {
        ""
    };

    formatdoc! {r#"
        #!/usr/bin/env node
        import 'source-map-support/register';
        import * as cdk from 'aws-cdk-lib';
        import {{ {stack_class} }} from '../lib/example-stacks';

        const app = new cdk.App();
        new {stack_class}(app, 'Scenario{number}Stack',
          {{
            env: {{
              account: '{application_account}',
              region: '{application_region}'
            }}{sink_param}{alarm_param}
          }}
        );
    "#,
        stack_class = scenario.stack_class(),
        number = scenario.number(),
        application_account = config.application_account_id,
        application_region = config.application_region,
        sink_param = sink_param,
        alarm_param = alarm_param,
    }
}

pub fn write_monitoring_entrypoint(
    project_root: &Path,
    config: &AccountConfig,
    adot_enabled: bool,
    container_insights: bool,
) -> Result<PathBuf> {
    let path = monitoring_entrypoint_path(project_root);
    write_artifact(&path, monitoring_entrypoint(config, adot_enabled, container_insights))?;
    Ok(path)
}

pub fn write_scenario_entrypoint(
    project_root: &Path,
    config: &AccountConfig,
    scenario: Scenario,
    sink_arn: Option<&str>,
) -> Result<PathBuf> {
    let path = scenario_entrypoint_path(project_root, scenario);
    write_artifact(&path, scenario_entrypoint(config, scenario, sink_arn))?;
    Ok(path)
}

fn write_artifact(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
#[path = "entrypoint_tests.rs"]
mod entrypoint_tests;
