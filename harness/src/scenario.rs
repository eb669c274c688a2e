use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stack name of the central monitoring account deployment.
pub const MONITORING_STACK_NAME: &str = "MonitoringAccountStack";

/// The predefined application scenarios, numbered 1-6. The mapping to
/// display names and CDK stack classes is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Scenario {
    Minimal = 1,
    CrossAccount = 2,
    FullStack = 3,
    CustomMetrics = 4,
    MultiService = 5,
    MinimalCrossAccount = 6,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Minimal,
        Scenario::CrossAccount,
        Scenario::FullStack,
        Scenario::CustomMetrics,
        Scenario::MultiService,
        Scenario::MinimalCrossAccount,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Scenario::Minimal => "Minimal (ECS + Lambda)",
            Scenario::CrossAccount => "Cross-Account (ECS + DynamoDB)",
            Scenario::FullStack => "Full Stack (ALB + ECS + Lambda + RDS + DynamoDB)",
            Scenario::CustomMetrics => "Custom Metrics (ECS + Business Metrics)",
            Scenario::MultiService => "Multi-Service (S3 + Lambda + EC2)",
            Scenario::MinimalCrossAccount => "Minimal Cross-Account (ECS + Lambda + OAM)",
        }
    }

    /// CDK stack class instantiated by the generated entry point.
    pub fn stack_class(self) -> &'static str {
        match self {
            Scenario::Minimal => "Scenario1MinimalStack",
            Scenario::CrossAccount => "Scenario2CrossAccountStack",
            Scenario::FullStack => "Scenario3FullStackStack",
            Scenario::CustomMetrics => "Scenario4CustomMetricsStack",
            Scenario::MultiService => "Scenario5MultiServiceStack",
            Scenario::MinimalCrossAccount => "Scenario6MinimalCrossAccountStack",
        }
    }

    /// Deployed CloudFormation stack name.
    pub fn stack_name(self) -> String {
        format!("Scenario{}Stack", self.number())
    }

    /// Scenarios 2 and 6 cannot deploy without the cross-account sink.
    pub fn requires_sink(self) -> bool {
        matches!(self, Scenario::CrossAccount | Scenario::MinimalCrossAccount)
    }

    /// Recovers the scenario from a live stack name, e.g. `Scenario3Stack`.
    pub fn from_stack_name(name: &str) -> Option<Scenario> {
        Scenario::ALL
            .into_iter()
            .find(|s| name.contains(&s.stack_name()))
    }
}

impl From<Scenario> for u8 {
    fn from(scenario: Scenario) -> u8 {
        scenario as u8
    }
}

impl TryFrom<u8> for Scenario {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Scenario::ALL
            .into_iter()
            .find(|s| s.number() == value)
            .ok_or_else(|| format!("no scenario numbered {value}"))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;
