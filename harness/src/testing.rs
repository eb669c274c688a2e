use std::cell::RefCell;
use std::io::Cursor;

use crate::config::AccountConfig;
use crate::errors::Result;
use crate::runner::{CommandLine, CommandOutput, CommandRunner};
use crate::utils::console::Console;
use crate::utils::reader::{ReadBuffer, Reader};
use crate::utils::writer::Writer;

/// Records every command and answers from a list of substring-matched
/// canned responses. Unmatched commands succeed with empty output.
pub(crate) struct FakeRunner {
    pub calls: RefCell<Vec<CommandLine>>,
    responses: Vec<(String, CommandOutput)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            responses: Vec::new(),
        }
    }

    /// Registers a canned response for any command line containing
    /// `needle`. Earlier registrations win.
    pub fn respond(mut self, needle: &str, output: CommandOutput) -> Self {
        self.responses.push((needle.to_string(), output));
        self
    }

    /// How many recorded commands contain `needle`.
    pub fn invocations(&self, needle: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|cmd| cmd.display().contains(needle))
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, cmd: &CommandLine) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(cmd.clone());
        let line = cmd.display();
        for (needle, output) in &self.responses {
            if line.contains(needle) {
                return Ok(output.clone());
            }
        }
        Ok(CommandOutput::default())
    }
}

pub(crate) fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub(crate) fn failed(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

pub(crate) const MONITORING_IDENTITY: &str =
    r#"{"Account": "111111111111", "Arn": "arn:aws:iam::111111111111:user/operator"}"#;

pub(crate) const APPLICATION_IDENTITY: &str =
    r#"{"Account": "222222222222", "Arn": "arn:aws:iam::222222222222:user/operator"}"#;

pub(crate) fn test_config() -> AccountConfig {
    AccountConfig {
        monitoring_account_id: "111111111111".to_string(),
        monitoring_profile: "monitoring".to_string(),
        monitoring_region: "us-east-1".to_string(),
        application_account_id: "222222222222".to_string(),
        application_profile: "application".to_string(),
        application_region: "us-west-2".to_string(),
        default_app_name: "sample-app".to_string(),
        default_environment: "dev".to_string(),
        alarm_topic_arn: None,
    }
}

pub(crate) fn console_with_input(input: &str) -> Console {
    Console::new(
        Writer::default(),
        Reader::new(ReadBuffer::Cursor(Cursor::new(input.as_bytes().to_vec()))),
    )
}
