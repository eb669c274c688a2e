// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;
use std::process::exit;

use clap::{Arg, ArgMatches};
use colored::Colorize;

use monitoring_harness::config::AccountConfig;
use monitoring_harness::deploy::DeploymentDriver;
use monitoring_harness::errors::{Error, Result};
use monitoring_harness::menu::{MenuController, Session};
use monitoring_harness::runner::SystemRunner;
use monitoring_harness::state::{SessionState, STATE_FILE_NAME};
use monitoring_harness::utils::console::Console;
use monitoring_harness::utils::reader::{ReadBuffer, Reader};
use monitoring_harness::utils::writer::{WriteBuffer, Writer};
use monitoring_harness::{APP_NAME, APP_VERSION, FAILURE_CODE, SUCCESS_CODE};

fn main() {
    let app = clap::Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(
            r#"
  Interactive harness for deploying and exercising the cross-account
  monitoring scenarios. Drives the CDK app checked out in the project
  root against a monitoring account and an application account, and
  can generate synthetic load against whatever is deployed."#,
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Account configuration file (defaults to config/accounts.config)"),
        )
        .arg(
            Arg::new("project-root")
                .long("project-root")
                .short('p')
                .value_name("DIR")
                .help("CDK project root (defaults to the current directory)"),
        )
        .arg(
            Arg::new("state-file")
                .long("state-file")
                .short('s')
                .value_name("FILE")
                .help("Session state file (defaults to .monitoring-state.json in the project root)"),
        );

    let matches = app.get_matches();

    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n{}", "Interrupted by user".yellow());
        exit(SUCCESS_CODE);
    }) {
        eprintln!("Unable to install interrupt handler: {e}");
        exit(FAILURE_CODE);
    }

    let mut console = Console::new(
        Writer::new(
            WriteBuffer::Stdout(std::io::stdout()),
            WriteBuffer::Stderr(std::io::stderr()),
        ),
        Reader::new(ReadBuffer::Stdin(std::io::stdin())),
    );

    match run(&matches, &mut console) {
        Ok(()) => exit(SUCCESS_CODE),
        Err(e) => {
            console
                .writer
                .write_err(format!("Unexpected error: {e}"))
                .expect("failed to write to stderr");
            exit(FAILURE_CODE);
        }
    }
}

fn run(matches: &ArgMatches, console: &mut Console) -> Result<()> {
    let project_root = match matches.get_one::<String>("project-root") {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };
    let config_file = match matches.get_one::<String>("config") {
        Some(file) => PathBuf::from(file),
        None => project_root.join("config").join("accounts.config"),
    };
    let state_file = match matches.get_one::<String>("state-file") {
        Some(file) => PathBuf::from(file),
        None => project_root.join(STATE_FILE_NAME),
    };

    console.header("AWS Monitoring Test Scenarios")?;
    console.info(&format!("Project root: {}", project_root.display()))?;

    let config = AccountConfig::load(&config_file)?;
    console.success(&format!(
        "Loaded configuration from {}",
        config_file.display()
    ))?;
    console.info(&format!(
        "Monitoring account: {} ({})",
        config.monitoring_account_id, config.monitoring_region
    ))?;
    console.info(&format!(
        "Application account: {} ({})",
        config.application_account_id, config.application_region
    ))?;

    let runner = SystemRunner;
    let driver = DeploymentDriver::new(&config, &project_root, &runner);
    if !driver.build_project(console)? {
        return Err(Error::BuildFailed);
    }

    let state = SessionState::load(&state_file);
    if let Some(scenario) = state.current_scenario {
        console.info(&format!(
            "Restored previous session: Scenario {scenario}"
        ))?;
    }

    let mut menu = MenuController::new(
        Session {
            config,
            state,
            project_root,
            state_file,
        },
        &runner,
    );
    menu.run(console)
}
