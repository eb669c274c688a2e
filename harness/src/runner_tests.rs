use pretty_assertions::assert_eq;

use super::{CommandLine, CommandRunner, SystemRunner};

#[test]
fn command_line_display_joins_program_and_args() {
    let cmd = CommandLine::new("aws", ["sts", "get-caller-identity"]);
    assert_eq!("aws sts get-caller-identity", cmd.display());
}

#[cfg(unix)]
#[test]
fn system_runner_captures_exit_code_and_both_streams() {
    let cmd = CommandLine::new("sh", ["-c", "echo out; echo err 1>&2; exit 3"]);
    let output = SystemRunner.run(&cmd).unwrap();
    assert_eq!(3, output.code);
    assert!(!output.success());
    assert_eq!("out", output.stdout.trim());
    assert_eq!("err", output.stderr.trim());
}

#[cfg(unix)]
#[test]
fn system_runner_applies_env_overlay() {
    let cmd = CommandLine::new("sh", ["-c", "printf '%s' \"$HARNESS_PROBE\""])
        .env("HARNESS_PROBE", "present");
    let output = SystemRunner.run(&cmd).unwrap();
    assert!(output.success());
    assert_eq!("present", output.stdout);
}
