//! Integration tests for command-line parsing.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use malscan_app::{Cli, Command};
use malscan_ui::Route;

fn parse(args: &[&str]) -> Result<Command, clap::Error> {
    Cli::try_parse_from(std::iter::once("malscan").chain(args.iter().copied()))
        .map(|cli| cli.command)
}

#[test]
fn cli_parsing_tests_report_accepts_copy_flag() {
    let command = parse(&["report", "--copy-sha256", "job-1"]).expect("valid invocation");
    assert_eq!(
        command,
        Command::Report {
            job_id: "job-1".to_string(),
            copy_sha256: true,
        }
    );

    let command = parse(&["report", "job-2"]).expect("valid invocation");
    assert_eq!(
        command,
        Command::Report {
            job_id: "job-2".to_string(),
            copy_sha256: false,
        }
    );
}

#[test]
fn cli_parsing_tests_open_parses_route() {
    assert_eq!(
        parse(&["open", "/jobs/job-7"]).expect("valid route"),
        Command::Open {
            route: Some(Route::Job("job-7".to_string())),
        }
    );
    assert_eq!(
        parse(&["open"]).expect("route is optional"),
        Command::Open { route: None }
    );
}

#[test]
fn cli_parsing_tests_open_rejects_unknown_route() {
    let error = parse(&["open", "/settings"]).expect_err("unknown route");
    assert_eq!(error.kind(), ErrorKind::ValueValidation);
    assert!(error.to_string().contains("unknown route"));
}

#[test]
fn cli_parsing_tests_submit_takes_a_path() {
    assert_eq!(
        parse(&["submit", "sample.exe"]).expect("valid invocation"),
        Command::Submit {
            path: PathBuf::from("sample.exe"),
        }
    );
    assert_eq!(
        parse(&["submit"]).expect_err("path is required").kind(),
        ErrorKind::MissingRequiredArgument
    );
}

#[test]
fn cli_parsing_tests_bad_invocations_are_errors() {
    assert_eq!(
        parse(&["scan", "sample.exe"]).expect_err("unknown subcommand").kind(),
        ErrorKind::InvalidSubcommand
    );
    assert_eq!(
        parse(&["report", "job-1", "--copy"]).expect_err("unknown flag").kind(),
        ErrorKind::UnknownArgument
    );
    assert!(parse(&[]).is_err());
    assert_eq!(parse(&["version"]).expect("valid invocation"), Command::Version);
}
