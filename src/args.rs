use crate::error::{self, Error, Result};
use log::LevelFilter;
use snafu::{ensure, OptionExt};
use std::str::FromStr;

/// The supervisor-facing verbose flag is conventionally capped at three occurrences.
const MAX_VERBOSITY: u8 = 3;

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Arguments {
    /// When present, probe this one unit instead of listing all failed units.
    pub(crate) service: Option<String>,
    /// Number of `-v` occurrences; anything above zero adds the per-unit breakdown.
    pub(crate) verbose: u8,
    pub(crate) log_level: Option<LevelFilter>,
}

/// The usage message for --help.
pub(crate) const USAGE: &str = r"USAGE:
unitdog <OPTIONS>

OPTIONS:
    [ -s, --service NAME ]    Check the named unit instead of listing failed units.
    [ -v, --verbose ]         Increase output detail, up to three times.
    [ --log-level LEVEL ]     Filter log messages: error|warn|info|debug|trace.
";

/// Parses the command line arguments.
pub(crate) fn parse_args<A>(args: A) -> Result<Arguments>
where
    A: Iterator<Item = String>,
{
    let mut service = None;
    let mut verbose: u8 = 0;
    let mut log_level = None;
    let mut iter = args.skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "-s" | "--service" => {
                let val = iter.next().context(error::Usage {
                    message: String::from("Did not give argument to --service"),
                })?;
                ensure!(
                    !val.is_empty(),
                    error::Usage {
                        message: Some(String::from("Empty service name given to --service")),
                    }
                );
                service = Some(val);
            }
            "-v" | "--verbose" => {
                ensure!(
                    verbose < MAX_VERBOSITY,
                    error::Usage {
                        message: Some(String::from("--verbose may be given at most 3 times")),
                    }
                );
                verbose += 1;
            }
            "--log-level" => {
                let val = iter.next().context(error::Usage {
                    message: String::from("Did not give argument to --log-level"),
                })?;
                log_level = Some(LevelFilter::from_str(&val).map_err(|_| Error::Usage {
                    message: Some(format!("Invalid log level '{}'", val)),
                })?);
            }
            "--help" | "-h" => return Err(Error::Usage { message: None }),
            unknown => {
                return Err(Error::Usage {
                    message: Some(format!("Unexpected argument: '{}'", unknown)),
                });
            }
        }
    }

    Ok(Arguments {
        service,
        verbose,
        log_level,
    })
}

#[cfg(test)]
fn args(list: &[&str]) -> Vec<String> {
    let mut v = vec![String::from("/bin/unitdog")];
    v.extend(list.iter().map(|s| String::from(*s)));
    v
}

#[test]
fn parse_args_test_default_is_list_mode() {
    let parsed = parse_args(args(&[]).into_iter()).unwrap();
    assert!(parsed.service.is_none());
    assert_eq!(parsed.verbose, 0);
    assert!(parsed.log_level.is_none());
}

#[test]
fn parse_args_test_service() {
    let parsed = parse_args(args(&["--service", "sshd.service"]).into_iter()).unwrap();
    assert_eq!(parsed.service.as_deref(), Some("sshd.service"));
}

#[test]
fn parse_args_test_short_service_and_verbose() {
    let parsed = parse_args(args(&["-s", "sshd", "-v", "-v"]).into_iter()).unwrap();
    assert_eq!(parsed.service.as_deref(), Some("sshd"));
    assert_eq!(parsed.verbose, 2);
}

#[test]
fn parse_args_test_too_many_verbose() {
    let result = parse_args(args(&["-v", "-v", "-v", "-v"]).into_iter());
    assert!(result.is_err());
}

#[test]
fn parse_args_test_empty_service() {
    let result = parse_args(args(&["--service", ""]).into_iter());
    assert!(result.is_err());
}

#[test]
fn parse_args_test_missing_service_value() {
    let result = parse_args(args(&["--service"]).into_iter());
    assert!(result.is_err());
}

#[test]
fn parse_args_test_log_level() {
    let parsed = parse_args(args(&["--log-level", "trace"]).into_iter()).unwrap();
    assert_eq!(parsed.log_level, Some(LevelFilter::Trace));
}

#[test]
fn parse_args_test_bad_log_level() {
    let result = parse_args(args(&["--log-level", "noisy"]).into_iter());
    assert!(result.is_err());
}

#[test]
fn parse_args_test_unknown_argument() {
    let result = parse_args(args(&["--frobnicate"]).into_iter());
    match result.err().unwrap() {
        Error::Usage { message } => assert!(message.unwrap().contains("--frobnicate")),
        bad => panic!("incorrect error type, expected Error::Usage, got {}", bad),
    }
}

#[test]
fn parse_args_test_help() {
    let result = parse_args(args(&["--help"]).into_iter());
    match result.err().unwrap() {
        Error::Usage { message } => assert!(message.is_none()),
        bad => panic!("incorrect error type, expected Error::Usage, got {}", bad),
    }
}
