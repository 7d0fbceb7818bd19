use crate::error::{self, Result};
use log::trace;
use snafu::{ensure, ResultExt};
use std::process::Command;

/// The name reported for the synthetic all-clear fact when no units have failed.
pub(crate) const ALL_UNITS: &str = "all";

/// One observed fact about a systemd unit: its name and, when systemd reported one, its
/// activation state. `active_state` is `None` only for the synthetic all-clear fact that
/// stands in for an empty `systemctl --failed` listing.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct UnitStatus {
    pub(crate) name: String,
    pub(crate) active_state: Option<String>,
}

/// The source of unit facts. The real implementation shells out to `systemctl`; tests
/// substitute a mock.
pub(crate) trait UnitSource {
    /// Lists all units currently in a failed state. An empty listing yields a single
    /// synthetic fact with `active_state` absent, signaling "no failed units".
    fn failed_units(&self) -> Result<Vec<UnitStatus>>;

    /// Queries the activation state of one named unit. `None` means systemctl produced
    /// no output for the unit; the caller decides what that absence means.
    fn probe(&self, service: &str) -> Result<Option<UnitStatus>>;
}

pub(crate) struct Systemctl {}

impl UnitSource for Systemctl {
    fn failed_units(&self) -> Result<Vec<UnitStatus>> {
        let outcome = systemctl(&["--failed", "--no-legend"])?;
        parse_failed_list(&outcome.stdout)
    }

    fn probe(&self, service: &str) -> Result<Option<UnitStatus>> {
        ensure!(!service.is_empty(), error::EmptyService {});
        let outcome = systemctl(&["is-active", service])?;
        Ok(parse_probe(service, &outcome.stdout))
    }
}

struct Outcome {
    stdout: String,
}

/// Runs systemctl with the given arguments and captures its stdout. Anything written to
/// stderr fails the check unconditionally, regardless of the process's own exit code,
/// since systemctl's exit codes encode unit states rather than execution failures.
fn systemctl(args: &[&str]) -> Result<Outcome> {
    trace!("calling systemctl with '{:?}'", args);
    let output = Command::new("systemctl")
        .args(args)
        .output()
        .context(error::Command {
            command: "systemctl",
            args: args.iter().map(|&s| s.to_owned()).collect::<Vec<String>>(),
        })?;
    let stderr = String::from_utf8_lossy(output.stderr.as_slice());
    ensure!(
        stderr.is_empty(),
        error::CommandStderr {
            command: "systemctl",
            args: args.iter().map(|&s| s.to_owned()).collect::<Vec<String>>(),
            stderr: stderr.clone().into_owned(),
        }
    );
    Ok(Outcome {
        stdout: String::from_utf8_lossy(output.stdout.as_slice()).into(),
    })
}

/// Parses the output of `systemctl --failed --no-legend`: one unit per line, whitespace
/// separated, with the unit name in column 1 and the active-state in column 3. A line
/// with fewer than three columns is a fatal parse error rather than something to skip,
/// since silently dropping a line could hide a failed unit. Emission order is preserved.
fn parse_failed_list(stdout: &str) -> Result<Vec<UnitStatus>> {
    trace!("parsing systemctl stdout:\n{}", stdout);
    if stdout.trim().is_empty() {
        return Ok(vec![UnitStatus {
            name: ALL_UNITS.to_string(),
            active_state: None,
        }]);
    }
    let mut units = Vec::new();
    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        ensure!(columns.len() >= 3, error::ParseOutput { line });
        units.push(UnitStatus {
            name: columns[0].to_string(),
            active_state: Some(columns[2].to_string()),
        });
    }
    Ok(units)
}

/// Parses the output of `systemctl is-active <unit>`: a single line holding the bare
/// activation state. Empty output means systemctl had nothing to say about the unit.
fn parse_probe(service: &str, stdout: &str) -> Option<UnitStatus> {
    let state = stdout.trim();
    if state.is_empty() {
        return None;
    }
    Some(UnitStatus {
        name: service.to_string(),
        active_state: Some(state.to_string()),
    })
}

#[test]
fn parse_failed_list_empty() {
    let units = parse_failed_list("").unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].name, "all");
    assert!(units[0].active_state.is_none());
}

#[test]
fn parse_failed_list_single_unit() {
    let stdout = "nginx.service loaded failed failed A high performance web server\n";
    let units = parse_failed_list(stdout).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].name, "nginx.service");
    assert_eq!(units[0].active_state.as_deref(), Some("failed"));
}

#[test]
fn parse_failed_list_preserves_order() {
    let stdout = "b.service loaded failed failed\na.service loaded inactive dead\n";
    let units = parse_failed_list(stdout).unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].name, "b.service");
    assert_eq!(units[1].name, "a.service");
    assert_eq!(units[1].active_state.as_deref(), Some("inactive"));
}

#[test]
fn parse_failed_list_short_line() {
    let stdout = "nginx.service loaded\n";
    let err = parse_failed_list(stdout).err().unwrap();
    match err {
        crate::error::Error::ParseOutput { line } => assert!(line.contains("nginx.service")),
        bad => panic!("incorrect error type, expected Error::ParseOutput, got {}", bad),
    }
}

#[test]
fn parse_probe_active() {
    let unit = parse_probe("sshd", "active\n").unwrap();
    assert_eq!(unit.name, "sshd");
    assert_eq!(unit.active_state.as_deref(), Some("active"));
}

#[test]
fn parse_probe_no_output() {
    assert!(parse_probe("sshd", "").is_none());
    assert!(parse_probe("sshd", "\n").is_none());
}
