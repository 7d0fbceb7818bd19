use crate::error::{Error, Result};
use crate::main_inner;
use crate::status::Severity;
use crate::systemctl::{UnitSource, UnitStatus};

/// A unit source scripted with canned answers, standing in for systemctl. When
/// `stderr` is set, both operations fail the way the real source does when systemctl
/// writes to its stderr.
struct MockSource {
    failed: Vec<UnitStatus>,
    probed: Option<UnitStatus>,
    stderr: Option<String>,
}

impl MockSource {
    fn listing(failed: Vec<UnitStatus>) -> Box<Self> {
        Box::new(Self {
            failed,
            probed: None,
            stderr: None,
        })
    }

    fn probing(probed: Option<UnitStatus>) -> Box<Self> {
        Box::new(Self {
            failed: Vec::new(),
            probed,
            stderr: None,
        })
    }

    fn broken(stderr: &str) -> Box<Self> {
        Box::new(Self {
            failed: Vec::new(),
            probed: None,
            stderr: Some(stderr.to_string()),
        })
    }

    fn check_stderr(&self) -> Result<()> {
        match &self.stderr {
            None => Ok(()),
            Some(stderr) => Err(Error::CommandStderr {
                command: String::from("systemctl"),
                args: vec![],
                stderr: stderr.clone(),
            }),
        }
    }
}

impl UnitSource for MockSource {
    fn failed_units(&self) -> Result<Vec<UnitStatus>> {
        self.check_stderr()?;
        Ok(self.failed.clone())
    }

    fn probe(&self, _service: &str) -> Result<Option<UnitStatus>> {
        self.check_stderr()?;
        Ok(self.probed.clone())
    }
}

fn unit(name: &str, state: &str) -> UnitStatus {
    UnitStatus {
        name: name.to_string(),
        active_state: Some(state.to_string()),
    }
}

fn all_clear() -> UnitStatus {
    UnitStatus {
        name: String::from("all"),
        active_state: None,
    }
}

fn args(list: &[&str]) -> Vec<String> {
    let mut v = vec![String::from("unitdog")];
    v.extend(list.iter().map(|s| String::from(*s)));
    v
}

#[test]
/// list mode with nothing failed reports OK for "all" and exits 0
fn list_mode_all_clear() {
    let source = MockSource::listing(vec![all_clear()]);
    let report = main_inner(args(&[]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Ok);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(format!("{}", report), "SYSTEMD OK - all");
}

#[test]
/// one failed unit makes the check critical with exit code 2
fn list_mode_one_failed_unit() {
    let source = MockSource::listing(vec![unit("nginx.service", "failed")]);
    let report = main_inner(args(&["-v"]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Critical);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(
        format!("{}", report),
        "SYSTEMD CRITICAL - nginx.service: failed\nCRITICAL: nginx.service: failed"
    );
}

#[test]
/// only the critical units make the status line; the breakdown lists everything
fn list_mode_mixed_units_verbose() {
    let source = MockSource::listing(vec![
        unit("a.service", "active"),
        unit("b.service", "failed"),
    ]);
    let report = main_inner(args(&["-v", "-v"]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Critical);
    let printed = format!("{}", report);
    assert!(printed.starts_with("SYSTEMD CRITICAL - b.service: failed"));
    assert!(printed.contains("\nOK: a.service"));
    assert!(printed.contains("\nCRITICAL: b.service: failed"));
}

#[test]
/// without --verbose the breakdown is suppressed
fn list_mode_not_verbose() {
    let source = MockSource::listing(vec![unit("b.service", "failed")]);
    let report = main_inner(args(&[]).into_iter(), source).unwrap();
    assert_eq!(format!("{}", report), "SYSTEMD CRITICAL - b.service: failed");
}

#[test]
/// probing an active unit reports OK with exit code 0
fn probe_mode_active() {
    let source = MockSource::probing(Some(unit("sshd", "active")));
    let report = main_inner(args(&["--service", "sshd"]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Ok);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(format!("{}", report), "SYSTEMD OK - sshd");
}

#[test]
/// probing a unit in any state other than "active" is critical
fn probe_mode_inactive() {
    let source = MockSource::probing(Some(unit("sshd", "inactive")));
    let report = main_inner(args(&["-s", "sshd"]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Critical);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(format!("{}", report), "SYSTEMD CRITICAL - sshd: inactive");
}

#[test]
/// a probe that yields no fact at all is critical by policy, not silently OK
fn probe_mode_no_output() {
    let source = MockSource::probing(None);
    let report = main_inner(args(&["--service", "sshd"]).into_iter(), source).unwrap();
    assert_eq!(report.overall(), Severity::Critical);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(
        format!("{}", report),
        "SYSTEMD CRITICAL - No Service given (sshd)"
    );
}

#[test]
/// stderr from systemctl aborts the check before any verdict is computed
fn list_mode_stderr_is_fatal() {
    let source = MockSource::broken("dbus is down");
    let err = main_inner(args(&[]).into_iter(), source).err().unwrap();
    match err {
        Error::CommandStderr { stderr, .. } => assert!(stderr.contains("dbus is down")),
        bad => panic!("incorrect error type, expected Error::CommandStderr, got {}", bad),
    }
}

#[test]
/// a usage error carries the offending argument back to main
fn unknown_argument() {
    let source = MockSource::listing(vec![all_clear()]);
    let err = main_inner(args(&["--bogus"]).into_iter(), source)
        .err()
        .unwrap();
    match err {
        Error::Usage { message } => assert!(message.unwrap().contains("--bogus")),
        bad => panic!("incorrect error type, expected Error::Usage, got {}", bad),
    }
}
