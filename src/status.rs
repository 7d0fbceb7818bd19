//! The monitoring-plugin verdict model: per-unit evaluation and aggregation into a
//! single overall status following the standard OK/WARNING/CRITICAL/UNKNOWN convention.

use crate::systemctl::UnitStatus;
use std::fmt;

/// The state string systemd reports for a healthy unit.
const ACTIVE: &str = "active";

/// Monitoring-plugin severity, ordered so that the worst outcome compares greatest.
/// `Warning` is part of the convention but never produced by unit evaluation;
/// `Unknown` is reserved for execution failures and is mapped in `main`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    /// The process exit code the monitoring supervisor expects for this severity.
    pub(crate) fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The evaluated judgment for one unit fact.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Verdict {
    pub(crate) severity: Severity,
    pub(crate) hint: String,
}

impl Verdict {
    pub(crate) fn critical<S: Into<String>>(hint: S) -> Self {
        Self {
            severity: Severity::Critical,
            hint: hint.into(),
        }
    }
}

/// Maps a unit fact to a verdict. A unit is critical iff systemd reported an activation
/// state other than "active"; an absent state is the all-clear signal from list mode.
/// Pure function, no side effects.
pub(crate) fn evaluate(unit: &UnitStatus) -> Verdict {
    match &unit.active_state {
        Some(state) if state != ACTIVE => Verdict::critical(format!("{}: {}", unit.name, state)),
        _ => Verdict {
            severity: Severity::Ok,
            hint: unit.name.clone(),
        },
    }
}

/// The combined result of all verdicts from one check run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Summary {
    /// The worst severity present.
    pub(crate) overall: Severity,
    /// Hints of the verdicts sharing the worst severity, joined for the status line.
    pub(crate) headline: String,
    /// One formatted line per verdict, in evaluation order, for verbose output.
    pub(crate) breakdown: Vec<String>,
}

/// Folds verdicts into a `Summary`. The headline names only the most significant
/// verdicts (all critical ones if any exist, otherwise all ok ones) while the breakdown
/// lists every verdict. Callers must supply at least one verdict; list mode guarantees
/// this with its synthetic all-clear fact.
pub(crate) fn aggregate(verdicts: &[Verdict]) -> Summary {
    assert!(!verdicts.is_empty(), "aggregate requires at least one verdict");
    let overall = verdicts
        .iter()
        .map(|v| v.severity)
        .max()
        .unwrap_or(Severity::Ok);
    let headline = verdicts
        .iter()
        .filter(|v| v.severity == overall)
        .map(|v| v.hint.as_str())
        .collect::<Vec<&str>>()
        .join(", ");
    let breakdown = verdicts
        .iter()
        .map(|v| format!("{}: {}", v.severity, v.hint))
        .collect();
    Summary {
        overall,
        headline,
        breakdown,
    }
}

#[cfg(test)]
fn fact(name: &str, state: Option<&str>) -> UnitStatus {
    UnitStatus {
        name: name.to_string(),
        active_state: state.map(String::from),
    }
}

#[test]
fn evaluate_active_is_ok() {
    let verdict = evaluate(&fact("sshd.service", Some("active")));
    assert_eq!(verdict.severity, Severity::Ok);
    assert_eq!(verdict.hint, "sshd.service");
}

#[test]
fn evaluate_absent_state_is_ok() {
    let verdict = evaluate(&fact("all", None));
    assert_eq!(verdict.severity, Severity::Ok);
    assert_eq!(verdict.hint, "all");
}

#[test]
fn evaluate_failed_is_critical() {
    let verdict = evaluate(&fact("nginx.service", Some("failed")));
    assert_eq!(verdict.severity, Severity::Critical);
    assert_eq!(verdict.hint, "nginx.service: failed");
}

#[test]
fn evaluate_inactive_is_critical() {
    let verdict = evaluate(&fact("cron.service", Some("inactive")));
    assert_eq!(verdict.severity, Severity::Critical);
    assert_eq!(verdict.hint, "cron.service: inactive");
}

#[test]
fn evaluate_is_idempotent() {
    let unit = fact("nginx.service", Some("failed"));
    assert_eq!(evaluate(&unit), evaluate(&unit));
}

#[test]
fn severity_orders_worst_last() {
    assert!(Severity::Ok < Severity::Warning);
    assert!(Severity::Warning < Severity::Critical);
    assert!(Severity::Critical < Severity::Unknown);
}

#[test]
fn aggregate_all_ok() {
    let verdicts = vec![
        evaluate(&fact("a.service", Some("active"))),
        evaluate(&fact("b.service", Some("active"))),
    ];
    let summary = aggregate(&verdicts);
    assert_eq!(summary.overall, Severity::Ok);
    assert_eq!(summary.headline, "a.service, b.service");
    assert_eq!(summary.breakdown, vec!["OK: a.service", "OK: b.service"]);
}

#[test]
fn aggregate_worst_wins() {
    let verdicts = vec![
        evaluate(&fact("a.service", Some("active"))),
        evaluate(&fact("b.service", Some("failed"))),
        evaluate(&fact("c.service", Some("inactive"))),
    ];
    let summary = aggregate(&verdicts);
    assert_eq!(summary.overall, Severity::Critical);
    // only the critical verdicts make the headline
    assert_eq!(summary.headline, "b.service: failed, c.service: inactive");
    // the breakdown keeps every verdict in evaluation order
    assert_eq!(
        summary.breakdown,
        vec![
            "OK: a.service",
            "CRITICAL: b.service: failed",
            "CRITICAL: c.service: inactive",
        ]
    );
}

#[test]
#[should_panic]
fn aggregate_rejects_empty_input() {
    aggregate(&[]);
}
