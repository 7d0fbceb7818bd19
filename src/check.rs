//! Runs one health check: picks the data source, evaluates each unit fact, and folds
//! the verdicts into the report the monitoring supervisor reads.

use crate::args::Arguments;
use crate::error::Result;
use crate::status::{aggregate, evaluate, Severity, Summary, Verdict};
use crate::systemctl::UnitSource;
use log::debug;
use std::fmt;

/// The check name prefixed to the status line, per monitoring-plugin convention.
const CHECK_NAME: &str = "SYSTEMD";

/// Policy text for a probed unit that systemctl had nothing to say about. The absence
/// of any fact for a requested unit is itself a failure, not a silent pass.
const NO_SERVICE_HINT: &str = "No Service given";

/// The printable outcome of one check run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Report {
    summary: Summary,
    verbose: u8,
}

impl Report {
    pub(crate) fn overall(&self) -> Severity {
        self.summary.overall
    }

    pub(crate) fn exit_code(&self) -> i32 {
        self.summary.overall.exit_code()
    }
}

impl fmt::Display for Report {
    /// The first line is always `SYSTEMD <STATUS> - <summary>`; with any verbosity, one
    /// line per evaluated unit follows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            CHECK_NAME, self.summary.overall, self.summary.headline
        )?;
        if self.verbose > 0 {
            for line in &self.summary.breakdown {
                write!(f, "\n{}", line)?;
            }
        }
        Ok(())
    }
}

/// Runs the check described by `arguments` against `source`: list mode when no service
/// was named, probe mode otherwise. Exactly one systemctl invocation happens per run.
pub(crate) fn run_check(arguments: &Arguments, source: &dyn UnitSource) -> Result<Report> {
    let verdicts = match &arguments.service {
        None => {
            let units = source.failed_units()?;
            debug!("list mode returned {} unit(s)", units.len());
            units.iter().map(evaluate).collect()
        }
        Some(service) => match source.probe(service)? {
            Some(unit) => vec![evaluate(&unit)],
            // a probe with no answer is critical by policy
            None => vec![Verdict::critical(format!(
                "{} ({})",
                NO_SERVICE_HINT, service
            ))],
        },
    };
    Ok(Report {
        summary: aggregate(&verdicts),
        verbose: arguments.verbose,
    })
}
