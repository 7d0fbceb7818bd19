/*!
# Introduction

`unitdog` is a monitoring plugin that reports the health of systemd units. Without
arguments it asks systemd for all failed units and reports CRITICAL if any exist; with
`--service <name>` it checks the activation state of that one unit instead.

The output follows the standard monitoring-plugin contract: a single status line of the
form `SYSTEMD <STATUS> - <summary>` on stdout, a per-unit breakdown with `--verbose`,
and exit codes 0 (OK), 2 (CRITICAL), and 3 (UNKNOWN, for execution failures). A
monitoring supervisor is expected to invoke it on its own polling schedule; `unitdog`
keeps no state between runs and never retries.

*/

#![deny(rust_2018_idioms, unreachable_pub, missing_copy_implementations)]

mod args;
mod check;
mod error;
#[cfg(test)]
mod main_test;
mod status;
mod systemctl;

use crate::args::USAGE;
use crate::check::Report;
use crate::error::{Error, Result};
use crate::status::Severity;
use crate::systemctl::{Systemctl, UnitSource};
use args::parse_args;
use env_logger::Builder;
use log::trace;
use std::sync::Once;
use std::{env, process};

fn main() -> ! {
    process::exit(match main_inner(env::args(), Box::new(Systemctl {})) {
        Ok(report) => {
            println!("{}", report);
            report.exit_code()
        }
        Err(Error::Usage { message }) => {
            if let Some(message) = message {
                eprintln!("{}\n", message)
            }
            eprintln!("{}", USAGE);
            Severity::Unknown.exit_code()
        }
        Err(err) => {
            // the supervisor reads stdout, so the diagnostic goes there
            println!("SYSTEMD {} - {}", Severity::Unknown, err);
            Severity::Unknown.exit_code()
        }
    })
}

/// To facilitate testing of `main_inner` function, ensure that the logger is only initialized once.
static INIT_LOGGER_ONCE: Once = Once::new();

/// pub(crate) for testing.
pub(crate) fn main_inner<A>(args: A, source: Box<dyn UnitSource>) -> Result<Report>
where
    A: Iterator<Item = String>,
{
    let arguments = parse_args(args)?;
    INIT_LOGGER_ONCE.call_once(|| {
        match arguments.log_level {
            None => Builder::new().init(),
            Some(level) => Builder::new().filter_module("unitdog", level).init(),
        }
        trace!("logger initialized");
    });
    check::run_check(&arguments, source.as_ref())
}
