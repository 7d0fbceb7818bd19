//! Provides the list of errors for `unitdog`.

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub(crate) enum Error {
    #[snafu(display("Unable to run '{} {}': {}", command, args.join(" "), source))]
    Command {
        command: String,
        args: Vec<String>,
        source: io::Error,
    },

    #[snafu(display("'{} {}' wrote to stderr: {}", command, args.join(" "), stderr))]
    CommandStderr {
        command: String,
        args: Vec<String>,
        stderr: String,
    },

    #[snafu(display("Empty service name given to probe."))]
    EmptyService {},

    #[snafu(display("Unable to parse systemctl output line: '{}'", line))]
    ParseOutput { line: String },

    #[snafu(display("Usage error."))]
    Usage { message: Option<String> },
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
