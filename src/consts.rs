//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// Job submission tool that every command line is run under.
pub const LAUNCHER: &str = "longbow";

/// Run log written by the launcher, relative to its working directory.
pub const RUN_LOG: &str = "log";

/// Simulation log carrying the energy lines.
pub const JOB_LOG: &str = "jobname.log";

/// Footer the launcher writes once the remote job is fully finished.
pub const TERMINATION_MARKER: &str = "Good bye from Longbow!";

/// Prefix of a line reporting one completed energy calculation.
pub const ENERGY_MARKER: &str = "Energy calculation finished, energy:";

/// Delay between two polls of the log files.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
