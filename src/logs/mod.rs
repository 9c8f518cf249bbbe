//! Readers for the two log files the launcher writes.

pub mod energy;
pub mod termination;

use std::io;

/// Read failures that mean "nothing new yet" rather than a broken run.
/// The launcher creates both logs lazily, so a missing file is normal
/// for the first few polls.
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::UnexpectedEof
    )
}
