//! Starting the job submission tool and keeping hold of it.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Instant;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::error::{GrabberError, Result};

/// Runs `<program> <args...>` in a fixed working directory.
#[derive(Debug, Clone)]
pub struct Launcher {
    program: String,
    work_dir: PathBuf,
}

impl Launcher {
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Start the launcher without waiting for it. Stdio is inherited so
    /// its own progress output stays visible.
    pub fn launch(&self, args: &[String]) -> Result<JobHandle> {
        let child = Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_dir)
            .spawn()
            .map_err(|source| GrabberError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let command_line = std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        info!(pid = child.id(), command = %command_line, "job launched");

        Ok(JobHandle {
            child,
            command_line,
            started: Instant::now(),
            exit: None,
        })
    }
}

/// A running (or finished) launcher process.
pub struct JobHandle {
    child: Child,
    command_line: String,
    started: Instant,
    exit: Option<ExitStatus>,
}

impl JobHandle {
    /// OS process id, `None` once the process has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Exit status if the process has already finished. Never blocks.
    pub fn poll_exit(&mut self) -> io::Result<Option<ExitStatus>> {
        if self.exit.is_some() {
            return Ok(self.exit);
        }
        if let Some(status) = self.child.try_wait()? {
            info!(
                %status,
                elapsed = ?self.started.elapsed(),
                "launcher exited"
            );
            self.exit = Some(status);
        }
        Ok(self.exit)
    }

    /// Wait for the process to exit on its own.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.exit {
            return Ok(status);
        }
        let status = self.child.wait().await?;
        self.exit = Some(status);
        Ok(status)
    }

    /// Kill the process if it is still running and reap it.
    pub async fn cancel(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.poll_exit()? {
            return Ok(status);
        }
        warn!(pid = self.id(), "killing launcher");
        self.child.start_kill()?;
        self.wait().await
    }
}
