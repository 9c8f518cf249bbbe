//! The poll loop: scan the job log, print the energies when they grow,
//! and stop once the run log shows the launcher's footer.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{GrabberError, Result};
use crate::launcher::JobHandle;
use crate::logs::energy::{EnergyExtractor, ScanReport};
use crate::logs::is_transient;
use crate::logs::termination::detect_termination;
use crate::output::{OutputFormat, render};
use crate::series::EnergySeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Terminated,
}

/// How [`Poller::run_until`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The run log carried the termination footer.
    Terminated,
    /// The shutdown future resolved first.
    Cancelled,
}

pub struct Poller<W> {
    extractor: EnergyExtractor,
    run_log: PathBuf,
    interval: Duration,
    format: OutputFormat,
    series: EnergySeries,
    emitted: usize,
    state: PollState,
    ticks: u64,
    exit_reported: bool,
    out: W,
}

impl<W: Write> Poller<W> {
    pub fn new(settings: &Settings, out: W) -> Self {
        Self {
            extractor: EnergyExtractor::new(settings.job_log_path(), settings.scan),
            run_log: settings.run_log_path(),
            interval: settings.interval,
            format: settings.format,
            series: EnergySeries::new(),
            emitted: 0,
            state: PollState::Polling,
            ticks: 0,
            exit_reported: false,
            out,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn series(&self) -> &EnergySeries {
        &self.series
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// One poll: scan, emit if grown, then check for termination.
    pub async fn tick(&mut self, job: Option<&mut JobHandle>) -> Result<PollState> {
        if self.state == PollState::Terminated {
            return Ok(self.state);
        }
        self.ticks += 1;
        debug!(tick = self.ticks, "polling");

        let scan = self.extractor.scan(&mut self.series).await;
        self.absorb(scan)?;
        self.emit_if_grown()?;

        if detect_termination(&self.run_log).await {
            let tail = self.extractor.finish(&mut self.series).await;
            self.absorb(tail)?;
            self.emit_if_grown()?;

            info!(
                ticks = self.ticks,
                energies = self.series.len(),
                "termination marker found"
            );
            self.state = PollState::Terminated;
        } else if let Some(job) = job {
            if let Some(status) = self.newly_exited(job) {
                // The footer may have landed between the check above and the exit.
                if !detect_termination(&self.run_log).await {
                    warn!(
                        %status,
                        command = job.command_line(),
                        "launcher exited before the termination marker, still polling"
                    );
                }
            }
        }

        Ok(self.state)
    }

    /// Tick until the job terminates or `shutdown` resolves. The first
    /// tick runs immediately; later ones follow every `interval`.
    pub async fn run_until<F>(
        &mut self,
        mut job: Option<&mut JobHandle>,
        shutdown: F,
    ) -> Result<PollOutcome>
    where
        F: Future,
    {
        tokio::pin!(shutdown);

        info!(interval = ?self.interval, run_log = %self.run_log.display(), "watching logs");

        loop {
            if self.tick(job.as_deref_mut()).await? == PollState::Terminated {
                return Ok(PollOutcome::Terminated);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    warn!(ticks = self.ticks, "polling cancelled");
                    return Ok(PollOutcome::Cancelled);
                }
            }
        }
    }

    fn absorb(&self, scan: std::io::Result<ScanReport>) -> Result<()> {
        match scan {
            Ok(report) => {
                for line in &report.malformed {
                    warn!(
                        line = line.line_number,
                        text = %line.text,
                        "energy line without a value, skipped"
                    );
                }
                if report.appended > 0 {
                    debug!(appended = report.appended, "energies found");
                }
                Ok(())
            }
            Err(e) if is_transient(&e) => {
                debug!(
                    path = %self.extractor.path().display(),
                    error = %e,
                    "job log not readable yet"
                );
                Ok(())
            }
            Err(source) => Err(GrabberError::Read {
                path: self.extractor.path().to_path_buf(),
                source,
            }),
        }
    }

    fn emit_if_grown(&mut self) -> Result<()> {
        if self.series.is_empty() || self.series.len() == self.emitted {
            return Ok(());
        }
        let line = render(&self.series, self.format)?;
        writeln!(self.out, "{line}").map_err(GrabberError::Output)?;
        self.out.flush().map_err(GrabberError::Output)?;
        self.emitted = self.series.len();
        Ok(())
    }

    /// The launcher's exit status the first time it is seen, `None` after.
    fn newly_exited(&mut self, job: &mut JobHandle) -> Option<ExitStatus> {
        if self.exit_reported {
            return None;
        }
        match job.poll_exit() {
            Ok(Some(status)) => {
                self.exit_reported = true;
                Some(status)
            }
            Ok(None) => None,
            Err(e) => {
                self.exit_reported = true;
                warn!(error = %e, "could not query launcher status");
                None
            }
        }
    }
}

/// Resolve when `signal` fires. If the signal cannot be listened for,
/// log it and never resolve, so polling only ends on termination.
pub async fn until_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "cannot listen for interrupts");
        std::future::pending::<()>().await;
    }
}
