use clap::Parser;
use tracing::info;

use longbow_grabber::config::Settings;
use longbow_grabber::launcher::Launcher;
use longbow_grabber::logging::setup_logging;
use longbow_grabber::poller::{PollOutcome, Poller, until_signal};

#[derive(Parser)]
#[command(
    name = "longbow-grabber",
    about = "Submit a job through Longbow and print its energies as they appear.",
    disable_help_flag = true,
    disable_version_flag = true,
    allow_hyphen_values = true
)]
struct Cli {
    /// Command line handed to longbow verbatim
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    setup_logging();

    if let Err(e) = run(cli).await {
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    info!(
        scan = %settings.scan,
        format = %settings.format,
        work_dir = %settings.work_dir.display(),
        "settings loaded"
    );

    let launcher = Launcher::new(&settings.launcher, &settings.work_dir);
    let mut job = launcher.launch(&cli.command)?;

    let mut poller = Poller::new(&settings, std::io::stdout());
    let outcome = poller
        .run_until(Some(&mut job), until_signal(tokio::signal::ctrl_c()))
        .await?;

    match outcome {
        PollOutcome::Terminated => {
            if job.poll_exit()?.is_none() {
                info!(pid = job.id(), "footer written, launcher still shutting down");
            }
            Ok(())
        }
        PollOutcome::Cancelled => {
            let status = job.cancel().await?;
            eprintln!("\ninterrupted, launcher stopped ({status})");
            std::process::exit(130);
        }
    }
}

/// One-line error report with the cause chain, e.g. `error: a: b`.
fn error_line(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}
