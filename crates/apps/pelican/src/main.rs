//! pelican - download mailbox attachments matching a search query
//!
//! Reads the Graph and SMTP settings, authenticates once, searches the
//! mailbox, then downloads every matching message's attachments into the
//! destination directory. Every externally-facing step is wrapped so a
//! failure is logged, reported to the operator by mail, and aborts the run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use graphmail::{
    download_attachments, report_outcome, GraphSession, GraphSettings, SmtpNotifier, SmtpSettings,
};

#[derive(Parser)]
#[command(name = "pelican", version, about = "Mailbox attachment downloader")]
struct Cli {
    /// Run label; the log file is named <NAME>.log
    #[arg(long)]
    name: String,

    /// Mailbox search expression (KQL), passed to the provider verbatim.
    /// An empty string disables filtering.
    #[arg(long)]
    mailsearch: String,

    /// Destination directory for attachments (must already exist).
    /// Falls back to the save_path key of the Graph settings file.
    #[arg(long)]
    savedir: Option<PathBuf>,

    /// Path to the Graph settings file (default: main_config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the SMTP settings file (default: mail_config.json)
    #[arg(long)]
    mail_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.name);

    let settings = match &cli.config {
        Some(path) => GraphSettings::from_file(path)?,
        None => GraphSettings::load()?,
    };
    let smtp = match &cli.mail_config {
        Some(path) => SmtpSettings::from_file(path)?,
        None => SmtpSettings::load()?,
    };

    let save_dir = cli
        .savedir
        .or_else(|| settings.save_path.as_ref().map(PathBuf::from))
        .context("No destination directory: pass --savedir or set save_path in the config")?;
    if !save_dir.is_dir() {
        bail!(
            "Destination directory {} does not exist or is not a directory",
            save_dir.display()
        );
    }

    // Empty search string means "no filter" (the provider's default page).
    let query = (!cli.mailsearch.is_empty()).then_some(cli.mailsearch.as_str());

    let notifier = SmtpNotifier::new(smtp);

    let session = report_outcome("token acquisition", &notifier, || {
        GraphSession::connect(
            &settings.credentials(),
            &settings.authority(),
            GraphSession::DEFAULT_ENDPOINT,
            &[GraphSession::DEFAULT_SCOPE.to_string()],
        )
    })?;

    let messages = report_outcome("mailbox search", &notifier, || {
        session.search_messages(query)
    })?;

    for message in &messages {
        let count = report_outcome("attachment download", &notifier, || {
            download_attachments(&session, &message.id, &save_dir)
        })?;
        info!(
            "{} attachments processed for message {}",
            count,
            message.id.as_str()
        );
    }

    Ok(())
}

/// Set up tracing with stderr output plus a per-run log file named after
/// the run label. The library's `log` records flow through the tracing-log
/// bridge installed by `init`.
fn setup_logging(run_name: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_appender = tracing_appender::rolling::never(".", format!("{run_name}.log"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
